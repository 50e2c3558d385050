use portable_atomic::{AtomicU32, Ordering};

use crate::{CounterBank, CounterSnapshot, Error, PatientId, Result, Role};

#[cfg(feature = "cache-padded")]
type Slot = crossbeam_utils::CachePadded<AtomicU32>;
#[cfg(not(feature = "cache-padded"))]
type Slot = AtomicU32;

/// Lock-free per-role counters suitable for multi-threaded environments.
///
/// Each role has its own [`AtomicU32`], so issuing for one role never
/// contends with another.
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Consistent snapshots across all roles
///
/// ## Caveats
/// [`CounterBank::snapshot`] reads the five counters one after another. A
/// concurrent writer may land between two reads.
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`BasicCounters`]
/// - [`LockCounters`]
///
/// [`BasicCounters`]: crate::BasicCounters
/// [`LockCounters`]: crate::LockCounters
#[derive(Debug, Default)]
pub struct AtomicCounters {
    state: [Slot; Role::COUNT],
}

impl AtomicCounters {
    /// Creates a bank with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bank preloaded from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: CounterSnapshot) -> Self {
        let bank = Self::new();
        for (role, value) in snapshot.iter() {
            bank.slot(role)
                .store(value.min(PatientId::MAX_SEQUENCE), Ordering::Relaxed);
        }
        bank
    }

    fn slot(&self, role: Role) -> &AtomicU32 {
        &self.state[role.index()]
    }
}

// Every write is a read-modify-write on a single atomic, so per-role
// uniqueness holds even with relaxed ordering.
impl CounterBank for AtomicCounters {
    fn current(&self, role: Role) -> Result<u32> {
        Ok(self.slot(role).load(Ordering::Relaxed))
    }

    fn try_advance(&self, role: Role) -> Result<u32> {
        self.slot(role)
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
                (last < PatientId::MAX_SEQUENCE).then_some(last + 1)
            })
            .map(|previous| previous + 1)
            .map_err(|last| Error::CapacityExceeded { role, last })
    }

    fn raise_to(&self, role: Role, floor: u32) -> Result<u32> {
        Ok(self
            .slot(role)
            .fetch_max(floor.min(PatientId::MAX_SEQUENCE), Ordering::Relaxed))
    }
}
