use std::sync::Arc;

use crate::{
    CounterBank, CounterSnapshot, Error, PatientId, Result, Role,
    mutex::{Mutex, lock},
};

/// Per-role counters behind a single mutex, suitable for multi-threaded
/// environments.
///
/// The state lives in an [`Arc<Mutex<_>>`]; cloning the bank shares it.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Consistent snapshots across all roles
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
/// - Your target doesn't support atomics
///
/// ## See Also
/// - [`BasicCounters`]
/// - [`AtomicCounters`]
///
/// [`BasicCounters`]: crate::BasicCounters
/// [`AtomicCounters`]: crate::AtomicCounters
#[derive(Clone, Debug, Default)]
pub struct LockCounters {
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<[u32; Role::COUNT]>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<[u32; Role::COUNT]>>,
}

impl LockCounters {
    /// Creates a bank with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bank preloaded from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: CounterSnapshot) -> Self {
        let mut values = [0; Role::COUNT];
        for (role, value) in snapshot.iter() {
            values[role.index()] = value.min(PatientId::MAX_SEQUENCE);
        }
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(values))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(values)),
        }
    }
}

impl CounterBank for LockCounters {
    fn current(&self, role: Role) -> Result<u32> {
        let values = lock!(self.state);
        Ok(values[role.index()])
    }

    fn try_advance(&self, role: Role) -> Result<u32> {
        let mut values = lock!(self.state);
        let slot = &mut values[role.index()];
        if *slot >= PatientId::MAX_SEQUENCE {
            return Err(Error::CapacityExceeded { role, last: *slot });
        }
        *slot += 1;
        Ok(*slot)
    }

    fn raise_to(&self, role: Role, floor: u32) -> Result<u32> {
        let mut values = lock!(self.state);
        let slot = &mut values[role.index()];
        let previous = *slot;
        *slot = previous.max(floor.min(PatientId::MAX_SEQUENCE));
        Ok(previous)
    }

    fn snapshot(&self) -> Result<CounterSnapshot> {
        let values = lock!(self.state);
        Ok(CounterSnapshot::from_values(*values))
    }
}
