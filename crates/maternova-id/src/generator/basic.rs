use core::cell::Cell;

use crate::{CounterBank, CounterSnapshot, Error, PatientId, Result, Role};

/// Per-role counters for single-threaded use.
///
/// This bank is lightweight and fast, but **not thread-safe**: it is `!Sync`,
/// so the compiler keeps it on one thread.
///
/// ## Recommended When
/// - One event loop owns issuance (the common single-process case)
/// - You want the cheapest bank
///
/// ## See Also
/// - [`LockCounters`]
/// - [`AtomicCounters`]
///
/// [`LockCounters`]: crate::LockCounters
/// [`AtomicCounters`]: crate::AtomicCounters
#[derive(Debug, Default)]
pub struct BasicCounters {
    state: Cell<[u32; Role::COUNT]>,
}

impl BasicCounters {
    /// Creates a bank with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bank preloaded from a snapshot, e.g. one persisted at
    /// shutdown.
    #[must_use]
    pub fn from_snapshot(snapshot: CounterSnapshot) -> Self {
        let mut values = [0; Role::COUNT];
        for (role, value) in snapshot.iter() {
            values[role.index()] = value.min(PatientId::MAX_SEQUENCE);
        }
        Self {
            state: Cell::new(values),
        }
    }
}

impl CounterBank for BasicCounters {
    fn current(&self, role: Role) -> Result<u32> {
        Ok(self.state.get()[role.index()])
    }

    fn try_advance(&self, role: Role) -> Result<u32> {
        let mut values = self.state.get();
        let last = values[role.index()];
        if last >= PatientId::MAX_SEQUENCE {
            return Err(Error::CapacityExceeded { role, last });
        }
        values[role.index()] = last + 1;
        self.state.set(values);
        Ok(last + 1)
    }

    fn raise_to(&self, role: Role, floor: u32) -> Result<u32> {
        let mut values = self.state.get();
        let previous = values[role.index()];
        values[role.index()] = previous.max(floor.min(PatientId::MAX_SEQUENCE));
        self.state.set(values);
        Ok(previous)
    }

    fn snapshot(&self) -> Result<CounterSnapshot> {
        Ok(CounterSnapshot::from_values(self.state.get()))
    }
}
