use crate::{CounterSnapshot, Result, Role};

/// Storage for the per-role sequence counters.
///
/// A counter holds the highest sequence issued (or observed) for its role. It
/// only ever moves forward: [`CounterBank::try_advance`] bumps it by one for a
/// new identifier, and [`CounterBank::raise_to`] lifts it to a value seen in
/// storage. Nothing else may write it.
///
/// Implementations differ only in how they share that state:
/// - [`BasicCounters`]: single-threaded, no synchronisation
/// - [`LockCounters`]: a mutex around all five counters
/// - [`AtomicCounters`]: one atomic per role, lock-free
///
/// [`BasicCounters`]: crate::BasicCounters
/// [`LockCounters`]: crate::LockCounters
/// [`AtomicCounters`]: crate::AtomicCounters
pub trait CounterBank {
    /// Returns the current value of `role`'s counter.
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock and it
    /// is poisoned.
    fn current(&self, role: Role) -> Result<u32>;

    /// Advances `role`'s counter by one and returns the new value.
    ///
    /// # Errors
    ///
    /// - [`Error::CapacityExceeded`] if the counter already holds
    ///   [`PatientId::MAX_SEQUENCE`]; the counter is left unchanged
    /// - `Error::LockPoisoned` if the underlying lock is poisoned
    ///
    /// [`Error::CapacityExceeded`]: crate::Error::CapacityExceeded
    /// [`PatientId::MAX_SEQUENCE`]: crate::PatientId::MAX_SEQUENCE
    fn try_advance(&self, role: Role) -> Result<u32>;

    /// Raises `role`'s counter to at least `floor` and returns the value it
    /// held before. A counter already at or above `floor` is left alone.
    ///
    /// `floor` is clamped to [`PatientId::MAX_SEQUENCE`].
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock and it
    /// is poisoned.
    ///
    /// [`PatientId::MAX_SEQUENCE`]: crate::PatientId::MAX_SEQUENCE
    fn raise_to(&self, role: Role, floor: u32) -> Result<u32>;

    /// Copies every counter.
    ///
    /// The default reads each role in turn, so concurrent writers may be
    /// observed half-way through.
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock and it
    /// is poisoned.
    fn snapshot(&self) -> Result<CounterSnapshot> {
        let mut values = [0; Role::COUNT];
        for role in Role::ALL {
            values[role.index()] = self.current(role)?;
        }
        Ok(CounterSnapshot::from_values(values))
    }
}

impl<C: CounterBank + ?Sized> CounterBank for &C {
    fn current(&self, role: Role) -> Result<u32> {
        (**self).current(role)
    }

    fn try_advance(&self, role: Role) -> Result<u32> {
        (**self).try_advance(role)
    }

    fn raise_to(&self, role: Role, floor: u32) -> Result<u32> {
        (**self).raise_to(role, floor)
    }

    fn snapshot(&self) -> Result<CounterSnapshot> {
        (**self).snapshot()
    }
}
