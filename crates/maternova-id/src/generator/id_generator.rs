#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    CounterBank, CounterSnapshot, Error, IssuancePolicy, PatientId, ReconcileReport, Result, Role,
    SystemClock, TimeSource, reconcile,
};

/// Issues [`PatientId`]s from a [`CounterBank`].
///
/// The generator is an explicit object: construct one per process (or per
/// store) and hand it to every caller that issues identifiers. Counted roles
/// advance their counter by exactly one per successful call, so identifiers
/// stay unique as long as
/// - the counters were primed with [`IdGenerator::reconcile`] before first
///   use, and
/// - the bank is shared by every issuer in the process (pick
///   [`LockCounters`] or [`AtomicCounters`] when threads are involved).
///
/// Across processes, pair it with a [`PatientRegistry`] through an
/// [`IdentifierAuthority`], which retries when another device got there
/// first.
///
/// [`LockCounters`]: crate::LockCounters
/// [`AtomicCounters`]: crate::AtomicCounters
/// [`PatientRegistry`]: crate::PatientRegistry
/// [`IdentifierAuthority`]: crate::IdentifierAuthority
#[derive(Debug)]
pub struct IdGenerator<C, T = SystemClock> {
    counters: C,
    time: T,
    policy: IssuancePolicy,
}

impl<C: CounterBank> IdGenerator<C> {
    /// Creates a generator over `counters` with the default
    /// [`IssuancePolicy::Sequential`] policy and the system clock.
    pub fn with_counters(counters: C) -> Self {
        Self::new(counters, SystemClock, IssuancePolicy::default())
    }
}

impl<C, T> IdGenerator<C, T>
where
    C: CounterBank,
    T: TimeSource,
{
    /// Creates a generator from its parts.
    ///
    /// `time` is only consulted for roles that [`IssuancePolicy::Clock`]
    /// exempts from counting.
    pub fn new(counters: C, time: T, policy: IssuancePolicy) -> Self {
        Self {
            counters,
            time,
            policy,
        }
    }

    /// The active issuance policy.
    pub fn policy(&self) -> IssuancePolicy {
        self.policy
    }

    /// The underlying counter bank.
    pub fn counters(&self) -> &C {
        &self.counters
    }

    /// The clock used for clock-derived identifiers and record timestamps.
    pub fn time(&self) -> &T {
        &self.time
    }

    /// Issues the next identifier for `role`.
    ///
    /// Counted roles advance their counter by one and format it behind the
    /// role prefix. Under [`IssuancePolicy::Clock`], ASHA and unrecognised
    /// roles use the current millisecond timestamp modulo 100 000 instead and
    /// leave the counters untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::CapacityExceeded`] once `role`'s counter has handed out
    ///   sequence 99 999
    /// - `Error::LockPoisoned` if a lock-based bank is poisoned
    ///
    /// # Example
    /// ```
    /// use maternova_id::{BasicCounters, Error, IdGenerator, Role};
    ///
    /// let generator = IdGenerator::with_counters(BasicCounters::new());
    /// generator.reconcile(["199998"]).unwrap();
    ///
    /// assert_eq!(generator.generate(Role::Pregnant).unwrap().to_string(), "199999");
    /// assert!(matches!(
    ///     generator.generate(Role::Pregnant),
    ///     Err(Error::CapacityExceeded { .. })
    /// ));
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(policy = %self.policy)))]
    pub fn generate(&self, role: Role) -> Result<PatientId> {
        if role == Role::Unknown {
            #[cfg(feature = "tracing")]
            tracing::warn!("issuing a reserved-prefix identifier for an unrecognised role");
        }

        let sequence = if self.policy.is_sequential(role) {
            self.counters.try_advance(role)?
        } else {
            self.clock_sequence()
        };

        PatientId::from_components(role, sequence).ok_or(Error::CapacityExceeded {
            role,
            last: sequence,
        })
    }

    /// Primes the counters from identifiers already issued.
    ///
    /// See [`reconcile`](crate::reconcile()) for the exact rules.
    ///
    /// # Errors
    ///
    /// May return an error if a lock-based bank is poisoned. Malformed input
    /// is never an error.
    pub fn reconcile<I, S>(&self, issued: I) -> Result<ReconcileReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        reconcile(&self.counters, self.policy, issued)
    }

    /// Copies the current counters.
    ///
    /// # Errors
    ///
    /// May return an error if a lock-based bank is poisoned.
    pub fn snapshot(&self) -> Result<CounterSnapshot> {
        self.counters.snapshot()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn clock_sequence(&self) -> u32 {
        // Always below 100_000, so the cast is lossless.
        (self.time.current_millis() % (u64::from(PatientId::MAX_SEQUENCE) + 1)) as u32
    }
}
