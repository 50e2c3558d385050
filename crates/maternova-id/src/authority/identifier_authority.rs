use core::num::NonZeroU32;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    AuthorityConfig, BeneficiaryProfile, CounterBank, Error, IdGenerator, NewBeneficiary,
    PatientRegistry, ReconcileReport, Reservation, Result, SystemClock, TimeSource,
};

/// Result of a login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Login {
    /// A record with the same role and name already existed.
    Existing(BeneficiaryProfile),
    /// A new identifier was issued and its record stored.
    Registered(BeneficiaryProfile),
}

impl Login {
    /// The logged-in record.
    #[must_use]
    pub fn profile(&self) -> &BeneficiaryProfile {
        match self {
            Self::Existing(profile) | Self::Registered(profile) => profile,
        }
    }

    /// Consumes the login, returning the record.
    #[must_use]
    pub fn into_profile(self) -> BeneficiaryProfile {
        match self {
            Self::Existing(profile) | Self::Registered(profile) => profile,
        }
    }

    /// Whether this login issued a new identifier.
    #[must_use]
    pub fn is_new(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}

/// Issues identifiers against a shared record store.
///
/// The authority couples an [`IdGenerator`] with a [`PatientRegistry`]. Each
/// registration generates an identifier and reserves it with an atomic
/// insert-if-absent. If another issuer (a second device with its own stale
/// counters) already stored that identifier, the authority re-primes its
/// counters from the store and tries again, up to
/// [`AuthorityConfig::max_attempts`] times.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use maternova_id::{
///     AuthorityConfig, BasicCounters, IdentifierAuthority, MemoryRegistry, NewBeneficiary, Role,
/// };
///
/// let store = Arc::new(MemoryRegistry::new());
/// let phone = IdentifierAuthority::with_config(BasicCounters::new(), store.clone(), AuthorityConfig::default());
/// let tablet = IdentifierAuthority::with_config(BasicCounters::new(), store.clone(), AuthorityConfig::default());
///
/// let a = phone.register(NewBeneficiary::new(Role::Pregnant, "Sita")).unwrap();
/// // The tablet's counters never saw 100001; the reservation catches it.
/// let b = tablet.register(NewBeneficiary::new(Role::Pregnant, "Gita")).unwrap();
///
/// assert_eq!(a.patient_id.to_string(), "100001");
/// assert_eq!(b.patient_id.to_string(), "100002");
/// ```
#[derive(Debug)]
pub struct IdentifierAuthority<C, R, T = SystemClock> {
    generator: IdGenerator<C, T>,
    registry: R,
    max_attempts: NonZeroU32,
}

impl<C, R> IdentifierAuthority<C, R>
where
    C: CounterBank,
    R: PatientRegistry,
{
    /// Creates an authority using the system clock.
    pub fn with_config(counters: C, registry: R, config: AuthorityConfig) -> Self {
        Self::new(counters, registry, SystemClock, config)
    }
}

impl<C, R, T> IdentifierAuthority<C, R, T>
where
    C: CounterBank,
    R: PatientRegistry,
    T: TimeSource,
{
    /// Creates an authority from its parts. Call [`Self::prime`] before the
    /// first registration when the store is not empty.
    pub fn new(counters: C, registry: R, time: T, config: AuthorityConfig) -> Self {
        Self {
            generator: IdGenerator::new(counters, time, config.policy),
            registry,
            max_attempts: config.max_attempts,
        }
    }

    /// The wrapped generator.
    pub fn generator(&self) -> &IdGenerator<C, T> {
        &self.generator
    }

    /// The wrapped registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Reconciles the counters against every identifier in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or a lock is poisoned.
    pub fn prime(&self) -> Result<ReconcileReport> {
        let issued = self.registry.issued_ids()?;
        self.generator.reconcile(issued)
    }

    /// Issues an identifier for `new` and stores its record.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBeneficiary`] if `new` fails validation
    /// - [`Error::CapacityExceeded`] if the role has no sequences left
    /// - [`Error::ConcurrentIssuanceConflict`] if every attempt lost the
    ///   reservation race
    /// - any error from the registry or counter bank
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(role = %new.role)))]
    pub fn register(&self, new: NewBeneficiary) -> Result<BeneficiaryProfile> {
        new.validate()?;

        let mut attempts = 0;
        loop {
            attempts += 1;
            let id = self.generator.generate(new.role)?;
            let profile =
                BeneficiaryProfile::issue(id, &new, self.generator.time().current_millis());

            match self.registry.reserve(&profile)? {
                Reservation::Reserved => {
                    #[cfg(feature = "tracing")]
                    tracing::info!(%id, attempts, "registered beneficiary");
                    return Ok(profile);
                }
                Reservation::Taken if attempts >= self.max_attempts.get() => {
                    #[cfg(feature = "tracing")]
                    tracing::error!(%id, attempts, "giving up on identifier reservation");
                    return Err(Error::ConcurrentIssuanceConflict { id, attempts });
                }
                Reservation::Taken => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%id, attempts, "identifier already taken, re-priming counters");
                    self.prime()?;
                }
            }
        }
    }

    /// Logs someone in, issuing an identifier on first login.
    ///
    /// An existing record with the same role and (trimmed, case-insensitive)
    /// name is returned unchanged; otherwise `new` is registered.
    ///
    /// # Errors
    ///
    /// Everything [`Self::register`] can return.
    pub fn login(&self, new: NewBeneficiary) -> Result<Login> {
        new.validate()?;
        if let Some(existing) = self.registry.find(new.role, &new.name)? {
            #[cfg(feature = "tracing")]
            tracing::debug!(id = %existing.patient_id, "returning beneficiary");
            return Ok(Login::Existing(existing));
        }
        self.register(new).map(Login::Registered)
    }
}
