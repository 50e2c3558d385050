use crate::{ParseError, PatientId, Role};

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `maternova-id` can emit.
///
/// Only [`Error::CapacityExceeded`] and [`Error::ConcurrentIssuanceConflict`]
/// are expected during normal operation; both require the caller to retry or
/// escalate. Malformed identifiers met during reconciliation never surface as
/// errors, they are reported through
/// [`ReconcileReport`](crate::ReconcileReport) instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The role's counter already holds the largest five digit sequence.
    ///
    /// Issuing another identifier would widen it past six characters, so
    /// generation fails instead.
    #[error("sequence capacity exhausted for role `{role}` (last issued {last})")]
    CapacityExceeded {
        /// The role whose counter is full.
        role: Role,
        /// The last sequence handed out for that role.
        last: u32,
    },

    /// The input is not a well-formed patient identifier.
    #[error("malformed patient identifier {input:?}: {reason}")]
    MalformedIdentifier {
        /// The rejected input, verbatim.
        input: String,
        /// Why it was rejected.
        reason: ParseError,
    },

    /// The role label is not one of the known beneficiary or worker roles.
    ///
    /// Only the strict parser returns this. Generation itself falls back to
    /// [`Role::Unknown`] and prefix `9`.
    #[error("unknown role {label:?}")]
    UnknownRole {
        /// The rejected label.
        label: String,
    },

    /// The registry already holds a record under the identifier that was just
    /// generated, typically because another device issued it from a stale
    /// counter.
    #[error("patient identifier {id} is already taken (after {attempts} attempt(s))")]
    ConcurrentIssuanceConflict {
        /// The identifier that lost the reservation race.
        id: PatientId,
        /// How many reservations were attempted before giving up.
        attempts: u32,
    },

    /// Records loaded from storage share an identifier, so the store already
    /// violates uniqueness.
    #[error("patient identifier {id} is held by more than one stored record")]
    DuplicateIdentifier {
        /// The shared identifier.
        id: PatientId,
    },

    /// A beneficiary record failed validation before any identifier was
    /// issued for it.
    #[error("invalid beneficiary: {reason}")]
    InvalidBeneficiary {
        /// What was wrong with the record.
        reason: &'static str,
    },

    /// The record store could not be read or written.
    #[error("record store unavailable: {message}")]
    Storage {
        /// What the store reported.
        message: String,
    },

    /// The operation failed because a lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::mutex::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
