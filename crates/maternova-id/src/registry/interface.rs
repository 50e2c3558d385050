use std::sync::Arc;

use crate::{BeneficiaryProfile, PatientId, Result, Role};

/// Outcome of a reservation write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reservation {
    /// The record was stored under its identifier.
    Reserved,
    /// Another record already holds the identifier; nothing was written.
    Taken,
}

/// The record store as seen by identifier issuance.
///
/// The store is the only thing several devices share, so it is also what
/// arbitrates between them: [`PatientRegistry::reserve`] must be an atomic
/// insert-if-absent keyed by the identifier (a unique-key insert, a
/// conditional put, a compare-and-swap). Everything else is read-only.
pub trait PatientRegistry {
    /// Every identifier currently stored, verbatim.
    ///
    /// Entries are strings because storage may hold values written by older
    /// or buggy clients; reconciliation skips anything malformed.
    ///
    /// # Errors
    ///
    /// [`Error::Storage`](crate::Error::Storage) if the store cannot be read.
    fn issued_ids(&self) -> Result<Vec<String>>;

    /// Stores `profile` unless its identifier is already taken.
    ///
    /// # Errors
    ///
    /// [`Error::Storage`](crate::Error::Storage) if the store cannot be
    /// written. A taken identifier is not an error; it is
    /// [`Reservation::Taken`].
    fn reserve(&self, profile: &BeneficiaryProfile) -> Result<Reservation>;

    /// Looks up the record for someone logging in as `role` under `name`.
    ///
    /// # Errors
    ///
    /// [`Error::Storage`](crate::Error::Storage) if the store cannot be read.
    fn find(&self, role: Role, name: &str) -> Result<Option<BeneficiaryProfile>>;

    /// Fetches the record stored under `id`.
    ///
    /// # Errors
    ///
    /// [`Error::Storage`](crate::Error::Storage) if the store cannot be read.
    fn get(&self, id: PatientId) -> Result<Option<BeneficiaryProfile>>;
}

impl<R: PatientRegistry + ?Sized> PatientRegistry for &R {
    fn issued_ids(&self) -> Result<Vec<String>> {
        (**self).issued_ids()
    }

    fn reserve(&self, profile: &BeneficiaryProfile) -> Result<Reservation> {
        (**self).reserve(profile)
    }

    fn find(&self, role: Role, name: &str) -> Result<Option<BeneficiaryProfile>> {
        (**self).find(role, name)
    }

    fn get(&self, id: PatientId) -> Result<Option<BeneficiaryProfile>> {
        (**self).get(id)
    }
}

impl<R: PatientRegistry + ?Sized> PatientRegistry for Arc<R> {
    fn issued_ids(&self) -> Result<Vec<String>> {
        (**self).issued_ids()
    }

    fn reserve(&self, profile: &BeneficiaryProfile) -> Result<Reservation> {
        (**self).reserve(profile)
    }

    fn find(&self, role: Role, name: &str) -> Result<Option<BeneficiaryProfile>> {
        (**self).find(role, name)
    }

    fn get(&self, id: PatientId) -> Result<Option<BeneficiaryProfile>> {
        (**self).get(id)
    }
}
