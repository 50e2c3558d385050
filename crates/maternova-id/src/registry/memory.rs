use std::collections::BTreeMap;

use crate::{
    BeneficiaryProfile, Error, PatientId, PatientRegistry, Reservation, Result, Role,
    mutex::{Mutex, lock},
};

/// A thread-safe, in-memory [`PatientRegistry`].
///
/// Wrap it in an [`Arc`](std::sync::Arc) to let several
/// [`IdentifierAuthority`](crate::IdentifierAuthority)s (standing in for
/// devices) share one store.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    profiles: Mutex<BTreeMap<PatientId, BeneficiaryProfile>>,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads previously stored records.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateIdentifier`] if two records share an identifier
    /// - [`Error::InvalidBeneficiary`] if a record's role disagrees with its
    ///   identifier
    pub fn from_profiles<I>(profiles: I) -> Result<Self>
    where
        I: IntoIterator<Item = BeneficiaryProfile>,
    {
        let mut map = BTreeMap::new();
        for profile in profiles {
            profile.check()?;
            let id = profile.patient_id;
            if map.insert(id, profile).is_some() {
                return Err(Error::DuplicateIdentifier { id });
            }
        }
        Ok(Self {
            profiles: Mutex::new(map),
        })
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// May return an error if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(lock!(self.profiles).len())
    }

    /// Whether no records are stored.
    ///
    /// # Errors
    ///
    /// May return an error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(lock!(self.profiles).is_empty())
    }

    /// All records, ordered by identifier.
    ///
    /// # Errors
    ///
    /// May return an error if the lock is poisoned.
    pub fn profiles(&self) -> Result<Vec<BeneficiaryProfile>> {
        Ok(lock!(self.profiles).values().cloned().collect())
    }

    /// Records whose identifier carries `role`'s prefix, ordered by
    /// identifier.
    ///
    /// # Errors
    ///
    /// May return an error if the lock is poisoned.
    pub fn profiles_for(&self, role: Role) -> Result<Vec<BeneficiaryProfile>> {
        Ok(lock!(self.profiles)
            .values()
            .filter(|profile| profile.patient_id.role() == role)
            .cloned()
            .collect())
    }
}

impl PatientRegistry for MemoryRegistry {
    fn issued_ids(&self) -> Result<Vec<String>> {
        Ok(lock!(self.profiles).keys().map(ToString::to_string).collect())
    }

    fn reserve(&self, profile: &BeneficiaryProfile) -> Result<Reservation> {
        let mut profiles = lock!(self.profiles);
        if profiles.contains_key(&profile.patient_id) {
            return Ok(Reservation::Taken);
        }
        profiles.insert(profile.patient_id, profile.clone());
        Ok(Reservation::Reserved)
    }

    fn find(&self, role: Role, name: &str) -> Result<Option<BeneficiaryProfile>> {
        Ok(lock!(self.profiles)
            .values()
            .find(|profile| profile.matches(role, name))
            .cloned())
    }

    fn get(&self, id: PatientId) -> Result<Option<BeneficiaryProfile>> {
        Ok(lock!(self.profiles).get(&id).cloned())
    }
}
