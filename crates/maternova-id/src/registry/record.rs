use crate::{Error, PatientId, Result, Role};

/// Phone number recorded when a beneficiary logs in without giving one.
pub const DEFAULT_PHONE: &str = "9999999999";

/// A beneficiary or worker who has not been issued an identifier yet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewBeneficiary {
    /// Role the identifier will encode.
    pub role: Role,
    /// Full name as typed at login.
    pub name: String,
    /// Contact number, if given.
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone: Option<String>,
    /// Home village, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub village: Option<String>,
    /// The ASHA worker responsible for this beneficiary.
    #[cfg_attr(feature = "serde", serde(default))]
    pub assigned_asha_id: Option<PatientId>,
}

impl NewBeneficiary {
    /// Starts a record with only the required fields.
    pub fn new(role: Role, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            phone: None,
            village: None,
            assigned_asha_id: None,
        }
    }

    /// Sets the contact number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the home village.
    #[must_use]
    pub fn with_village(mut self, village: impl Into<String>) -> Self {
        self.village = Some(village.into());
        self
    }

    /// Assigns the responsible ASHA worker.
    #[must_use]
    pub fn assigned_to(mut self, asha: PatientId) -> Self {
        self.assigned_asha_id = Some(asha);
        self
    }

    /// Checks the record can be issued an identifier.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBeneficiary`] if the name is blank, or if the assigned
    /// worker's identifier does not carry the ASHA prefix.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidBeneficiary {
                reason: "name must not be blank",
            });
        }
        if self
            .assigned_asha_id
            .is_some_and(|asha| asha.role() != Role::Asha)
        {
            return Err(Error::InvalidBeneficiary {
                reason: "assigned worker must hold an ASHA identifier",
            });
        }
        Ok(())
    }
}

/// A beneficiary or worker record keyed by its issued identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeneficiaryProfile {
    /// The issued identifier.
    pub patient_id: PatientId,
    /// Role at issuance. Always equal to `patient_id.role()`.
    pub role: Role,
    /// Trimmed full name.
    pub name: String,
    /// Contact number, [`DEFAULT_PHONE`] when none was given.
    pub phone: String,
    /// Home village, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub village: Option<String>,
    /// The responsible ASHA worker.
    #[cfg_attr(feature = "serde", serde(default))]
    pub assigned_asha_id: Option<PatientId>,
    /// Issuance time in milliseconds since the Unix epoch.
    pub created_at_millis: u64,
}

impl BeneficiaryProfile {
    /// Builds the record stored under a freshly generated identifier.
    pub fn issue(patient_id: PatientId, new: &NewBeneficiary, created_at_millis: u64) -> Self {
        Self {
            patient_id,
            role: patient_id.role(),
            name: new.name.trim().to_owned(),
            phone: new
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|phone| !phone.is_empty())
                .unwrap_or(DEFAULT_PHONE)
                .to_owned(),
            village: new.village.clone(),
            assigned_asha_id: new.assigned_asha_id,
            created_at_millis,
        }
    }

    /// Whether this record belongs to the person logging in as `role` under
    /// `name`. Names compare trimmed and case-insensitively. The role is read
    /// from the identifier, not from the stored `role` field.
    #[must_use]
    pub fn matches(&self, role: Role, name: &str) -> bool {
        self.patient_id.role() == role
            && self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Checks a record read back from storage.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBeneficiary`] if the stored `role` disagrees with the
    /// role encoded in `patient_id`.
    pub fn check(&self) -> Result<()> {
        if self.role != self.patient_id.role() {
            return Err(Error::InvalidBeneficiary {
                reason: "stored role does not match the identifier prefix",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> PatientId {
        text.parse().unwrap()
    }

    #[test]
    fn blank_names_are_rejected() {
        let err = NewBeneficiary::new(Role::Elderly, "   ").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidBeneficiary { .. }));
    }

    #[test]
    fn assigned_worker_must_be_asha() {
        let ok = NewBeneficiary::new(Role::Pregnant, "Sita").assigned_to(id("000007"));
        assert!(ok.validate().is_ok());

        let bad = NewBeneficiary::new(Role::Pregnant, "Sita").assigned_to(id("200007"));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn issue_normalises_fields() {
        let new = NewBeneficiary::new(Role::InfantFamily, "  Meena Devi ")
            .with_phone(" ")
            .with_village("Rampur");
        let profile = BeneficiaryProfile::issue(id("300004"), &new, 42);

        assert_eq!(profile.name, "Meena Devi");
        assert_eq!(profile.phone, DEFAULT_PHONE);
        assert_eq!(profile.role, Role::InfantFamily);
        assert_eq!(profile.village.as_deref(), Some("Rampur"));
        assert_eq!(profile.created_at_millis, 42);
    }

    #[test]
    fn matches_ignores_case_and_padding() {
        let new = NewBeneficiary::new(Role::Elderly, "Ram Prasad");
        let profile = BeneficiaryProfile::issue(id("200001"), &new, 0);

        assert!(profile.matches(Role::Elderly, " ram prasad"));
        assert!(!profile.matches(Role::Pregnant, "Ram Prasad"));
        assert!(!profile.matches(Role::Elderly, "Ram"));
    }

    #[test]
    fn matches_trims_hand_edited_names() {
        let mut profile = BeneficiaryProfile::issue(
            id("100003"),
            &NewBeneficiary::new(Role::Pregnant, "Sita"),
            0,
        );
        profile.name = "  Sita Devi  ".into();

        assert!(profile.matches(Role::Pregnant, "sita devi"));
        assert!(profile.matches(Role::Pregnant, " SITA DEVI "));
    }

    #[test]
    fn role_comes_from_the_identifier() {
        let mut profile =
            BeneficiaryProfile::issue(id("100001"), &NewBeneficiary::new(Role::Pregnant, "Sita"), 0);
        assert!(profile.check().is_ok());

        profile.role = Role::Elderly;
        assert!(matches!(profile.check(), Err(Error::InvalidBeneficiary { .. })));
        assert!(!profile.matches(Role::Elderly, "Sita"));
        assert!(profile.matches(Role::Pregnant, "Sita"));
    }
}
