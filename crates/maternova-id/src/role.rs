use core::{fmt, str::FromStr};

use crate::Error;

/// The kind of person an identifier is issued to.
///
/// The set is closed: anything that is not a known worker or beneficiary role
/// is [`Role::Unknown`], which maps to the reserved prefix `9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Role {
    /// Accredited Social Health Activist, the community health worker.
    Asha = 0,
    /// An expecting mother.
    Pregnant = 1,
    /// A senior citizen.
    Elderly = 2,
    /// The parent or guardian of an infant.
    InfantFamily = 3,
    /// Any role outside the known set.
    Unknown = 4,
}

/// Role to prefix digit. Both directions of the mapping are derived from this
/// table and nothing else.
const PREFIXES: [(Role, u8); Role::COUNT] = [
    (Role::Asha, 0),
    (Role::Pregnant, 1),
    (Role::Elderly, 2),
    (Role::InfantFamily, 3),
    (Role::Unknown, 9),
];

impl Role {
    /// Number of roles, including [`Role::Unknown`].
    pub const COUNT: usize = 5;

    /// Every role, in counter slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Asha,
        Self::Pregnant,
        Self::Elderly,
        Self::InfantFamily,
        Self::Unknown,
    ];

    /// The beneficiary roles whose identifiers have always been counted.
    pub const BENEFICIARIES: [Self; 3] = [Self::Pregnant, Self::Elderly, Self::InfantFamily];

    /// Slot of this role in per-role arrays such as counter banks.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The leading digit of every identifier issued for this role.
    #[must_use]
    pub const fn prefix(self) -> u8 {
        PREFIXES[self.index()].1
    }

    /// The role encoded by an identifier's prefix digit.
    ///
    /// Digits outside the table (4 through 8, or anything above 9) yield
    /// `None`. Prefix `9` yields `Some(Role::Unknown)`.
    #[must_use]
    pub fn from_prefix(digit: u8) -> Option<Self> {
        PREFIXES
            .iter()
            .find(|(_, prefix)| *prefix == digit)
            .map(|(role, _)| *role)
    }

    /// Parses a role label leniently, mapping anything unrecognised to
    /// [`Role::Unknown`].
    ///
    /// Labels are trimmed and compared case-insensitively. `infant` is
    /// accepted as a synonym for `infant_family`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Self::Unknown)
    }

    /// The machine label, as stored alongside beneficiary records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asha => "asha",
            Self::Pregnant => "pregnant",
            Self::Elderly => "elderly",
            Self::InfantFamily => "infant_family",
            Self::Unknown => "unknown",
        }
    }

    /// Human readable name shown on login and record screens.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Asha => "ASHA Worker",
            Self::Pregnant => "Pregnant Woman",
            Self::Elderly => "Elderly Person",
            Self::InfantFamily => "Infant Family",
            Self::Unknown => "Unknown",
        }
    }

    /// One-line description of who holds this role.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Asha => "Community Health Worker",
            Self::Pregnant => "Expecting Mother",
            Self::Elderly => "Senior Citizen",
            Self::InfantFamily => "Parent/Guardian of Infant",
            Self::Unknown => "Unrecognised role",
        }
    }

    /// Whether this role is a beneficiary tracked by the health worker.
    #[must_use]
    pub const fn is_beneficiary(self) -> bool {
        matches!(self, Self::Pregnant | Self::Elderly | Self::InfantFamily)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    /// Strict parse: unrecognised labels are an [`Error::UnknownRole`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let role = match label.to_ascii_lowercase().as_str() {
            "asha" => Self::Asha,
            "pregnant" => Self::Pregnant,
            "elderly" => Self::Elderly,
            "infant_family" | "infant" => Self::InfantFamily,
            _ => {
                return Err(Error::UnknownRole {
                    label: label.to_owned(),
                });
            }
        };
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_round_trips_for_every_role() {
        for role in Role::ALL {
            assert_eq!(Role::from_prefix(role.prefix()), Some(role));
        }
    }

    #[test]
    fn prefixes_match_the_issued_format() {
        assert_eq!(Role::Asha.prefix(), 0);
        assert_eq!(Role::Pregnant.prefix(), 1);
        assert_eq!(Role::Elderly.prefix(), 2);
        assert_eq!(Role::InfantFamily.prefix(), 3);
        assert_eq!(Role::Unknown.prefix(), 9);
    }

    #[test]
    fn unassigned_prefixes_have_no_role() {
        for digit in 4..=8 {
            assert_eq!(Role::from_prefix(digit), None);
        }
        assert_eq!(Role::from_prefix(10), None);
    }

    #[test]
    fn index_matches_slot_order() {
        for (slot, role) in Role::ALL.into_iter().enumerate() {
            assert_eq!(role.index(), slot);
        }
    }

    #[test]
    fn strict_parse_rejects_unknown_labels() {
        assert_eq!(" Pregnant ".parse::<Role>().unwrap(), Role::Pregnant);
        assert_eq!("infant".parse::<Role>().unwrap(), Role::InfantFamily);
        assert_eq!(
            "doctor".parse::<Role>().unwrap_err(),
            Error::UnknownRole {
                label: "doctor".into()
            }
        );
    }

    #[test]
    fn lenient_parse_falls_back_to_unknown() {
        assert_eq!(Role::from_label("ASHA"), Role::Asha);
        assert_eq!(Role::from_label("infant_family"), Role::InfantFamily);
        assert_eq!(Role::from_label("doctor"), Role::Unknown);
        assert_eq!(Role::from_label(""), Role::Unknown);
    }

    #[test]
    fn labels_round_trip_through_display() {
        for role in Role::BENEFICIARIES.into_iter().chain([Role::Asha]) {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert_eq!(Role::Unknown.to_string(), "unknown");
    }
}
