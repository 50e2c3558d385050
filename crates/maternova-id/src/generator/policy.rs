use core::{fmt, str::FromStr};

use crate::Role;

/// How identifiers are issued for roles outside the three beneficiary roles.
///
/// Pregnant, elderly and infant-family identifiers are always counted. The
/// policy decides what happens to ASHA workers (prefix `0`) and unrecognised
/// roles (prefix `9`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IssuancePolicy {
    /// Every role draws from its own counter, and reconciliation tracks every
    /// prefix. No identifier is ever reused.
    #[default]
    Sequential,

    /// ASHA and unrecognised roles take the low five digits of the current
    /// millisecond timestamp instead of a counter, and reconciliation ignores
    /// prefixes `0` and `9`.
    ///
    /// Two issuances in the same millisecond (or 100 seconds apart) collide.
    /// Kept for compatibility with identifiers issued by older deployments.
    Clock,
}

impl IssuancePolicy {
    /// Whether `role` draws from a counter under this policy.
    #[must_use]
    pub const fn is_sequential(self, role: Role) -> bool {
        match self {
            Self::Sequential => true,
            Self::Clock => role.is_beneficiary(),
        }
    }

    /// The configuration label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Clock => "clock",
        }
    }
}

impl fmt::Display for IssuancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssuancePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "clock" => Ok(Self::Clock),
            other => Err(format!("unknown issuance policy `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beneficiaries_are_always_counted() {
        for policy in [IssuancePolicy::Sequential, IssuancePolicy::Clock] {
            for role in Role::BENEFICIARIES {
                assert!(policy.is_sequential(role));
            }
        }
    }

    #[test]
    fn clock_policy_exempts_workers_and_unknown_roles() {
        assert!(!IssuancePolicy::Clock.is_sequential(Role::Asha));
        assert!(!IssuancePolicy::Clock.is_sequential(Role::Unknown));
        assert!(IssuancePolicy::Sequential.is_sequential(Role::Asha));
        assert!(IssuancePolicy::Sequential.is_sequential(Role::Unknown));
    }

    #[test]
    fn parses_labels() {
        assert_eq!("Clock".parse(), Ok(IssuancePolicy::Clock));
        assert_eq!(" sequential".parse(), Ok(IssuancePolicy::Sequential));
        assert!("random".parse::<IssuancePolicy>().is_err());
    }
}
