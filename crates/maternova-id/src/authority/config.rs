use core::num::NonZeroU32;

use crate::IssuancePolicy;

/// Tuning for an [`IdentifierAuthority`](crate::IdentifierAuthority).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorityConfig {
    /// How ASHA and unrecognised roles are issued.
    pub policy: IssuancePolicy,
    /// Reservation attempts per registration before giving up with
    /// [`Error::ConcurrentIssuanceConflict`](crate::Error::ConcurrentIssuanceConflict).
    pub max_attempts: NonZeroU32,
}

impl AuthorityConfig {
    /// Default bound on reservation attempts.
    pub const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = NonZeroU32::new(8).unwrap();

    /// Sets the issuance policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: IssuancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the reservation attempt bound.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: NonZeroU32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            policy: IssuancePolicy::default(),
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}
