use core::{fmt, str::FromStr};

use crate::{Error, ParseError, Role};

/// A six character patient identifier: one role prefix digit followed by a
/// zero-padded five digit sequence.
///
/// The width never changes. Construction rejects sequences that would need a
/// sixth digit, so consumers can always slice `id[0..1]` for the prefix and
/// `id[1..6]` for the sequence.
///
/// Identifiers order by prefix first and sequence second, which is also their
/// lexicographic string order.
///
/// # Example
///
/// ```
/// use maternova_id::{PatientId, Role};
///
/// let id = PatientId::from_components(Role::Elderly, 7).unwrap();
/// assert_eq!(id.to_string(), "200007");
///
/// let parsed: PatientId = "200007".parse().unwrap();
/// assert_eq!(parsed, id);
/// assert_eq!(parsed.role(), Role::Elderly);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatientId {
    role: Role,
    sequence: u32,
}

impl PatientId {
    /// Total width of the textual form.
    pub const WIDTH: usize = 6;

    /// Number of digits reserved for the sequence.
    pub const SEQUENCE_DIGITS: usize = 5;

    /// Largest sequence that still fits [`Self::SEQUENCE_DIGITS`].
    pub const MAX_SEQUENCE: u32 = 99_999;

    /// Builds an identifier from a role and a sequence number.
    ///
    /// Returns `None` if `sequence` exceeds [`Self::MAX_SEQUENCE`].
    #[must_use]
    pub const fn from_components(role: Role, sequence: u32) -> Option<Self> {
        if sequence > Self::MAX_SEQUENCE {
            return None;
        }
        Some(Self { role, sequence })
    }

    /// The role encoded in the prefix.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The prefix digit.
    #[must_use]
    pub const fn prefix(&self) -> u8 {
        self.role.prefix()
    }

    /// The numeric suffix.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Parses the fixed-width textual form.
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidLength`] if the input is not six bytes long
    /// - [`ParseError::InvalidDigit`] if any byte is not an ASCII digit
    /// - [`ParseError::UnknownPrefix`] if the prefix digit maps to no role
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let bytes = input.as_bytes();
        if bytes.len() != Self::WIDTH {
            return Err(ParseError::InvalidLength { len: bytes.len() });
        }
        if let Some(position) = bytes.iter().position(|b| !b.is_ascii_digit()) {
            return Err(ParseError::InvalidDigit { position });
        }

        let digit = bytes[0] - b'0';
        let role = Role::from_prefix(digit).ok_or(ParseError::UnknownPrefix { digit })?;
        let sequence = bytes[1..]
            .iter()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));

        Ok(Self { role, sequence })
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:0width$}",
            self.prefix(),
            self.sequence,
            width = Self::SEQUENCE_DIGITS
        )
    }
}

impl FromStr for PatientId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map_err(|reason| Error::MalformedIdentifier {
            input: s.to_owned(),
            reason,
        })
    }
}
