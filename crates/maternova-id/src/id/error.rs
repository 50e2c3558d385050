/// Reasons a string fails to parse as a [`PatientId`](crate::PatientId).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
#[non_exhaustive]
pub enum ParseError {
    /// The input is not exactly six bytes long.
    #[error("expected 6 characters, found {len}")]
    InvalidLength {
        /// Length of the input in bytes.
        len: usize,
    },

    /// A character other than an ASCII digit was found.
    #[error("non-digit character at position {position}")]
    InvalidDigit {
        /// Byte offset of the offending character.
        position: usize,
    },

    /// The leading digit is not assigned to any role.
    #[error("prefix {digit} is not assigned to a role")]
    UnknownPrefix {
        /// The unassigned prefix digit.
        digit: u8,
    },
}
