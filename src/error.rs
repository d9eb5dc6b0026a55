//! Error types for detection, formatting, registry configuration and validation.
//!
//! Failed detection is never an error (it is `None`). Errors are reserved for
//! API misuse (a bad separator, a malformed registry) and for the composite
//! validation outcomes, which stay distinct so callers can report each one.

use crate::CardType;
use std::fmt;

/// Reasons a card number is rejected by [`validate_card`](crate::validate_card).
///
/// Checks run in declaration order and the first failure is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No definition in the registry matches the number's prefix.
    UnknownCard,

    /// A definition matched, but its type is not in the allow-list.
    DisallowedType {
        /// The detected card type.
        card_type: CardType,
    },

    /// The number of digits is not one of the definition's lengths.
    WrongLength {
        /// The detected card type.
        card_type: CardType,
        /// The actual number of digits.
        length: usize,
        /// The lengths accepted for this definition.
        valid_lengths: Vec<usize>,
    },

    /// The Luhn checksum is required and failed.
    ChecksumFailure,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCard => {
                write!(f, "unknown card type - check the card number prefix")
            }
            Self::DisallowedType { card_type } => {
                write!(f, "{} cards are not accepted", card_type)
            }
            Self::WrongLength {
                card_type,
                length,
                valid_lengths,
            } => {
                let valid_str: Vec<String> =
                    valid_lengths.iter().map(|l| l.to_string()).collect();
                write!(
                    f,
                    "{} cards must have {} digits, got {}",
                    card_type,
                    valid_str.join(" or "),
                    length
                )
            }
            Self::ChecksumFailure => {
                write!(f, "invalid checksum (Luhn check failed) - please verify the card number")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Misuse of the formatter API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The separator was an empty string.
    EmptySeparator,
    /// The separator was longer than one character.
    SeparatorTooLong {
        /// The rejected separator.
        separator: String,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySeparator => write!(f, "separator cannot be empty"),
            Self::SeparatorTooLong { separator } => write!(
                f,
                "separator must be one character, got {:?}",
                separator
            ),
        }
    }
}

impl std::error::Error for FormatError {}

/// A card registry could not be built or loaded.
#[derive(Debug)]
pub enum RegistryError {
    /// The table contains no definitions.
    Empty,
    /// A definition has no ranges.
    NoRanges {
        /// Position of the definition in the table.
        index: usize,
        /// Its card type.
        card_type: CardType,
    },
    /// A prefix pattern is empty or not all digits.
    InvalidPrefix {
        /// Position of the definition in the table.
        index: usize,
        /// The offending prefix.
        prefix: String,
    },
    /// A range pattern has malformed bounds.
    InvalidRange {
        /// Position of the definition in the table.
        index: usize,
        /// Lower bound as written.
        start: String,
        /// Upper bound as written.
        end: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// `lengths` is empty or not strictly ascending.
    InvalidLengths {
        /// Position of the definition in the table.
        index: usize,
    },
    /// `cvvLengths` is empty or not strictly ascending.
    InvalidCvvLengths {
        /// Position of the definition in the table.
        index: usize,
    },
    /// The grouping pattern has a zero width or no slots.
    InvalidFormat {
        /// Position of the definition in the table.
        index: usize,
    },
    /// The configuration text could not be parsed.
    Parse(String),
    /// The configuration file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "card registry is empty"),
            Self::NoRanges { index, card_type } => {
                write!(f, "definition #{} ({}) has no ranges", index, card_type)
            }
            Self::InvalidPrefix { index, prefix } => {
                write!(f, "definition #{}: invalid prefix {:?}", index, prefix)
            }
            Self::InvalidRange {
                index,
                start,
                end,
                reason,
            } => write!(
                f,
                "definition #{}: invalid range [{:?}, {:?}]: {}",
                index, start, end, reason
            ),
            Self::InvalidLengths { index } => write!(
                f,
                "definition #{}: lengths must be non-empty and ascending",
                index
            ),
            Self::InvalidCvvLengths { index } => write!(
                f,
                "definition #{}: cvvLengths must be non-empty and ascending",
                index
            ),
            Self::InvalidFormat { index } => write!(
                f,
                "definition #{}: group widths must be at least 1",
                index
            ),
            Self::Parse(msg) => write!(f, "registry parse error: {}", msg),
            Self::Io(e) => write!(f, "registry I/O error: {}", e),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A string did not name a known card type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCardTypeError {
    pub(crate) input: String,
}

impl fmt::Display for ParseCardTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown card type {:?}", self.input)
    }
}

impl std::error::Error for ParseCardTypeError {}
