//! CVV/CVC/CID handling for card security codes.
//!
//! The accepted lengths come from the detected [`CardDefinition`]:
//!
//! - American Express: 3 or 4 digits
//! - All other built-in networks: 3 digits
//!
//! # Example
//!
//! ```
//! use cc_format::cvv::{sanitize_cvc, validate_cvc, CvcError};
//! use cc_format::CardRegistry;
//!
//! let registry = CardRegistry::builtin();
//! let visa = registry.detect("4111", &[]);
//! let amex = registry.detect("3782", &[]);
//!
//! // Input is cut to the longest accepted code
//! assert_eq!(sanitize_cvc("12 34", visa), "123");
//! assert_eq!(sanitize_cvc("12345", amex), "1234");
//!
//! assert!(validate_cvc("123", visa).is_ok());
//! assert!(validate_cvc("1234", amex).is_ok());
//! assert!(matches!(validate_cvc("12", visa), Err(CvcError::InvalidLength { .. })));
//! assert_eq!(validate_cvc("123", None), Err(CvcError::UnknownCard));
//! ```

use std::fmt;

use crate::card::CardDefinition;
use crate::format::strip_formatting;

/// Errors that can occur during CVC validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CvcError {
    /// No card was detected, so the expected length is unknown.
    UnknownCard,
    /// The code length is not accepted for the card.
    InvalidLength {
        /// Actual length provided.
        length: usize,
        /// Lengths accepted for the card.
        expected: Vec<usize>,
    },
    /// The code contains a non-digit character.
    InvalidCharacter {
        /// The invalid character found.
        character: char,
        /// Position of the invalid character.
        position: usize,
    },
}

impl fmt::Display for CvcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCard => write!(f, "card type is unknown, cannot check CVC"),
            Self::InvalidLength { length, expected } => {
                let expected: Vec<String> = expected.iter().map(|l| l.to_string()).collect();
                write!(f, "CVC must be {} digits, got {}", expected.join(" or "), length)
            }
            Self::InvalidCharacter {
                character,
                position,
            } => {
                write!(f, "invalid character '{}' at position {}", character, position)
            }
        }
    }
}

impl std::error::Error for CvcError {}

/// Cleans a security code as the user types it.
///
/// Drops non-digits and, when the card is known, truncates to the longest
/// accepted code length.
pub fn sanitize_cvc(input: &str, card: Option<&CardDefinition>) -> String {
    let mut digits = strip_formatting(input);
    if let Some(max) = card.and_then(CardDefinition::max_cvv_length) {
        digits.truncate(max);
    }
    digits
}

/// Validates a security code against the card it belongs to.
///
/// Checks, in order: a card is known, the length is accepted for it, and
/// every character is a digit.
pub fn validate_cvc(input: &str, card: Option<&CardDefinition>) -> Result<(), CvcError> {
    let card = card.ok_or(CvcError::UnknownCard)?;

    let length = input.chars().count();
    if !card.is_valid_cvv_length(length) {
        return Err(CvcError::InvalidLength {
            length,
            expected: card.cvv_lengths().to_vec(),
        });
    }

    if let Some((position, character)) = input.chars().enumerate().find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(CvcError::InvalidCharacter {
            character,
            position,
        });
    }

    Ok(())
}
