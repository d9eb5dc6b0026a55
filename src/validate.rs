//! Composite validation of a complete card number.
//!
//! Checks run in a fixed order and stop at the first failure, so every
//! rejection has exactly one cause:
//!
//! 1. Detection against the whole registry ([`ValidationError::UnknownCard`])
//! 2. The allow-list, if non-empty ([`ValidationError::DisallowedType`])
//! 3. The definition's lengths ([`ValidationError::WrongLength`])
//! 4. The Luhn checksum, if required ([`ValidationError::ChecksumFailure`])

use crate::card::{CardType, ValidatedCard};
use crate::error::ValidationError;
use crate::format::strip_formatting;
use crate::luhn;
use crate::registry::CardRegistry;

/// Validates a card number.
///
/// Non-digit characters are stripped before any check, so formatted input is
/// accepted as-is.
///
/// # Arguments
///
/// * `input` - The card number, formatted or not.
/// * `registry` - The definitions to detect against.
/// * `allowed` - Accepted card types; an empty slice accepts every type.
///
/// # Example
///
/// ```
/// use cc_format::{validate_card, CardRegistry, CardType, ValidationError};
///
/// let registry = CardRegistry::builtin();
///
/// let card = validate_card("4111 1111 1111 1111", registry, &[]).unwrap();
/// assert_eq!(card.card_type(), CardType::Visa);
/// assert_eq!(card.last_four(), "1111");
///
/// assert_eq!(
///     validate_card("4111111111111112", registry, &[]).unwrap_err(),
///     ValidationError::ChecksumFailure
/// );
/// ```
pub fn validate_card<'r>(
    input: &str,
    registry: &'r CardRegistry,
    allowed: &[CardType],
) -> Result<ValidatedCard<'r>, ValidationError> {
    let digits = strip_formatting(input);

    // Detect without the filter so a disallowed card is reported as such
    // rather than as unknown.
    let definition = registry
        .detect(&digits, &[])
        .ok_or(ValidationError::UnknownCard)?;

    let card_type = definition.card_type();
    if !allowed.is_empty() && !allowed.contains(&card_type) {
        return Err(ValidationError::DisallowedType { card_type });
    }

    if !definition.is_valid_length(digits.len()) {
        return Err(ValidationError::WrongLength {
            card_type,
            length: digits.len(),
            valid_lengths: definition.lengths().to_vec(),
        });
    }

    if definition.luhn_required() && !luhn::is_luhn_valid(&digits) {
        return Err(ValidationError::ChecksumFailure);
    }

    Ok(ValidatedCard::new(definition, digits))
}

/// Quickly checks a card number against the built-in registry.
///
/// ```
/// use cc_format::is_valid;
///
/// assert!(is_valid("4111-1111-1111-1111"));
/// assert!(!is_valid("4111-1111-1111-1112"));
/// ```
#[inline]
pub fn is_valid(input: &str) -> bool {
    validate_card(input, CardRegistry::builtin(), &[]).is_ok()
}
