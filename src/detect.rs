//! Card type detection by prefix and range matching.
//!
//! The Issuer Identification Number (IIN) is the leading part of a card
//! number. Each [`CardDefinition`] lists the IIN patterns it claims, and
//! detection returns the first definition in table order with a matching
//! pattern.
//!
//! # Partial input
//!
//! Range bounds are compared numerically against however many leading digits
//! are available, without padding. While a number is still being typed this
//! compares a shorter value against wider bounds: `"5"` does not fall in
//! `51..=55`, and `"65"` does not fall in `6440..=6505`. Detection settles
//! once the input is at least as long as the bounds.

use crate::card::{CardDefinition, CardRange, CardType};

/// Detects the card definition for a string of digits.
///
/// # Arguments
///
/// * `digits` - The card number with separators already stripped.
/// * `table` - The definitions to search, in priority order.
/// * `allowed` - Types to consider; an empty slice allows every type.
///
/// # Returns
///
/// The first definition with a matching range, or `None`.
///
/// # Example
///
/// ```
/// use cc_format::detect::detect_card;
/// use cc_format::{CardRegistry, CardType};
///
/// let table = CardRegistry::builtin().definitions();
///
/// let card = detect_card("4000000000000000", table, &[]).unwrap();
/// assert_eq!(card.card_type(), CardType::Visa);
///
/// // Restricting to Visa hides the Mastercard match
/// assert!(detect_card("5100000000000000", table, &[CardType::Visa]).is_none());
/// ```
pub fn detect_card<'a>(
    digits: &str,
    table: &'a [CardDefinition],
    allowed: &[CardType],
) -> Option<&'a CardDefinition> {
    if digits.is_empty() {
        return None;
    }

    table
        .iter()
        .filter(|card| allowed.is_empty() || allowed.contains(&card.card_type()))
        .find(|card| card.matches(digits))
}

/// Returns true if a single pattern matches the leading digits of `digits`.
///
/// Prefix patterns need an exact leading match. Range patterns parse the
/// first `n` characters (`n` = bound width, or fewer if the input is shorter)
/// and test `start <= value <= end`.
pub fn range_matches(range: &CardRange, digits: &str) -> bool {
    match range {
        CardRange::Prefix(prefix) => !prefix.is_empty() && digits.starts_with(prefix.as_str()),
        CardRange::Span(start, end) => {
            let (Ok(low), Ok(high)) = (start.parse::<u64>(), end.parse::<u64>()) else {
                return false;
            };
            let lead = leading(digits, start.len());
            match lead.parse::<u64>() {
                Ok(value) => low <= value && value <= high,
                Err(_) => false,
            }
        }
    }
}

/// Returns at most the first `n` characters of `s`.
fn leading(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
