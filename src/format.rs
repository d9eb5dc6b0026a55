//! Card number formatting utilities.
//!
//! Groups a digit string for display according to the matched definition's
//! [`GroupPattern`]:
//!
//! - **Repeat(4)** (Visa, Mastercard, ...): `XXXX XXXX XXXX XXXX`
//! - **Slots 4-6-5** (American Express): `XXXX XXXXXX XXXXX`
//! - **Slots 4-6-4** (Diners Club): `XXXX XXXXXX XXXX`
//!
//! Input longer than the definition's largest length is truncated first.
//!
//! # Example
//!
//! ```
//! use cc_format::format::{format_card_number, Separator};
//! use cc_format::CardRegistry;
//!
//! let registry = CardRegistry::builtin();
//!
//! let visa = registry.detect("4111111111111111", &[]);
//! assert_eq!(
//!     format_card_number(visa, "4111111111111111", Separator::default()).unwrap(),
//!     "4111 1111 1111 1111"
//! );
//!
//! let amex = registry.detect("341234567890123", &[]);
//! assert_eq!(
//!     format_card_number(amex, "341234567890123", Separator::new("-").unwrap()).unwrap(),
//!     "3412-345678-90123"
//! );
//! ```

use std::fmt;

use crate::card::{CardDefinition, GroupPattern};
use crate::error::FormatError;

/// A single-character group separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Separator(char);

impl Separator {
    /// Validates a separator given as text.
    ///
    /// # Errors
    ///
    /// [`FormatError::EmptySeparator`] for `""`, and
    /// [`FormatError::SeparatorTooLong`] for anything longer than one character.
    ///
    /// ```
    /// use cc_format::format::Separator;
    ///
    /// assert_eq!(Separator::new("-").unwrap().as_char(), '-');
    /// assert!(Separator::new("").is_err());
    /// assert!(Separator::new(" - ").is_err());
    /// ```
    pub fn new(separator: &str) -> Result<Self, FormatError> {
        let mut chars = separator.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(FormatError::EmptySeparator),
            (Some(c), None) => Ok(Self(c)),
            (Some(_), Some(_)) => Err(FormatError::SeparatorTooLong {
                separator: separator.to_string(),
            }),
        }
    }

    /// Returns the separator character.
    #[inline]
    pub const fn as_char(&self) -> char {
        self.0
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self(' ')
    }
}

impl From<char> for Separator {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Formats a card number for display.
///
/// # Arguments
///
/// * `definition` - The detected definition; `None` returns the input unchanged.
/// * `digits` - The card number with separators already stripped.
/// * `separator` - Placed between groups.
///
/// # Returns
///
/// The grouped number. `None` only when a slot-sequence definition receives
/// empty input, since not even its first slot can be filled.
///
/// # Example
///
/// ```
/// use cc_format::format::{format_card_number, Separator};
/// use cc_format::CardRegistry;
///
/// let amex = CardRegistry::builtin().detect("34", &[]);
///
/// // Trailing slots that receive nothing are dropped
/// assert_eq!(
///     format_card_number(amex, "3412345678", Separator::default()).unwrap(),
///     "3412 345678"
/// );
///
/// // Without a definition the input comes back as-is
/// assert_eq!(format_card_number(None, "1234", Separator::default()).unwrap(), "1234");
/// ```
pub fn format_card_number(
    definition: Option<&CardDefinition>,
    digits: &str,
    separator: Separator,
) -> Option<String> {
    let Some(definition) = definition else {
        return Some(digits.to_string());
    };

    let groups = group(definition, digits);
    if groups.is_empty() && matches!(definition.format(), GroupPattern::Slots(_)) {
        return None;
    }

    let mut result = String::with_capacity(digits.len() + groups.len());
    for (i, g) in groups.iter().enumerate() {
        if i > 0 {
            result.push(separator.as_char());
        }
        result.push_str(g);
    }
    Some(result)
}

/// Formats with a separator given as text, validating it first.
///
/// # Errors
///
/// Returns a [`FormatError`] if `separator` is not exactly one character.
///
/// ```
/// use cc_format::format::format_with_separator;
/// use cc_format::CardRegistry;
///
/// let visa = CardRegistry::builtin().detect("4", &[]);
/// assert_eq!(
///     format_with_separator(visa, "4111111111111111", "-").unwrap().unwrap(),
///     "4111-1111-1111-1111"
/// );
/// assert!(format_with_separator(visa, "4111111111111111", "--").is_err());
/// ```
pub fn format_with_separator(
    definition: Option<&CardDefinition>,
    digits: &str,
    separator: &str,
) -> Result<Option<String>, FormatError> {
    let separator = Separator::new(separator)?;
    Ok(format_card_number(definition, digits, separator))
}

/// Splits a card number into its display groups without joining them.
///
/// ```
/// use cc_format::format::split_into_groups;
/// use cc_format::CardRegistry;
///
/// let amex = CardRegistry::builtin().detect("37", &[]).unwrap();
/// assert_eq!(split_into_groups(amex, "378282246310005"), vec!["3782", "822463", "10005"]);
/// ```
pub fn split_into_groups(definition: &CardDefinition, digits: &str) -> Vec<String> {
    group(definition, digits)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Strips all formatting from a card number, leaving only ASCII digits.
///
/// ```
/// use cc_format::format::strip_formatting;
///
/// assert_eq!(strip_formatting("4111 1111 1111 1111"), "4111111111111111");
/// assert_eq!(strip_formatting("4111-1111-1111-1111"), "4111111111111111");
/// ```
pub fn strip_formatting(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Truncates to the definition's maximum length and cuts the groups.
fn group<'a>(definition: &CardDefinition, digits: &'a str) -> Vec<&'a str> {
    let mut rest = match definition.max_length() {
        Some(max) => split_chars(digits, max).0,
        None => digits,
    };

    let mut groups = Vec::new();
    match definition.format() {
        GroupPattern::Repeat(width) => {
            let width = (*width).max(1);
            while !rest.is_empty() {
                let (head, tail) = split_chars(rest, width);
                groups.push(head);
                rest = tail;
            }
        }
        GroupPattern::Slots(widths) => {
            for &width in widths {
                let (head, tail) = split_chars(rest, width);
                if head.is_empty() {
                    break;
                }
                groups.push(head);
                rest = tail;
            }
        }
    }
    groups
}

/// Splits after the first `n` characters.
fn split_chars(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}
