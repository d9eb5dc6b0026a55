//! Display-safe transforms for card data.
//!
//! Only the last few digits of a card number, and nothing of a security code,
//! should ever reach a screen or a log line.

use crate::format::{format_card_number, strip_formatting, Separator};
use crate::registry::CardRegistry;

/// Masks every character of a security code.
///
/// ```
/// use cc_format::mask::mask_cvv;
///
/// assert_eq!(mask_cvv("123"), "***");
/// assert_eq!(mask_cvv(""), "");
/// ```
pub fn mask_cvv(cvv: &str) -> String {
    "*".repeat(cvv.chars().count())
}

/// Replaces every character but the last `visible` with `*`.
///
/// ```
/// use cc_format::mask::mask_digits;
///
/// assert_eq!(mask_digits("4111111111111111", 4), "************1111");
/// assert_eq!(mask_digits("123", 4), "123");
/// ```
pub fn mask_digits(digits: &str, visible: usize) -> String {
    let len = digits.chars().count();
    let hidden = len.saturating_sub(visible);
    digits
        .chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { '*' } else { c })
        .collect()
}

/// Formats a card number for display, optionally hiding all but the last digits.
///
/// The number is detected against `registry` and grouped; an unknown number
/// keeps the text it was given. When `show_last` is non-zero and that text is
/// longer than `show_last`, separators are removed and every digit except the
/// last `show_last` becomes `*`.
///
/// ```
/// use cc_format::mask::mask_card_number;
/// use cc_format::CardRegistry;
///
/// let registry = CardRegistry::builtin();
///
/// assert_eq!(mask_card_number("4111111111111111", registry, 0), "4111 1111 1111 1111");
/// assert_eq!(mask_card_number("4111111111111111", registry, 4), "************1111");
/// // Unknown numbers are shown as entered
/// assert_eq!(mask_card_number("99-99", registry, 0), "99-99");
/// ```
pub fn mask_card_number(input: &str, registry: &CardRegistry, show_last: usize) -> String {
    let digits = strip_formatting(input);
    let card = registry.detect(&digits, &[]);
    let formatted = match card {
        Some(_) => format_card_number(card, &digits, Separator::default()).unwrap_or_default(),
        None => input.to_string(),
    };

    if show_last > 0 && formatted.chars().count() > show_last {
        return mask_digits(&strip_formatting(&formatted), show_last);
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_cvv() {
        assert_eq!(mask_cvv("1234"), "****");
        assert_eq!(mask_cvv("12é"), "***");
    }

    #[test]
    fn test_mask_digits() {
        assert_eq!(mask_digits("378282246310005", 4), "***********0005");
        assert_eq!(mask_digits("1234", 4), "1234");
        assert_eq!(mask_digits("1234", 0), "****");
        assert_eq!(mask_digits("", 4), "");
    }

    #[test]
    fn test_mask_card_number() {
        let registry = CardRegistry::builtin();
        assert_eq!(
            mask_card_number("378282246310005", registry, 0),
            "3782 822463 10005"
        );
        assert_eq!(
            mask_card_number("3782 8224 6310 005", registry, 5),
            "**********10005"
        );
        // Shorter than the visible part: left alone
        assert_eq!(mask_card_number("4111", registry, 4), "4111");
        assert_eq!(mask_card_number("41111", registry, 4), "*1111");
        assert_eq!(mask_card_number("", registry, 4), "");
    }

    #[test]
    fn test_mask_unknown_number() {
        let registry = CardRegistry::builtin();
        assert_eq!(mask_card_number("99-99", registry, 0), "99-99");
        assert_eq!(mask_card_number("99-99", registry, 2), "**99");
        assert_eq!(mask_card_number("99", registry, 2), "99");
    }

    #[test]
    fn test_masked_output_never_contains_number() {
        let registry = CardRegistry::builtin();
        let masked = mask_card_number("5500000000000004", registry, 4);
        assert!(!masked.contains("5500000000000004"));
        assert!(masked.ends_with("0004"));
    }
}
