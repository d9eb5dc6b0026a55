//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold for all inputs,
//! helping discover edge cases that manual tests might miss.

use cc_format::{
    cvv, expiry,
    field::CardNumberField,
    format, generate::generate_for_definition_deterministic,
    luhn, mask, is_valid, validate_card, CardDefinition, CardRegistry, CardType, GroupPattern,
    Separator,
};
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Picks one definition of the built-in registry.
fn builtin_definition() -> impl Strategy<Value = &'static CardDefinition> {
    let registry = CardRegistry::builtin();
    (0..registry.len()).prop_map(move |i| &registry.definitions()[i])
}

/// Picks any card type.
fn card_type() -> impl Strategy<Value = CardType> {
    proptest::sample::select(CardType::ALL.to_vec())
}

/// Generates a random digit string of a given length.
fn digit_string(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::char::range('0', '9'), len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generates a random digit string of a length within range.
fn digit_string_range(range: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
    range.prop_flat_map(digit_string)
}

/// Generates a string with separators (spaces, dashes) mixed in.
fn card_with_separators(card: String) -> impl Strategy<Value = String> {
    let len = card.len();
    proptest::collection::vec(
        prop_oneof![Just(""), Just(" "), Just("-"), Just("  "), Just(" - "),],
        len + 1,
    )
    .prop_map(move |seps| {
        let mut result = String::new();
        for (i, c) in card.chars().enumerate() {
            result.push_str(seps.get(i).unwrap_or(&""));
            result.push(c);
        }
        result.push_str(seps.last().unwrap_or(&""));
        result
    })
}

fn to_digits(s: &str) -> Vec<u8> {
    s.bytes().map(|b| b - b'0').collect()
}

/// Number of digits a definition's format can show.
fn display_capacity(definition: &CardDefinition) -> usize {
    let max = definition.max_length().unwrap_or(usize::MAX);
    match definition.format() {
        GroupPattern::Repeat(_) => max,
        GroupPattern::Slots(widths) => max.min(widths.iter().sum()),
    }
}

// =============================================================================
// LUHN ALGORITHM PROPERTIES
// =============================================================================

proptest! {
    /// Property: Adding a check digit makes any digit sequence valid.
    #[test]
    fn check_digit_makes_valid(prefix in digit_string_range(0..=18)) {
        let mut digits = to_digits(&prefix);
        digits.push(luhn::generate_check_digit(&digits));
        prop_assert!(luhn::validate(&digits), "Adding check digit should make sequence valid");
    }

    /// Property: Changing any single digit invalidates Luhn.
    #[test]
    fn single_digit_change_invalidates_luhn(
        prefix in digit_string_range(11..=18),
        position in any::<prop::sample::Index>(),
        delta in 1u8..=9u8,
    ) {
        let mut digits = to_digits(&prefix);
        digits.push(luhn::generate_check_digit(&digits));

        let i = position.index(digits.len());
        let mut modified = digits.clone();
        modified[i] = (modified[i] + delta) % 10;
        prop_assert!(!luhn::validate(&modified),
            "Changing digit at position {} should invalidate Luhn", i);
    }

    /// Property: All zeros passes Luhn (sum = 0).
    #[test]
    fn all_zeros_passes_luhn(len in 0usize..=19usize) {
        prop_assert!(luhn::is_luhn_valid(&"0".repeat(len)));
    }

    /// Property: The text and digit-slice checks agree.
    #[test]
    fn text_and_slice_luhn_agree(number in digit_string_range(0..=19)) {
        prop_assert_eq!(luhn::is_luhn_valid(&number), luhn::validate(&to_digits(&number)));
    }

    /// Property: Any non-digit character fails the text check.
    #[test]
    fn non_digit_fails_luhn(number in digit_string_range(0..=16), junk in "[^0-9]") {
        let input = format!("{}{}", number, junk);
        prop_assert!(!luhn::is_luhn_valid(&input));
    }
}

// =============================================================================
// DETECTION PROPERTIES
// =============================================================================

proptest! {
    /// Property: Detection never returns a type outside the allow-list.
    #[test]
    fn detection_respects_allow_list(
        digits in digit_string_range(0..=19),
        allowed in proptest::collection::vec(card_type(), 0..4),
    ) {
        if let Some(card) = CardRegistry::builtin().detect(&digits, &allowed) {
            prop_assert!(allowed.is_empty() || allowed.contains(&card.card_type()));
            prop_assert!(card.matches(&digits));
        }
    }

    /// Property: The filtered result is the first allowed match of the full table.
    #[test]
    fn filtered_detection_is_first_allowed_match(
        digits in digit_string_range(1..=19),
        allowed in proptest::collection::vec(card_type(), 1..4),
    ) {
        let registry = CardRegistry::builtin();
        let expected = registry
            .definitions()
            .iter()
            .find(|c| allowed.contains(&c.card_type()) && c.matches(&digits));
        prop_assert_eq!(registry.detect(&digits, &allowed), expected);
    }

    /// Property: Deterministic numbers are detected as their own definition's type.
    #[test]
    fn generated_numbers_detected(definition in builtin_definition()) {
        let number = generate_for_definition_deterministic(definition).unwrap();
        let detected = CardRegistry::builtin().detect(&number, &[]).map(CardDefinition::card_type);
        prop_assert_eq!(detected, Some(definition.card_type()));
    }
}

// =============================================================================
// VALIDATION PROPERTIES
// =============================================================================

proptest! {
    /// Property: Deterministic numbers of every definition validate.
    #[test]
    fn generated_numbers_validate(definition in builtin_definition()) {
        let number = generate_for_definition_deterministic(definition).unwrap();
        let result = validate_card(&number, CardRegistry::builtin(), &[]);
        prop_assert!(result.is_ok(), "{} should validate: {:?}", number, result);
    }

    /// Property: is_valid is consistent with validate_card.
    #[test]
    fn is_valid_consistent_with_validate(input in ".*") {
        prop_assert_eq!(
            is_valid(&input),
            validate_card(&input, CardRegistry::builtin(), &[]).is_ok()
        );
    }

    /// Property: Separators don't affect the validation result.
    #[test]
    fn separators_dont_affect_validation(
        input in digit_string_range(0..=20).prop_flat_map(card_with_separators)
    ) {
        let registry = CardRegistry::builtin();
        let clean = format::strip_formatting(&input);
        let a = validate_card(&input, registry, &[]).map(|c| c.card_type());
        let b = validate_card(&clean, registry, &[]).map(|c| c.card_type());
        prop_assert_eq!(a, b);
    }

    /// Property: Accepted numbers have an accepted length and, where required, pass Luhn.
    #[test]
    fn accepted_numbers_satisfy_definition(input in digit_string_range(12..=19)) {
        if let Ok(card) = validate_card(&input, CardRegistry::builtin(), &[]) {
            let definition = card.definition();
            prop_assert!(definition.is_valid_length(card.length()));
            prop_assert!(!definition.luhn_required() || luhn::is_luhn_valid(card.number()));
        }
    }

    /// Property: validation never panics on any input.
    #[test]
    fn validate_never_panics(input in ".*", allowed in proptest::collection::vec(card_type(), 0..3)) {
        let _ = validate_card(&input, CardRegistry::builtin(), &allowed);
        let _ = is_valid(&input);
        let _ = luhn::is_luhn_valid(&input);
    }
}

// =============================================================================
// FORMATTING PROPERTIES
// =============================================================================

proptest! {
    /// Property: Formatting keeps the leading digits up to what the format can show.
    #[test]
    fn format_keeps_leading_digits(definition in builtin_definition(), digits in digit_string_range(1..=25)) {
        let formatted = format::format_card_number(Some(definition), &digits, Separator::default())
            .unwrap();
        let stripped = format::strip_formatting(&formatted);
        let expected = digits.len().min(display_capacity(definition));
        prop_assert_eq!(stripped.as_str(), &digits[..expected]);
    }

    /// Property: Separators appear only between non-empty groups.
    #[test]
    fn separators_only_between_groups(definition in builtin_definition(), digits in digit_string_range(1..=25)) {
        let formatted = format::format_card_number(Some(definition), &digits, Separator::from('-'))
            .unwrap();
        prop_assert!(!formatted.starts_with('-'));
        prop_assert!(!formatted.ends_with('-'));
        prop_assert!(!formatted.contains("--"));
    }

    /// Property: Groups joined equal the formatted digits.
    #[test]
    fn split_join_matches_format(definition in builtin_definition(), digits in digit_string_range(1..=25)) {
        let groups = format::split_into_groups(definition, &digits);
        let formatted = format::format_card_number(Some(definition), &digits, Separator::from(' '))
            .unwrap();
        prop_assert_eq!(groups.join(" "), formatted);
    }

    /// Property: Without a definition the input is returned unchanged.
    #[test]
    fn unknown_card_unchanged(digits in digit_string_range(0..=25)) {
        prop_assert_eq!(
            format::format_card_number(None, &digits, Separator::default()),
            Some(digits.clone())
        );
    }

    /// Property: strip_formatting produces only digits and is idempotent.
    #[test]
    fn strip_formatting_only_digits(input in ".{0,40}") {
        let stripped = format::strip_formatting(&input);
        prop_assert!(stripped.chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(format::strip_formatting(&stripped), stripped.clone());
    }

    /// Property: The field shows a prefix of its value and never holds more
    /// digits than the detected card allows.
    #[test]
    fn field_value_extends_formatted(input in ".{0,30}") {
        let mut field = CardNumberField::new(CardRegistry::builtin());
        field.input(&input);
        let shown = format::strip_formatting(field.formatted());
        prop_assert!(field.value().starts_with(&shown));
        match field.card().and_then(CardDefinition::max_length) {
            Some(max) => prop_assert!(field.value().len() <= max),
            None => prop_assert_eq!(field.value(), format::strip_formatting(&input)),
        }
    }
}

// =============================================================================
// MASKING PROPERTIES
// =============================================================================

proptest! {
    /// Property: Masked output never contains the full card number.
    #[test]
    fn masked_never_exposes_full_number(definition in builtin_definition()) {
        let number = generate_for_definition_deterministic(definition).unwrap();
        let card = validate_card(&number, CardRegistry::builtin(), &[]).unwrap();

        prop_assert!(!card.masked().contains(&number));
        let visible = format::strip_formatting(&card.masked());
        prop_assert_eq!(visible, card.last_four());
        let displayed = format!("{}", card);
        let debugged = format!("{:?}", card);
        prop_assert!(!displayed.contains(&number));
        prop_assert!(!debugged.contains(&number));
    }

    /// Property: Masking leaves exactly `show_last` digits visible.
    #[test]
    fn mask_leaves_show_last_digits(digits in digit_string_range(5..=19), show_last in 1usize..=4) {
        let masked = mask::mask_card_number(&digits, CardRegistry::builtin(), show_last);
        prop_assert_eq!(masked.chars().filter(|c| c.is_ascii_digit()).count(), show_last);
    }

    /// Property: mask_cvv keeps the length and hides every character.
    #[test]
    fn mask_cvv_hides_everything(cvc in ".{0,8}") {
        let masked = mask::mask_cvv(&cvc);
        prop_assert_eq!(masked.chars().count(), cvc.chars().count());
        prop_assert!(masked.chars().all(|c| c == '*'));
    }
}

// =============================================================================
// EXPIRY PROPERTIES
// =============================================================================

proptest! {
    /// Property: Sanitized months are empty or two digits.
    #[test]
    fn sanitized_month_shape(input in ".{0,6}") {
        let month = expiry::sanitize_month(&input);
        prop_assert!(month.is_empty() || (month.len() == 2 && month.bytes().all(|b| b.is_ascii_digit())));
    }

    /// Property: Two-digit years expand into 1969-2068.
    #[test]
    fn two_digit_years_expand(yy in 0u16..=99) {
        let year = expiry::expand_two_digit_year(yy);
        prop_assert!((1969..=2068).contains(&year));
        prop_assert_eq!(year % 100, yy);
    }

    /// Property: Every month of a future year is valid.
    #[test]
    fn future_months_valid(month in 1u8..=12, ahead in 1u16..=50) {
        let today = expiry::YearMonth::new(2026, 10).unwrap();
        let year = (2026 + ahead).to_string();
        prop_assert_eq!(
            expiry::validate_month_at(&format!("{:02}", month), Some(&year), today),
            Ok(month)
        );
        prop_assert_eq!(expiry::validate_year_at(&year, today), Ok(2026 + ahead));
    }

    /// Property: Months of past years are expired.
    #[test]
    fn past_months_expired(month in 1u8..=12, behind in 1u16..=30) {
        let today = expiry::YearMonth::new(2026, 10).unwrap();
        let year = (2026 - behind).to_string();
        let expired = matches!(
            expiry::validate_month_at(&month.to_string(), Some(&year), today),
            Err(expiry::ExpiryError::Expired { .. })
        );
        prop_assert!(expired);
    }
}

// =============================================================================
// CVC PROPERTIES
// =============================================================================

proptest! {
    /// Property: Sanitized codes never exceed the card's longest code.
    #[test]
    fn sanitized_cvc_fits_card(definition in builtin_definition(), input in ".{0,10}") {
        let cvc = cvv::sanitize_cvc(&input, Some(definition));
        prop_assert!(cvc.len() <= definition.max_cvv_length().unwrap_or(usize::MAX));
        prop_assert!(cvc.bytes().all(|b| b.is_ascii_digit()));
    }

    /// Property: A digit code of an accepted length is valid.
    #[test]
    fn accepted_length_cvc_valid(
        definition in builtin_definition(),
        pick in any::<prop::sample::Index>(),
        seed in digit_string(4),
    ) {
        let lengths = definition.cvv_lengths();
        let length = lengths[pick.index(lengths.len())];
        prop_assert!(cvv::validate_cvc(&seed[..length], Some(definition)).is_ok());
    }
}

// =============================================================================
// GENERATOR PROPERTIES
// =============================================================================

#[cfg(feature = "generate")]
proptest! {
    /// Property: Seeded random numbers fit their definition.
    #[test]
    fn random_numbers_fit_definition(definition in builtin_definition(), seed in any::<u64>()) {
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let number = cc_format::generate::generate_with_rng(definition, &mut rng).unwrap();
        prop_assert!(definition.matches(&number));
        prop_assert!(definition.is_valid_length(number.len()));
        prop_assert!(!definition.luhn_required() || luhn::is_luhn_valid(&number));
    }
}
