//! Fuzz target for card formatting.
//!
//! Tests that formatting functions never panic on arbitrary input.

#![no_main]

use cc_format::{field::CardNumberField, format, mask, CardRegistry, Separator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let registry = CardRegistry::builtin();
    let digits = format::strip_formatting(data);
    let card = registry.detect(&digits, &[]);

    let _ = format::format_with_separator(card, &digits, data);
    let _ = mask::mask_card_number(data, registry, 4);

    if let Some(formatted) = format::format_card_number(card, &digits, Separator::from('-')) {
        // Formatting only ever drops trailing digits
        let stripped = format::strip_formatting(&formatted);
        assert!(digits.starts_with(&stripped), "Formatting should keep leading digits");
    }

    let mut field = CardNumberField::new(registry);
    field.input(data);
    assert_eq!(format::strip_formatting(field.formatted()), field.value());
    let _ = field.validate();
});
