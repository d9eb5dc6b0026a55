//! Fuzz target for JSON registry loading.
//!
//! Tests that any registry that loads can be used for detection and
//! formatting without panicking.

#![no_main]

use cc_format::{format, CardRegistry, Separator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (json, number) = data;
    let Ok(registry) = CardRegistry::from_json_str(json) else {
        return;
    };

    let digits = format::strip_formatting(number);
    let card = registry.detect(&digits, &[]);
    let _ = format::format_card_number(card, &digits, Separator::default());
    let _ = cc_format::validate_card(number, &registry, &[]);
    let _ = registry.to_json();
});
