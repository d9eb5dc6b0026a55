//! Fuzz target for card validation.
//!
//! Tests that validation never panics on arbitrary input and that accepted
//! numbers satisfy their definition.

#![no_main]

use arbitrary::Arbitrary;
use cc_format::{is_valid, luhn, validate_card, CardRegistry, CardType};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    number: &'a str,
    allowed: Vec<u8>,
}

fuzz_target!(|input: Input<'_>| {
    let registry = CardRegistry::builtin();
    let allowed: Vec<CardType> = input
        .allowed
        .iter()
        .map(|&i| CardType::ALL[i as usize % CardType::ALL.len()])
        .collect();

    let _ = is_valid(input.number);

    if let Ok(card) = validate_card(input.number, registry, &allowed) {
        let definition = card.definition();
        assert!(allowed.is_empty() || allowed.contains(&card.card_type()));
        assert!(definition.is_valid_length(card.length()));
        assert!(!definition.luhn_required() || luhn::is_luhn_valid(card.number()));
        assert!(!card.masked().contains(card.number()));
        let _ = format!("{:?} {}", card, card);
    }
});
