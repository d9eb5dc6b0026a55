//! Test card number generation from card definitions.
//!
//! Numbers are built from a definition's own ranges and lengths, so whatever a
//! registry describes can be exercised end to end. They are intended for
//! testing only and are not connected to real accounts.
//!
//! # Example
//!
//! ```
//! use cc_format::generate::{generate_for_definition_deterministic, CardGenerator};
//! use cc_format::{CardRegistry, CardType};
//!
//! let registry = CardRegistry::builtin();
//! let visa = registry.find(CardType::Visa).next().unwrap();
//!
//! // Zero-filled to the shortest accepted length
//! let number = generate_for_definition_deterministic(visa).unwrap();
//! assert_eq!(number, "4000000000006");
//! assert!(cc_format::is_valid(&number));
//!
//! let number = CardGenerator::new(visa).length(16).generate_deterministic().unwrap();
//! assert_eq!(number, "4000000000000002");
//! ```

use crate::card::{CardDefinition, CardRange};
use crate::luhn;

#[cfg(feature = "generate")]
use rand::Rng;

/// Returns the digits a generated number starts with: the first prefix or the
/// low bound of the first range.
pub fn leading_digits(definition: &CardDefinition) -> Option<&str> {
    definition.ranges().first().map(|range| match range {
        CardRange::Prefix(prefix) => prefix.as_str(),
        CardRange::Span(start, _) => start.as_str(),
    })
}

/// Generates a number for `definition` without randomness.
///
/// Uses [`leading_digits`], fills with zeros up to the shortest accepted
/// length and appends a Luhn check digit when the definition requires one.
///
/// Returns `None` if the definition has no ranges or lengths, or its prefix
/// does not fit the length.
pub fn generate_for_definition_deterministic(definition: &CardDefinition) -> Option<String> {
    let prefix = leading_digits(definition)?;
    let length = definition.lengths().first().copied()?;
    build(prefix, length, definition.luhn_required(), || 0)
}

/// Generates a random number for `definition` using the thread-local RNG.
///
/// Requires the `generate` feature (which enables the `rand` dependency).
///
/// ```
/// use cc_format::generate::generate_for_definition;
/// use cc_format::{CardRegistry, CardType};
///
/// let amex = CardRegistry::builtin().find(CardType::Amex).next().unwrap();
/// let number = generate_for_definition(amex).unwrap();
/// assert_eq!(number.len(), 15);
/// assert!(cc_format::luhn::is_luhn_valid(&number));
/// ```
#[cfg(feature = "generate")]
pub fn generate_for_definition(definition: &CardDefinition) -> Option<String> {
    generate_with_rng(definition, &mut rand::thread_rng())
}

/// Generates a random number for `definition` with a caller-provided RNG.
///
/// Picks one of the definition's ranges (a random value inside a span) and
/// one of its lengths, then fills the rest with random digits. Seeded RNGs
/// give reproducible output. Returns `None` for a span whose bounds are
/// reversed or not numeric.
#[cfg(feature = "generate")]
pub fn generate_with_rng<R: Rng>(
    definition: &CardDefinition,
    rng: &mut R,
) -> Option<String> {
    let ranges = definition.ranges();
    let lengths = definition.lengths();
    if ranges.is_empty() || lengths.is_empty() {
        return None;
    }

    let prefix = match &ranges[rng.gen_range(0..ranges.len())] {
        CardRange::Prefix(prefix) => prefix.clone(),
        CardRange::Span(start, end) => {
            let low: u64 = start.parse().ok()?;
            let high: u64 = end.parse().ok()?;
            if low > high {
                return None;
            }
            format!("{:0width$}", rng.gen_range(low..=high), width = start.len())
        }
    };
    let length = lengths[rng.gen_range(0..lengths.len())];

    build(&prefix, length, definition.luhn_required(), || rng.gen_range(0..10))
}

fn build(prefix: &str, length: usize, luhn: bool, mut fill: impl FnMut() -> u8) -> Option<String> {
    let body = if luhn { length.checked_sub(1)? } else { length };
    if prefix.len() > body || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut digits: Vec<u8> = prefix.bytes().map(|b| b - b'0').collect();
    while digits.len() < body {
        digits.push(fill());
    }
    if luhn {
        digits.push(luhn::generate_check_digit(&digits));
    }

    Some(digits.iter().map(|&d| (b'0' + d) as char).collect())
}

/// Builder for numbers that override a definition's prefix or length.
#[derive(Debug, Clone)]
pub struct CardGenerator<'d> {
    definition: &'d CardDefinition,
    prefix: Option<String>,
    length: Option<usize>,
}

impl<'d> CardGenerator<'d> {
    /// Creates a generator for the given definition.
    pub fn new(definition: &'d CardDefinition) -> Self {
        Self {
            definition,
            prefix: None,
            length: None,
        }
    }

    /// Sets the total length.
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the leading digits.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Generates a zero-filled number.
    pub fn generate_deterministic(&self) -> Option<String> {
        let (prefix, length) = self.resolve()?;
        build(prefix, length, self.definition.luhn_required(), || 0)
    }

    /// Generates a number with random fill digits.
    #[cfg(feature = "generate")]
    pub fn generate(&self) -> Option<String> {
        let (prefix, length) = self.resolve()?;
        let mut rng = rand::thread_rng();
        build(prefix, length, self.definition.luhn_required(), || {
            rng.gen_range(0..10)
        })
    }

    /// Generates several numbers with random fill digits.
    #[cfg(feature = "generate")]
    pub fn generate_many(&self, count: usize) -> Vec<String> {
        (0..count).filter_map(|_| self.generate()).collect()
    }

    fn resolve(&self) -> Option<(&str, usize)> {
        let prefix = match &self.prefix {
            Some(prefix) => prefix.as_str(),
            None => leading_digits(self.definition)?,
        };
        let length = match self.length {
            Some(length) => length,
            None => self.definition.lengths().first().copied()?,
        };
        Some((prefix, length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{validate_card, CardRegistry, CardType};

    fn definition(card_type: CardType) -> &'static CardDefinition {
        CardRegistry::builtin().find(card_type).next().unwrap()
    }

    #[test]
    fn test_deterministic_numbers_validate_as_their_type() {
        let registry = CardRegistry::builtin();
        for def in registry.definitions() {
            let number = generate_for_definition_deterministic(def).unwrap();
            let card = validate_card(&number, registry, &[])
                .unwrap_or_else(|e| panic!("{} ({}): {}", def.display_name(), number, e));
            assert_eq!(card.card_type(), def.card_type());
            assert_eq!(Some(number.len()), def.lengths().first().copied());
        }
    }

    #[test]
    fn test_deterministic_values() {
        assert_eq!(
            generate_for_definition_deterministic(definition(CardType::Mastercard)).as_deref(),
            Some("5100000000000008")
        );
        assert_eq!(
            generate_for_definition_deterministic(definition(CardType::DinersClub)).as_deref(),
            Some("3000000000000004")
        );
        // No check digit without Luhn
        assert_eq!(
            generate_for_definition_deterministic(definition(CardType::UnionPay)).as_deref(),
            Some("6221260000000000")
        );
    }

    #[test]
    fn test_deterministic_is_reproducible() {
        let def = definition(CardType::Jcb);
        assert_eq!(
            generate_for_definition_deterministic(def),
            generate_for_definition_deterministic(def)
        );
    }

    #[test]
    fn test_degenerate_definitions() {
        let no_ranges = CardDefinition::new(CardType::Visa, "Bare").with_lengths([16]);
        assert_eq!(generate_for_definition_deterministic(&no_ranges), None);

        let no_lengths = CardDefinition::new(CardType::Visa, "Bare").with_prefix("4");
        assert_eq!(generate_for_definition_deterministic(&no_lengths), None);

        let too_long = CardDefinition::new(CardType::Visa, "Bare")
            .with_prefix("4111")
            .with_lengths([4]);
        assert_eq!(generate_for_definition_deterministic(&too_long), None);
    }

    #[test]
    fn test_card_generator_builder() {
        let visa = definition(CardType::Visa);
        let number = CardGenerator::new(visa).length(19).generate_deterministic().unwrap();
        assert!(number.starts_with('4'));
        assert_eq!(number.len(), 19);
        assert!(crate::is_valid(&number));

        let number = CardGenerator::new(visa)
            .prefix("411111")
            .length(16)
            .generate_deterministic()
            .unwrap();
        assert!(number.starts_with("411111"));
        assert!(luhn::is_luhn_valid(&number));

        assert_eq!(CardGenerator::new(visa).prefix("4x").generate_deterministic(), None);
    }

    #[cfg(feature = "generate")]
    mod random_tests {
        use super::*;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        #[test]
        fn test_random_numbers_fit_definition() {
            for def in CardRegistry::builtin().definitions() {
                for _ in 0..20 {
                    let number = generate_for_definition(def).unwrap();
                    assert!(def.matches(&number), "{} {}", def.display_name(), number);
                    assert!(def.is_valid_length(number.len()));
                    if def.luhn_required() {
                        assert!(luhn::is_luhn_valid(&number));
                    }
                }
            }
        }

        #[test]
        fn test_seeded_rng_is_reproducible() {
            let def = definition(CardType::Discover);
            let a = generate_with_rng(def, &mut StdRng::seed_from_u64(7));
            let b = generate_with_rng(def, &mut StdRng::seed_from_u64(7));
            assert_eq!(a, b);
        }

        #[test]
        fn test_generate_many() {
            let numbers = CardGenerator::new(definition(CardType::Mastercard)).generate_many(50);
            assert_eq!(numbers.len(), 50);
            let unique: std::collections::HashSet<_> = numbers.iter().collect();
            assert!(unique.len() >= 45);
        }

        #[test]
        fn test_reversed_span_yields_none() {
            let reversed = CardDefinition::new(CardType::Mastercard, "Reversed")
                .with_span("59", "51")
                .with_lengths([16]);
            let mut rng = StdRng::seed_from_u64(1);
            assert_eq!(generate_with_rng(&reversed, &mut rng), None);
            assert_eq!(generate_for_definition(&reversed), None);
        }
    }
}
