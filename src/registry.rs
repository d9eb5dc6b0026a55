//! The ordered table of card definitions.
//!
//! Detection walks the table top to bottom and the first definition with a
//! matching range wins, so narrower definitions must come before broader
//! ones (Maestro's `5018` before anything that would also claim `50`).
//!
//! # Example
//!
//! ```
//! use cc_format::{CardDefinition, CardRegistry, CardType};
//!
//! // The shared built-in table
//! let registry = CardRegistry::builtin();
//! assert_eq!(registry.len(), 11);
//! assert_eq!(registry.detect("4111", &[]).unwrap().card_type(), CardType::Visa);
//!
//! // A caller-supplied definition that takes priority over the defaults
//! let custom = CardRegistry::default()
//!     .prepend([CardDefinition::new(CardType::Visa, "Visa Electron")
//!         .with_prefix("4026")
//!         .with_lengths([16])])
//!     .unwrap();
//! assert_eq!(custom.detect("4026", &[]).unwrap().display_name(), "Visa Electron");
//! ```
//!
//! # JSON configuration
//!
//! With the `registry-json` feature a table can be loaded from JSON that uses
//! the same shape as the built-in definitions:
//!
//! ```json
//! [
//!   {
//!     "type": "mastercard",
//!     "displayName": "Mastercard",
//!     "ranges": [["51", "55"], ["2221", "2720"]],
//!     "format": 4,
//!     "lengths": [16],
//!     "cvvLengths": [3],
//!     "luhn": true
//!   },
//!   {
//!     "type": "amex",
//!     "displayName": "American Express",
//!     "ranges": ["34", "37"],
//!     "format": [4, 6, 5],
//!     "lengths": [15],
//!     "cvvLengths": [3, 4]
//!   }
//! ]
//! ```

use std::sync::OnceLock;

use crate::card::{CardDefinition, CardRange, CardType, GroupPattern};
use crate::detect;
use crate::error::RegistryError;

/// Widest range bound that still fits a `u64` comparison.
pub const MAX_RANGE_DIGITS: usize = 18;

/// An ordered, validated table of card definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRegistry {
    cards: Vec<CardDefinition>,
}

impl CardRegistry {
    /// Returns the shared built-in registry.
    ///
    /// Built on first use and read-only afterwards.
    pub fn builtin() -> &'static CardRegistry {
        static BUILTIN: OnceLock<CardRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let cards = default_definitions();
            tracing::debug!(definitions = cards.len(), "built built-in card registry");
            CardRegistry { cards }
        })
    }

    /// Builds a registry that replaces the defaults with `cards`.
    ///
    /// Every definition is checked; the first problem found is returned.
    pub fn new(cards: impl IntoIterator<Item = CardDefinition>) -> Result<Self, RegistryError> {
        let cards: Vec<CardDefinition> = cards.into_iter().collect();
        check_table(&cards)?;
        tracing::debug!(definitions = cards.len(), "built custom card registry");
        Ok(Self { cards })
    }

    /// Places `cards` ahead of the current definitions, so they match first.
    pub fn prepend(
        self,
        cards: impl IntoIterator<Item = CardDefinition>,
    ) -> Result<Self, RegistryError> {
        let mut combined: Vec<CardDefinition> = cards.into_iter().collect();
        combined.extend(self.cards);
        Self::new(combined)
    }

    /// Places `cards` after the current definitions.
    pub fn append(
        mut self,
        cards: impl IntoIterator<Item = CardDefinition>,
    ) -> Result<Self, RegistryError> {
        self.cards.extend(cards);
        Self::new(self.cards)
    }

    /// Returns the definitions in match order.
    #[inline]
    pub fn definitions(&self) -> &[CardDefinition] {
        &self.cards
    }

    /// Returns the number of definitions.
    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if the table has no definitions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterates over every definition of the given type.
    pub fn find(&self, card_type: CardType) -> impl Iterator<Item = &CardDefinition> + '_ {
        self.cards.iter().filter(move |c| c.card_type() == card_type)
    }

    /// Returns the display name of the first definition of `card_type`.
    pub fn display_name(&self, card_type: CardType) -> Option<&str> {
        self.find(card_type).next().map(CardDefinition::display_name)
    }

    /// Detects the definition for `digits`, see [`detect::detect_card`].
    #[inline]
    pub fn detect(&self, digits: &str, allowed: &[CardType]) -> Option<&CardDefinition> {
        detect::detect_card(digits, &self.cards, allowed)
    }

    /// Returns the detected card's display name, or an empty string.
    pub fn card_type_label(&self, digits: &str) -> &str {
        self.detect(digits, &[])
            .map(CardDefinition::display_name)
            .unwrap_or("")
    }
}

impl Default for CardRegistry {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[cfg(feature = "registry-json")]
impl CardRegistry {
    /// Loads a registry from a JSON array of definitions.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let cards: Vec<CardDefinition> = serde_json::from_str(json)
            .map_err(|e| RegistryError::Parse(format!("JSON parse error: {}", e)))?;
        tracing::debug!(definitions = cards.len(), "parsed card registry from JSON");
        Self::new(cards)
    }

    /// Loads a registry from a reader yielding JSON.
    pub fn from_reader<R: std::io::Read>(mut reader: R) -> Result<Self, RegistryError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_json_str(&content)
    }

    /// Loads a registry from a JSON file.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading card registry");
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serializes the registry back to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        serde_json::to_string_pretty(&self.cards)
            .map_err(|e| RegistryError::Parse(format!("JSON serialize error: {}", e)))
    }
}

fn check_table(cards: &[CardDefinition]) -> Result<(), RegistryError> {
    if cards.is_empty() {
        return Err(RegistryError::Empty);
    }
    cards
        .iter()
        .enumerate()
        .try_for_each(|(index, card)| check_definition(index, card))
}

fn check_definition(index: usize, card: &CardDefinition) -> Result<(), RegistryError> {
    if card.ranges().is_empty() {
        return Err(RegistryError::NoRanges {
            index,
            card_type: card.card_type(),
        });
    }

    for range in card.ranges() {
        match range {
            CardRange::Prefix(prefix) => {
                if !is_digits(prefix) {
                    return Err(RegistryError::InvalidPrefix {
                        index,
                        prefix: prefix.clone(),
                    });
                }
            }
            CardRange::Span(start, end) => {
                let reason = if !is_digits(start) || !is_digits(end) {
                    Some("bounds must be non-empty digit strings")
                } else if start.len() != end.len() {
                    Some("bounds must have the same number of digits")
                } else if start.len() > MAX_RANGE_DIGITS {
                    Some("bounds are too long")
                } else if start > end {
                    // Equal-length digit strings compare like the numbers they spell.
                    Some("lower bound is above upper bound")
                } else {
                    None
                };
                if let Some(reason) = reason {
                    return Err(RegistryError::InvalidRange {
                        index,
                        start: start.clone(),
                        end: end.clone(),
                        reason,
                    });
                }
            }
        }
    }

    if !is_ascending(card.lengths()) {
        return Err(RegistryError::InvalidLengths { index });
    }
    if !is_ascending(card.cvv_lengths()) {
        return Err(RegistryError::InvalidCvvLengths { index });
    }

    let format_ok = match card.format() {
        GroupPattern::Repeat(width) => *width > 0,
        GroupPattern::Slots(widths) => !widths.is_empty() && widths.iter().all(|w| *w > 0),
    };
    if !format_ok {
        return Err(RegistryError::InvalidFormat { index });
    }

    Ok(())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_ascending(values: &[usize]) -> bool {
    !values.is_empty() && values.windows(2).all(|w| w[0] < w[1])
}

/// The built-in definitions, in match order.
fn default_definitions() -> Vec<CardDefinition> {
    let amex_format = || GroupPattern::Slots(vec![4, 6, 5]);
    let diners_format = || GroupPattern::Slots(vec![4, 6, 4]);

    vec![
        CardDefinition::new(CardType::Maestro, "Maestro")
            .with_ranges(
                [
                    "5018", "5020", "5038", "5612", "5893", "6304", "6759", "6761", "6762",
                    "6763", "0604", "6390",
                ]
                .into_iter()
                .map(CardRange::prefix),
            )
            .with_lengths(12..=19),
        CardDefinition::new(CardType::Forbrugsforeningen, "Forbrugsforeningen")
            .with_prefix("600")
            .with_lengths([16]),
        CardDefinition::new(CardType::Dankort, "Dankort")
            .with_prefix("5019")
            .with_lengths([16]),
        CardDefinition::new(CardType::Visa, "Visa")
            .with_prefix("4")
            .with_lengths([13, 16, 19]),
        CardDefinition::new(CardType::Mastercard, "Mastercard")
            .with_span("51", "55")
            .with_span("2221", "2720")
            .with_lengths([16]),
        CardDefinition::new(CardType::Amex, "American Express")
            .with_prefix("34")
            .with_prefix("37")
            .with_format(amex_format())
            .with_lengths([15])
            .with_cvv_lengths([3, 4]),
        CardDefinition::new(CardType::DinersClub, "Diners Club International")
            .with_span("300", "305")
            .with_prefix("3095")
            .with_span("38", "39")
            .with_format(diners_format())
            .with_lengths([16, 19]),
        CardDefinition::new(CardType::DinersClub, "Diners Club International")
            .with_prefix("36")
            .with_format(diners_format())
            .with_lengths([14, 16, 19]),
        // 6011 is only used by Discover, so it is matched on four digits
        // instead of the exact six-digit BIN ranges.
        CardDefinition::new(CardType::Discover, "Discover")
            .with_prefix("6011")
            .with_span("6440", "6505")
            .with_span("650601", "650609")
            .with_span("650611", "659999")
            .with_lengths([16]),
        CardDefinition::new(CardType::UnionPay, "UnionPay")
            .with_span("622126", "622925")
            .with_span("624000", "626999")
            .with_span("628200", "628899")
            .with_lengths(16..=19)
            .with_luhn(false),
        CardDefinition::new(CardType::Jcb, "JCB")
            .with_span("3528", "3589")
            .with_lengths([16, 19]),
    ]
}
