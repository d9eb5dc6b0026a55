//! Core card types: networks, definitions and validated cards.
//!
//! This module provides the `CardType` enum for identifying card networks,
//! the `CardDefinition` table entry that drives detection, formatting and
//! validation, and the `ValidatedCard` struct for holding an accepted number.

use std::fmt;
use std::str::FromStr;

use zeroize::Zeroize;

use crate::error::ParseCardTypeError;
use crate::format::{self, Separator};

/// Default width of a repeating digit group.
pub const DEFAULT_GROUP_WIDTH: usize = 4;

/// Supported credit card networks.
///
/// A network may be described by more than one [`CardDefinition`]
/// (Diners Club has two in the built-in table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CardType {
    /// Maestro
    Maestro,
    /// Forbrugsforeningen - Danish consumer cooperative card
    Forbrugsforeningen,
    /// Dankort - Danish debit card
    Dankort,
    /// Visa
    Visa,
    /// Mastercard
    Mastercard,
    /// American Express
    Amex,
    /// Diners Club International
    DinersClub,
    /// Discover
    Discover,
    /// UnionPay
    UnionPay,
    /// JCB
    Jcb,
}

impl CardType {
    /// Every card type, in built-in registry order.
    pub const ALL: [CardType; 10] = [
        Self::Maestro,
        Self::Forbrugsforeningen,
        Self::Dankort,
        Self::Visa,
        Self::Mastercard,
        Self::Amex,
        Self::DinersClub,
        Self::Discover,
        Self::UnionPay,
        Self::Jcb,
    ];

    /// Returns the lowercase identifier of this type (e.g. `"dinersclub"`).
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Maestro => "maestro",
            Self::Forbrugsforeningen => "forbrugsforeningen",
            Self::Dankort => "dankort",
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
            Self::DinersClub => "dinersclub",
            Self::Discover => "discover",
            Self::UnionPay => "unionpay",
            Self::Jcb => "jcb",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = ParseCardTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCardTypeError {
                input: s.to_string(),
            })
    }
}

/// One match pattern of a card definition.
///
/// All comparisons act on the leading digits of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum CardRange {
    /// The input must start with exactly these digits.
    Prefix(String),
    /// Inclusive numeric range over the leading digits; both bounds have the
    /// same number of digits.
    Span(String, String),
}

impl CardRange {
    /// Creates a prefix pattern.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Creates an inclusive range pattern.
    pub fn span(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::Span(start.into(), end.into())
    }

    /// Number of leading digits this pattern looks at.
    pub fn width(&self) -> usize {
        match self {
            Self::Prefix(p) => p.len(),
            Self::Span(start, _) => start.len(),
        }
    }
}

impl fmt::Display for CardRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(p) => f.write_str(p),
            Self::Span(start, end) => write!(f, "{}-{}", start, end),
        }
    }
}

/// How a card number is split into display groups.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum GroupPattern {
    /// Consecutive groups of this width; the last group may be shorter.
    Repeat(usize),
    /// Fixed, ordered group widths (Amex: 4-6-5). Slots left empty are dropped.
    Slots(Vec<usize>),
}

impl Default for GroupPattern {
    fn default() -> Self {
        Self::Repeat(DEFAULT_GROUP_WIDTH)
    }
}

impl fmt::Display for GroupPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repeat(width) => write!(f, "groups of {}", width),
            Self::Slots(widths) => {
                let parts: Vec<String> = widths.iter().map(|w| w.to_string()).collect();
                f.write_str(&parts.join("-"))
            }
        }
    }
}

/// A card network definition: one row of a [`CardRegistry`](crate::CardRegistry).
///
/// Definitions are immutable once placed in a registry. Build custom ones
/// with the chained setters:
///
/// ```
/// use cc_format::{CardDefinition, CardType, GroupPattern};
///
/// let def = CardDefinition::new(CardType::Visa, "Visa Electron")
///     .with_prefix("4026")
///     .with_span("417500", "417500")
///     .with_lengths([16])
///     .with_format(GroupPattern::Repeat(4));
///
/// assert_eq!(def.max_length(), Some(16));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct CardDefinition {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    card_type: CardType,
    display_name: String,
    ranges: Vec<CardRange>,
    #[cfg_attr(feature = "serde", serde(default))]
    format: GroupPattern,
    lengths: Vec<usize>,
    #[cfg_attr(feature = "serde", serde(default = "default_cvv_lengths"))]
    cvv_lengths: Vec<usize>,
    #[cfg_attr(feature = "serde", serde(rename = "luhn", default = "default_luhn"))]
    luhn_required: bool,
}

#[cfg(feature = "serde")]
fn default_cvv_lengths() -> Vec<usize> {
    vec![3]
}

#[cfg(feature = "serde")]
fn default_luhn() -> bool {
    true
}

impl CardDefinition {
    /// Starts a definition with no ranges and no lengths, a CVC length of 3,
    /// groups of 4 and the Luhn check enabled.
    pub fn new(card_type: CardType, display_name: impl Into<String>) -> Self {
        Self {
            card_type,
            display_name: display_name.into(),
            ranges: Vec::new(),
            format: GroupPattern::default(),
            lengths: Vec::new(),
            cvv_lengths: vec![3],
            luhn_required: true,
        }
    }

    /// Appends a prefix pattern.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ranges.push(CardRange::prefix(prefix));
        self
    }

    /// Appends an inclusive range pattern.
    pub fn with_span(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.ranges.push(CardRange::span(start, end));
        self
    }

    /// Appends arbitrary patterns.
    pub fn with_ranges(mut self, ranges: impl IntoIterator<Item = CardRange>) -> Self {
        self.ranges.extend(ranges);
        self
    }

    /// Sets the grouping pattern.
    pub fn with_format(mut self, format: GroupPattern) -> Self {
        self.format = format;
        self
    }

    /// Sets the valid total digit counts (ascending).
    pub fn with_lengths(mut self, lengths: impl IntoIterator<Item = usize>) -> Self {
        self.lengths = lengths.into_iter().collect();
        self
    }

    /// Sets the valid CVC digit counts (ascending).
    pub fn with_cvv_lengths(mut self, lengths: impl IntoIterator<Item = usize>) -> Self {
        self.cvv_lengths = lengths.into_iter().collect();
        self
    }

    /// Sets whether the Luhn checksum must pass.
    pub fn with_luhn(mut self, required: bool) -> Self {
        self.luhn_required = required;
        self
    }

    /// Returns the network this definition describes.
    #[inline]
    pub const fn card_type(&self) -> CardType {
        self.card_type
    }

    /// Returns the human-readable label.
    #[inline]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the match patterns in priority order.
    #[inline]
    pub fn ranges(&self) -> &[CardRange] {
        &self.ranges
    }

    /// Returns the grouping pattern.
    #[inline]
    pub fn format(&self) -> &GroupPattern {
        &self.format
    }

    /// Returns the valid total digit counts.
    #[inline]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Returns the valid CVC digit counts.
    #[inline]
    pub fn cvv_lengths(&self) -> &[usize] {
        &self.cvv_lengths
    }

    /// Returns true if the Luhn checksum must pass for this network.
    #[inline]
    pub const fn luhn_required(&self) -> bool {
        self.luhn_required
    }

    /// Hard upper bound on the number of digits (last entry of `lengths`).
    #[inline]
    pub fn max_length(&self) -> Option<usize> {
        self.lengths.last().copied()
    }

    /// Hard upper bound on the CVC length (last entry of `cvv_lengths`).
    #[inline]
    pub fn max_cvv_length(&self) -> Option<usize> {
        self.cvv_lengths.last().copied()
    }

    /// Returns true if a number of `length` digits is acceptable.
    #[inline]
    pub fn is_valid_length(&self, length: usize) -> bool {
        self.lengths.contains(&length)
    }

    /// Returns true if a CVC of `length` digits is acceptable.
    #[inline]
    pub fn is_valid_cvv_length(&self, length: usize) -> bool {
        self.cvv_lengths.contains(&length)
    }

    /// Returns true if any of the ranges matches the leading digits.
    #[inline]
    pub fn matches(&self, digits: &str) -> bool {
        self.ranges
            .iter()
            .any(|range| crate::detect::range_matches(range, digits))
    }
}

/// A card number accepted by [`validate_card`](crate::validate_card).
///
/// The digits are kept private and wiped from memory on drop. `Debug` and
/// `Display` only ever show the masked number.
pub struct ValidatedCard<'r> {
    definition: &'r CardDefinition,
    digits: String,
}

impl<'r> ValidatedCard<'r> {
    pub(crate) fn new(definition: &'r CardDefinition, digits: String) -> Self {
        Self { definition, digits }
    }

    /// Returns the matched definition.
    #[inline]
    pub fn definition(&self) -> &'r CardDefinition {
        self.definition
    }

    /// Returns the detected network.
    #[inline]
    pub fn card_type(&self) -> CardType {
        self.definition.card_type()
    }

    /// Returns the number of digits.
    #[inline]
    pub fn length(&self) -> usize {
        self.digits.len()
    }

    /// Returns the last four digits.
    pub fn last_four(&self) -> &str {
        let start = self.digits.len().saturating_sub(4);
        &self.digits[start..]
    }

    /// Returns the full number.
    ///
    /// # Security Warning
    ///
    /// Never log the result. Use [`masked`](Self::masked) for display.
    #[inline]
    pub fn number(&self) -> &str {
        &self.digits
    }

    /// Returns the number grouped for display with the given separator.
    pub fn formatted(&self, separator: Separator) -> String {
        format::format_card_number(Some(self.definition), &self.digits, separator)
            .unwrap_or_default()
    }

    /// Returns the grouped number with every digit but the last four masked.
    ///
    /// Format: `**** **** **** 1111`. Numbers longer than the definition's
    /// slots are grouped in fours so the last four stay visible.
    pub fn masked(&self) -> String {
        let masked = crate::mask::mask_digits(&self.digits, 4);
        let covered: usize = format::split_into_groups(self.definition, &masked)
            .iter()
            .map(String::len)
            .sum();
        if covered == masked.len() {
            if let Some(grouped) =
                format::format_card_number(Some(self.definition), &masked, Separator::default())
            {
                return grouped;
            }
        }
        masked
            .as_bytes()
            .chunks(DEFAULT_GROUP_WIDTH)
            .map(String::from_utf8_lossy)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Clone for ValidatedCard<'_> {
    fn clone(&self) -> Self {
        Self {
            definition: self.definition,
            digits: self.digits.clone(),
        }
    }
}

impl fmt::Debug for ValidatedCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCard")
            .field("card_type", &self.card_type())
            .field("number", &self.masked())
            .field("length", &self.length())
            .finish()
    }
}

impl fmt::Display for ValidatedCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.definition.display_name(), self.masked())
    }
}

impl Drop for ValidatedCard<'_> {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}
