//! Stateful form-field adapters over the pure core.
//!
//! A UI layer owns one adapter per input field and feeds it every
//! value-changing event. The adapter keeps the text to display, the digits to
//! submit, and the detected card, and turns validation into one distinct
//! error per field. Cursor placement and keystroke filtering belong to the
//! UI toolkit and are not handled here.
//!
//! # Example
//!
//! ```
//! use cc_format::field::{CardNumberField, CvcField};
//! use cc_format::CardRegistry;
//!
//! let registry = CardRegistry::builtin();
//! let mut number = CardNumberField::new(registry);
//!
//! assert!(number.input("3782822463"));
//! assert_eq!(number.formatted(), "3782 822463");
//! assert_eq!(number.value(), "3782822463");
//!
//! let mut cvc = CvcField::new();
//! cvc.set_card(number.card());
//! cvc.input("12345");
//! assert_eq!(cvc.value(), "1234");
//! assert!(cvc.validate().is_ok());
//! ```

use crate::card::{CardDefinition, CardType};
use crate::cvv::{sanitize_cvc, validate_cvc, CvcError};
use crate::error::{FormatError, ValidationError};
use crate::format::{format_card_number, strip_formatting, Separator};
use crate::registry::CardRegistry;
use crate::validate::validate_card;

/// Card number input state.
#[derive(Debug, Clone)]
pub struct CardNumberField<'r> {
    registry: &'r CardRegistry,
    separator: Separator,
    allowed: Vec<CardType>,
    formatted: String,
    value: String,
    card: Option<&'r CardDefinition>,
}

impl<'r> CardNumberField<'r> {
    /// Creates an empty field using `registry` for detection.
    pub fn new(registry: &'r CardRegistry) -> Self {
        Self {
            registry,
            separator: Separator::default(),
            allowed: Vec::new(),
            formatted: String::new(),
            value: String::new(),
            card: None,
        }
    }

    /// Changes the group separator and re-formats the current value.
    ///
    /// # Errors
    ///
    /// Rejects anything but a single character; the field is left unchanged.
    pub fn set_separator(&mut self, separator: &str) -> Result<(), FormatError> {
        self.separator = Separator::new(separator)?;
        let current = self.value.clone();
        self.update(&current);
        Ok(())
    }

    /// Restricts detection to these types (empty allows all) and re-formats.
    pub fn set_allowed_types(&mut self, allowed: impl IntoIterator<Item = CardType>) {
        self.allowed = allowed.into_iter().collect();
        let current = self.value.clone();
        self.update(&current);
    }

    /// Handles user input. Returns true if the submitted digits changed.
    pub fn input(&mut self, raw: &str) -> bool {
        let previous = std::mem::take(&mut self.value);
        self.update(raw);
        let changed = previous != self.value;
        if changed {
            tracing::trace!(
                digits = self.value.len(),
                card_type = ?self.card_type(),
                "card number field changed"
            );
        }
        changed
    }

    /// Sets the value programmatically (e.g. from a saved form).
    pub fn write_value(&mut self, value: &str) {
        self.update(value);
    }

    /// Returns the grouped text to display.
    #[inline]
    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    /// Returns the digits to submit.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the separator in use.
    #[inline]
    pub fn separator(&self) -> Separator {
        self.separator
    }

    /// Returns the allow-list in use.
    #[inline]
    pub fn allowed_types(&self) -> &[CardType] {
        &self.allowed
    }

    /// Returns the detected card, honouring the allow-list.
    #[inline]
    pub fn card(&self) -> Option<&'r CardDefinition> {
        self.card
    }

    /// Returns the detected card type.
    #[inline]
    pub fn card_type(&self) -> Option<CardType> {
        self.card.map(CardDefinition::card_type)
    }

    /// Validates the current value.
    ///
    /// An empty field passes; whether a value is required is a separate rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.value.is_empty() {
            return Ok(());
        }
        validate_card(&self.value, self.registry, &self.allowed).map(|_| ())
    }

    fn update(&mut self, raw: &str) {
        let mut digits = strip_formatting(raw);
        self.card = self.registry.detect(&digits, &self.allowed);
        if let Some(max) = self.card.and_then(CardDefinition::max_length) {
            digits.truncate(max);
        }
        self.formatted =
            format_card_number(self.card, &digits, self.separator).unwrap_or_default();
        // Slot patterns may show fewer digits than the card holds
        self.value = digits;
    }
}

/// Security code input state.
#[derive(Debug, Clone, Default)]
pub struct CvcField<'r> {
    card: Option<&'r CardDefinition>,
    value: String,
}

impl<'r> CvcField<'r> {
    /// Creates an empty field with no card known.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the card the code belongs to and re-applies its length limit.
    pub fn set_card(&mut self, card: Option<&'r CardDefinition>) {
        self.card = card;
        self.value = sanitize_cvc(&self.value, self.card);
    }

    /// Handles user input. Returns true if the value changed.
    pub fn input(&mut self, raw: &str) -> bool {
        let sanitized = sanitize_cvc(raw, self.card);
        if sanitized == self.value {
            return false;
        }
        self.value = sanitized;
        true
    }

    /// Returns the current code.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the card the code is checked against.
    #[inline]
    pub fn card(&self) -> Option<&'r CardDefinition> {
        self.card
    }

    /// Validates the current code. An empty field passes.
    pub fn validate(&self) -> Result<(), CvcError> {
        if self.value.is_empty() {
            return Ok(());
        }
        validate_cvc(&self.value, self.card)
    }
}
