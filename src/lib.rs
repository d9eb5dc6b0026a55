//! # cc_format
//!
//! Credit card number detection, formatting and validation for payment forms.
//!
//! ## Features
//!
//! - Card type detection from a configurable registry of definitions
//! - As-you-type grouping (4-4-4-4, Amex 4-6-5, Diners 4-6-4)
//! - Luhn checksum
//! - Composite validation with one distinct error per failure
//! - Security code and expiry month/year fields
//! - Display masking
//!
//! ## Quick Start
//!
//! ```rust
//! use cc_format::{validate_card, CardRegistry, CardType, Separator};
//!
//! let registry = CardRegistry::builtin();
//!
//! // Detection works on partial input
//! let card = registry.detect("3782", &[]).unwrap();
//! assert_eq!(card.display_name(), "American Express");
//!
//! // Format as the user types
//! let shown = cc_format::format_card_number(Some(card), "3782822463", Separator::default());
//! assert_eq!(shown.as_deref(), Some("3782 822463"));
//!
//! // Validate the full number
//! let card = validate_card("4111 1111 1111 1111", registry, &[]).unwrap();
//! assert_eq!(card.card_type(), CardType::Visa);
//!
//! // Safe for logging - never exposes the full number
//! assert_eq!(card.masked(), "**** **** **** 1111");
//! ```
//!
//! ## Allow-lists
//!
//! Every entry point that detects a card takes a list of accepted types. An
//! empty list accepts every type.
//!
//! ```rust
//! use cc_format::{validate_card, CardRegistry, CardType, ValidationError};
//!
//! let registry = CardRegistry::builtin();
//! assert_eq!(registry.detect("5500", &[CardType::Visa]), None);
//!
//! let err = validate_card("5500000000000004", registry, &[CardType::Visa]).unwrap_err();
//! assert_eq!(err, ValidationError::DisallowedType { card_type: CardType::Mastercard });
//! ```
//!
//! ## Custom Registries
//!
//! ```rust
//! use cc_format::{CardDefinition, CardRegistry, CardType};
//!
//! let registry = CardRegistry::default()
//!     .prepend([CardDefinition::new(CardType::Visa, "Visa Debit")
//!         .with_prefix("4000")
//!         .with_lengths([16])])
//!     .unwrap();
//!
//! assert_eq!(registry.card_type_label("4000"), "Visa Debit");
//! assert_eq!(registry.card_type_label("4111"), "Visa");
//! ```
//!
//! ## Built-in Card Types
//!
//! | Type | Ranges | Length | CVC | Luhn |
//! |------|--------|--------|-----|------|
//! | Maestro | 5018, 5020, 5038, 5612, 5893, 6304, 6759, 6761-6763, 0604, 6390 | 12-19 | 3 | yes |
//! | Forbrugsforeningen | 600 | 16 | 3 | yes |
//! | Dankort | 5019 | 16 | 3 | yes |
//! | Visa | 4 | 13, 16, 19 | 3 | yes |
//! | Mastercard | 51-55, 2221-2720 | 16 | 3 | yes |
//! | American Express | 34, 37 | 15 | 3, 4 | yes |
//! | Diners Club | 300-305, 3095, 38-39 | 16, 19 | 3 | yes |
//! | Diners Club | 36 | 14, 16, 19 | 3 | yes |
//! | Discover | 6011, 6440-6505, 650601-650609, 650611-659999 | 16 | 3 | yes |
//! | UnionPay | 622126-622925, 624000-626999, 628200-628899 | 16-19 | 3 | no |
//! | JCB | 3528-3589 | 16, 19 | 3 | yes |
//!
//! Definitions are tried in this order and the first match wins.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `registry-json` | Load and save registries as JSON |
//! | `generate` | Random test number generation |
//! | `cli` | The `ccformat` command-line tool |
//!
//! ## Security
//!
//! - `ValidatedCard` zeroizes its digits when dropped
//! - `Debug` and `Display` show masked numbers only
//! - Log events carry lengths and card types, never numbers
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod card;
pub mod cvv;
pub mod detect;
pub mod error;
pub mod expiry;
pub mod field;
pub mod format;
pub mod generate;
pub mod luhn;
pub mod mask;
pub mod registry;
pub mod validate;

// Re-export main types at crate root
pub use card::{CardDefinition, CardRange, CardType, GroupPattern, ValidatedCard};
pub use detect::detect_card;
pub use error::{FormatError, RegistryError, ValidationError};
pub use format::{format_card_number, Separator};
pub use luhn::is_luhn_valid;
pub use registry::CardRegistry;
pub use validate::{is_valid, validate_card};
