//! CLI tool for card number detection, formatting and validation.
//!
//! # Usage
//!
//! ```bash
//! # Detect the card type of a (partial) number
//! ccformat detect 3782
//!
//! # Format as a payment form would
//! ccformat format 378282246310005 --separator -
//!
//! # Validate, accepting only some types
//! ccformat validate 4111111111111111 --allow visa --allow mastercard
//!
//! # Check a security code against the card it belongs to
//! ccformat cvc 1234 --type amex
//!
//! # Check an expiry month and year
//! ccformat expiry 07 30
//!
//! # Use a custom registry
//! ccformat --registry cards.json types
//! ```
//!
//! Log output goes to stderr and is controlled with `RUST_LOG`.

use std::path::PathBuf;

use cc_format::{
    cvv, expiry, format, generate, luhn, mask, validate_card, CardDefinition, CardRegistry,
    CardType, Separator,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ccformat")]
#[command(
    author,
    version,
    about = "Credit card number detection, formatting and validation"
)]
struct Cli {
    /// Load card definitions from a JSON file instead of the built-in table
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the card type from a full or partial number
    Detect {
        /// Card number (or its first digits)
        card_number: String,

        /// Only detect these types (repeatable)
        #[arg(short, long)]
        allow: Vec<TypeArg>,
    },

    /// Format a card number into display groups
    Format {
        /// Card number to format
        card_number: String,

        /// Single-character group separator
        #[arg(short, long, default_value = " ")]
        separator: String,

        /// Only detect these types (repeatable)
        #[arg(short, long)]
        allow: Vec<TypeArg>,
    },

    /// Validate a complete card number
    Validate {
        /// Card number to validate (spaces and dashes allowed)
        card_number: String,

        /// Only accept these types (repeatable)
        #[arg(short, long)]
        allow: Vec<TypeArg>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Check if a number passes the Luhn checksum
    Luhn {
        /// Number to check
        card_number: String,
    },

    /// Validate a security code
    Cvc {
        /// Security code to validate
        cvc: String,

        /// Card type the code belongs to
        #[arg(short = 't', long = "type", conflicts_with = "card")]
        card_type: Option<TypeArg>,

        /// Card number the code belongs to
        #[arg(short, long)]
        card: Option<String>,
    },

    /// Validate an expiry month and year
    Expiry {
        /// Month (1-12)
        month: String,

        /// Year (YY or YYYY)
        year: String,
    },

    /// Mask a card number or security code for display
    Mask {
        /// Value to mask
        value: String,

        /// Digits left visible at the end (0 shows the formatted number)
        #[arg(short, long, default_value = "4")]
        show_last: usize,

        /// Treat the value as a security code and mask all of it
        #[arg(long)]
        cvv: bool,
    },

    /// Generate test card numbers (for testing only)
    Generate {
        /// Card type to generate
        #[arg(short = 't', long = "type", default_value = "visa")]
        card_type: TypeArg,

        /// Number of cards to generate
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Output formatted (with spaces)
        #[arg(short, long)]
        formatted: bool,
    },

    /// List the card definitions in match order
    Types {
        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Maestro,
    Forbrugsforeningen,
    Dankort,
    Visa,
    Mastercard,
    Amex,
    #[value(name = "dinersclub")]
    DinersClub,
    Discover,
    #[value(name = "unionpay")]
    UnionPay,
    Jcb,
}

impl From<TypeArg> for CardType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Maestro => CardType::Maestro,
            TypeArg::Forbrugsforeningen => CardType::Forbrugsforeningen,
            TypeArg::Dankort => CardType::Dankort,
            TypeArg::Visa => CardType::Visa,
            TypeArg::Mastercard => CardType::Mastercard,
            TypeArg::Amex => CardType::Amex,
            TypeArg::DinersClub => CardType::DinersClub,
            TypeArg::Discover => CardType::Discover,
            TypeArg::UnionPay => CardType::UnionPay,
            TypeArg::Jcb => CardType::Jcb,
        }
    }
}

fn types(args: &[TypeArg]) -> Vec<CardType> {
    args.iter().map(|&t| t.into()).collect()
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let loaded;
    let registry = match &cli.registry {
        Some(path) => match CardRegistry::from_file(path) {
            Ok(r) => {
                loaded = r;
                &loaded
            }
            Err(e) => {
                eprintln!("Error: cannot load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => CardRegistry::builtin(),
    };

    match cli.command {
        Commands::Detect { card_number, allow } => {
            cmd_detect(registry, &card_number, &types(&allow));
        }
        Commands::Format {
            card_number,
            separator,
            allow,
        } => {
            cmd_format(registry, &card_number, &separator, &types(&allow));
        }
        Commands::Validate {
            card_number,
            allow,
            output,
        } => {
            cmd_validate(registry, &card_number, &types(&allow), output);
        }
        Commands::Luhn { card_number } => {
            cmd_luhn(&card_number);
        }
        Commands::Cvc {
            cvc,
            card_type,
            card,
        } => {
            let definition = match (card_type, card) {
                (Some(t), _) => registry.find(t.into()).next(),
                (None, Some(number)) => {
                    registry.detect(&format::strip_formatting(&number), &[])
                }
                (None, None) => None,
            };
            cmd_cvc(&cvc, definition);
        }
        Commands::Expiry { month, year } => {
            cmd_expiry(&month, &year);
        }
        Commands::Mask {
            value,
            show_last,
            cvv,
        } => {
            if cvv {
                println!("{}", mask::mask_cvv(&value));
            } else {
                println!("{}", mask::mask_card_number(&value, registry, show_last));
            }
        }
        Commands::Generate {
            card_type,
            count,
            formatted,
        } => {
            cmd_generate(registry, card_type.into(), count, formatted);
        }
        Commands::Types { output } => {
            cmd_types(registry, output);
        }
    }
}

fn describe(definition: &CardDefinition) {
    let ranges: Vec<String> = definition.ranges().iter().map(|r| r.to_string()).collect();
    println!("Type: {}", definition.display_name());
    println!("Id: {}", definition.card_type());
    println!("Ranges: {}", ranges.join(", "));
    println!("Valid Lengths: {:?}", definition.lengths());
    println!("CVC Lengths: {:?}", definition.cvv_lengths());
    println!("Format: {}", definition.format());
    println!("Luhn: {}", if definition.luhn_required() { "yes" } else { "no" });
}

fn cmd_detect(registry: &CardRegistry, card_number: &str, allowed: &[CardType]) {
    let digits = format::strip_formatting(card_number);
    if digits.is_empty() {
        eprintln!("Error: No digits provided");
        std::process::exit(1);
    }

    match registry.detect(&digits, allowed) {
        Some(definition) => describe(definition),
        None => {
            println!("Type: Unknown");
            std::process::exit(1);
        }
    }
}

fn cmd_format(registry: &CardRegistry, card_number: &str, separator: &str, allowed: &[CardType]) {
    let separator = match Separator::new(separator) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let digits = format::strip_formatting(card_number);
    let card = registry.detect(&digits, allowed);
    println!(
        "{}",
        format::format_card_number(card, &digits, separator).unwrap_or_default()
    );
}

fn cmd_validate(
    registry: &CardRegistry,
    card_number: &str,
    allowed: &[CardType],
    output: OutputFormat,
) {
    match validate_card(card_number, registry, allowed) {
        Ok(card) => {
            match output {
                OutputFormat::Text => {
                    println!("Valid: yes");
                    println!("Type: {}", card.definition().display_name());
                    println!("Last Four: {}", card.last_four());
                    println!("Masked: {}", card.masked());
                }
                OutputFormat::Json => {
                    let value = serde_json::json!({
                        "valid": true,
                        "type": card.card_type(),
                        "displayName": card.definition().display_name(),
                        "lastFour": card.last_four(),
                        "masked": card.masked(),
                    });
                    println!("{:#}", value);
                }
            }
            std::process::exit(0);
        }
        Err(e) => {
            match output {
                OutputFormat::Text => {
                    println!("Valid: no");
                    println!("Error: {}", e);
                }
                OutputFormat::Json => {
                    let value = serde_json::json!({
                        "valid": false,
                        "error": e.to_string(),
                    });
                    println!("{:#}", value);
                }
            }
            std::process::exit(1);
        }
    }
}

fn cmd_luhn(card_number: &str) {
    if luhn::is_luhn_valid(&format::strip_formatting(card_number)) {
        println!("Luhn check: PASS");
        std::process::exit(0);
    } else {
        println!("Luhn check: FAIL");
        std::process::exit(1);
    }
}

fn cmd_cvc(input: &str, card: Option<&CardDefinition>) {
    match cvv::validate_cvc(input, card) {
        Ok(()) => {
            println!("Valid: yes");
            println!("Length: {} digits", input.len());
            std::process::exit(0);
        }
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_expiry(month: &str, year: &str) {
    let month = expiry::sanitize_month(month);
    let year = expiry::sanitize_year(year);

    let result = expiry::validate_year(&year)
        .and_then(|y| expiry::validate_month(&month, Some(&year)).map(|m| (m, y)));

    match result {
        Ok((m, y)) => {
            println!("Valid: yes");
            println!("Expires: {:02}/{}", m, y);
            std::process::exit(0);
        }
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_generate(registry: &CardRegistry, card_type: CardType, count: usize, formatted: bool) {
    let Some(definition) = registry.find(card_type).next() else {
        eprintln!("Error: no {} definition in the registry", card_type);
        std::process::exit(1);
    };

    for _ in 0..count {
        let Some(number) = generate::generate_for_definition(definition) else {
            eprintln!("Error: cannot generate numbers for {}", definition.display_name());
            std::process::exit(1);
        };
        if formatted {
            let shown = format::format_card_number(Some(definition), &number, Separator::default());
            println!("{}", shown.unwrap_or(number));
        } else {
            println!("{}", number);
        }
    }
}

fn cmd_types(registry: &CardRegistry, output: OutputFormat) {
    match output {
        OutputFormat::Text => {
            for (i, definition) in registry.definitions().iter().enumerate() {
                if i > 0 {
                    println!();
                }
                describe(definition);
            }
        }
        OutputFormat::Json => match registry.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }
}
