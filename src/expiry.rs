//! Expiry month and year fields.
//!
//! Month and year are entered separately. Each has a sanitizer, applied to
//! the raw text as it is typed, and a validator, applied to the sanitized
//! value.
//!
//! - Month: digits only, left-padded to two characters (`"7"` → `"07"`).
//! - Year: digits only; two-digit years are expanded with a pivot of 68
//!   (`"30"` → `"2030"`, `"75"` → `"1975"`).
//! - A card is valid through the end of its expiry month.
//! - Years more than 50 years ahead are rejected.
//!
//! # Example
//!
//! ```
//! use cc_format::expiry::{sanitize_month, sanitize_year, validate_month_at, validate_year_at, YearMonth};
//!
//! assert_eq!(sanitize_month("7"), "07");
//! assert_eq!(sanitize_year("30"), "2030");
//!
//! let today = YearMonth::new(2026, 10).unwrap();
//! assert_eq!(validate_year_at("2030", today), Ok(2030));
//! assert_eq!(validate_month_at("10", Some("2026"), today), Ok(10));
//! assert!(validate_month_at("09", Some("2026"), today).is_err());
//! ```

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::format::strip_formatting;

/// How far ahead an expiry year may be.
pub const MAX_YEARS_AHEAD: u16 = 50;

/// Two-digit years above this belong to the 1900s.
pub const TWO_DIGIT_YEAR_PIVOT: u16 = 68;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: u16,
    month: u8,
}

impl YearMonth {
    /// Creates a year/month pair.
    ///
    /// Returns `None` if the month is not 1-12.
    pub fn new(year: u16, month: u8) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    /// Returns the current UTC month from the system clock.
    pub fn current() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::from_unix_days((secs / 86_400) as i64)
    }

    /// Converts days since 1970-01-01 to the containing calendar month.
    fn from_unix_days(days: i64) -> Self {
        // Civil-from-days over 400-year eras starting on March 1st.
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self {
            year: year.clamp(0, u16::MAX as i64) as u16,
            month: month as u8,
        }
    }

    /// Returns the four-digit year.
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the month (1-12).
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

/// Errors from the expiry validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryError {
    /// The month is not one or two digits in 1-12.
    InvalidMonth,
    /// The year is malformed or outside the accepted window.
    InvalidYear,
    /// The month/year pair lies before the current month.
    Expired {
        /// The expiry month.
        month: u8,
        /// The expiry year.
        year: u16,
    },
}

impl fmt::Display for ExpiryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMonth => write!(f, "invalid month: must be 01-12"),
            Self::InvalidYear => write!(
                f,
                "invalid year: must be 2 or 4 digits, at most {} years ahead",
                MAX_YEARS_AHEAD
            ),
            Self::Expired { month, year } => {
                write!(f, "card expired ({:02}/{})", month, year)
            }
        }
    }
}

impl std::error::Error for ExpiryError {}

/// Expands a two-digit year around the pivot.
///
/// ```
/// use cc_format::expiry::expand_two_digit_year;
///
/// assert_eq!(expand_two_digit_year(68), 2068);
/// assert_eq!(expand_two_digit_year(69), 1969);
/// ```
#[inline]
pub const fn expand_two_digit_year(yy: u16) -> u16 {
    if yy > TWO_DIGIT_YEAR_PIVOT {
        1900 + yy
    } else {
        2000 + yy
    }
}

/// Cleans a month as typed: digits only, padded or cut to the last two.
pub fn sanitize_month(input: &str) -> String {
    let digits = strip_formatting(input);
    if digits.is_empty() {
        return digits;
    }
    let padded = format!("0{}", digits);
    padded[padded.len() - 2..].to_string()
}

/// Cleans a year as typed: digits only, two-digit years expanded.
pub fn sanitize_year(input: &str) -> String {
    let digits = strip_formatting(input);
    if digits.len() == 2 {
        if let Ok(yy) = digits.parse::<u16>() {
            return expand_two_digit_year(yy).to_string();
        }
    }
    digits
}

/// Validates a month against the current date.
///
/// `year` is the companion year field; see [`validate_month_at`].
pub fn validate_month(month: &str, year: Option<&str>) -> Result<u8, ExpiryError> {
    validate_month_at(month, year, YearMonth::current())
}

/// Validates a month as of `today`.
///
/// The month must be one or two ASCII digits in 1-12. Together with `year`
/// it must not be before `today`'s month; a missing or non-numeric year
/// counts as year 0, so the month reads as expired until a year is entered.
pub fn validate_month_at(
    month: &str,
    year: Option<&str>,
    today: YearMonth,
) -> Result<u8, ExpiryError> {
    if month.is_empty() || month.len() > 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExpiryError::InvalidMonth);
    }

    let month: u8 = month.parse().map_err(|_| ExpiryError::InvalidMonth)?;
    if !(1..=12).contains(&month) {
        return Err(ExpiryError::InvalidMonth);
    }

    let year: u16 = year
        .map(strip_formatting)
        .and_then(|y| y.parse().ok())
        .unwrap_or(0);

    if (year, month) < (today.year, today.month) {
        return Err(ExpiryError::Expired { month, year });
    }

    Ok(month)
}

/// Validates a year against the current date.
pub fn validate_year(year: &str) -> Result<u16, ExpiryError> {
    validate_year_at(year, YearMonth::current())
}

/// Validates a year as of `today`.
///
/// Two or four ASCII digits; two-digit years are expanded. The result must
/// lie within `today.year() ..= today.year() + 50`.
pub fn validate_year_at(year: &str, today: YearMonth) -> Result<u16, ExpiryError> {
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExpiryError::InvalidYear);
    }

    let value: u16 = match year.len() {
        2 => expand_two_digit_year(year.parse().map_err(|_| ExpiryError::InvalidYear)?),
        4 => year.parse().map_err(|_| ExpiryError::InvalidYear)?,
        _ => return Err(ExpiryError::InvalidYear),
    };

    if value < today.year || value > today.year.saturating_add(MAX_YEARS_AHEAD) {
        return Err(ExpiryError::InvalidYear);
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> YearMonth {
        YearMonth::new(2026, 10).unwrap()
    }

    #[test]
    fn test_year_month_new() {
        assert!(YearMonth::new(2025, 1).is_some());
        assert!(YearMonth::new(2025, 12).is_some());
        assert!(YearMonth::new(2025, 0).is_none());
        assert!(YearMonth::new(2025, 13).is_none());
        assert_eq!(YearMonth::new(2025, 3).unwrap().to_string(), "03/2025");
    }

    #[test]
    fn test_from_unix_days() {
        assert_eq!(YearMonth::from_unix_days(0), YearMonth::new(1970, 1).unwrap());
        // 2000-02-29
        assert_eq!(YearMonth::from_unix_days(11_016), YearMonth::new(2000, 2).unwrap());
        // 2000-03-01
        assert_eq!(YearMonth::from_unix_days(11_017), YearMonth::new(2000, 3).unwrap());
        // 2024-12-31
        assert_eq!(YearMonth::from_unix_days(20_088), YearMonth::new(2024, 12).unwrap());
    }

    #[test]
    fn test_current_is_plausible() {
        let now = YearMonth::current();
        assert!(now.year() >= 2024);
        assert!((1..=12).contains(&now.month()));
    }

    #[test]
    fn test_sanitize_month() {
        assert_eq!(sanitize_month("7"), "07");
        assert_eq!(sanitize_month("12"), "12");
        assert_eq!(sanitize_month("123"), "23");
        assert_eq!(sanitize_month("1/"), "01");
        assert_eq!(sanitize_month(""), "");
        assert_eq!(sanitize_month("ab"), "");
    }

    #[test]
    fn test_sanitize_year() {
        assert_eq!(sanitize_year("30"), "2030");
        assert_eq!(sanitize_year("69"), "1969");
        assert_eq!(sanitize_year("2031"), "2031");
        assert_eq!(sanitize_year("203"), "203");
        assert_eq!(sanitize_year("'31"), "2031");
    }

    #[test]
    fn test_validate_month_format() {
        assert_eq!(validate_month_at("", Some("2030"), today()), Err(ExpiryError::InvalidMonth));
        assert_eq!(validate_month_at("1a", Some("2030"), today()), Err(ExpiryError::InvalidMonth));
        assert_eq!(validate_month_at("012", Some("2030"), today()), Err(ExpiryError::InvalidMonth));
        assert_eq!(validate_month_at("00", Some("2030"), today()), Err(ExpiryError::InvalidMonth));
        assert_eq!(validate_month_at("13", Some("2030"), today()), Err(ExpiryError::InvalidMonth));
        assert_eq!(validate_month_at("1", Some("2030"), today()), Ok(1));
        assert_eq!(validate_month_at("12", Some("2030"), today()), Ok(12));
    }

    #[test]
    fn test_validate_month_expiry() {
        // Current month is still valid
        assert_eq!(validate_month_at("10", Some("2026"), today()), Ok(10));
        assert_eq!(
            validate_month_at("09", Some("2026"), today()),
            Err(ExpiryError::Expired {
                month: 9,
                year: 2026
            })
        );
        assert_eq!(validate_month_at("01", Some("2027"), today()), Ok(1));
        // No year yet
        assert!(matches!(
            validate_month_at("12", None, today()),
            Err(ExpiryError::Expired { year: 0, .. })
        ));
    }

    #[test]
    fn test_validate_year() {
        assert_eq!(validate_year_at("2026", today()), Ok(2026));
        assert_eq!(validate_year_at("30", today()), Ok(2030));
        assert_eq!(validate_year_at("2076", today()), Ok(2076));
        assert_eq!(validate_year_at("2077", today()), Err(ExpiryError::InvalidYear));
        assert_eq!(validate_year_at("2025", today()), Err(ExpiryError::InvalidYear));
        // 99 expands to 1999
        assert_eq!(validate_year_at("99", today()), Err(ExpiryError::InvalidYear));
        assert_eq!(validate_year_at("203", today()), Err(ExpiryError::InvalidYear));
        assert_eq!(validate_year_at("20 30", today()), Err(ExpiryError::InvalidYear));
        assert_eq!(validate_year_at("", today()), Err(ExpiryError::InvalidYear));
    }

    #[test]
    fn test_sanitized_values_validate() {
        let month = sanitize_month("3");
        let year = sanitize_year("29");
        assert_eq!(validate_year_at(&year, today()), Ok(2029));
        assert_eq!(validate_month_at(&month, Some(&year), today()), Ok(3));
    }
}
