//! Fuzz target for the expiry fields.
//!
//! Tests that sanitizers and validators never panic on arbitrary input.

#![no_main]

use cc_format::expiry::{self, YearMonth};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (month, year) = data;

    let sanitized_month = expiry::sanitize_month(month);
    assert!(sanitized_month.is_empty() || sanitized_month.len() == 2);
    let sanitized_year = expiry::sanitize_year(year);

    let today = YearMonth::new(2026, 10).unwrap();
    let _ = expiry::validate_month_at(month, Some(year), today);
    let _ = expiry::validate_month_at(&sanitized_month, None, today);

    if let Ok(y) = expiry::validate_year_at(&sanitized_year, today) {
        assert!((2026..=2076).contains(&y));
        if let Ok(m) = expiry::validate_month_at(&sanitized_month, Some(&sanitized_year), today) {
            assert!((1..=12).contains(&m));
        }
    }
});
