//! Fuzz target for security code handling.
//!
//! Tests that CVC functions never panic on arbitrary input.

#![no_main]

use cc_format::{cvv, mask, CardRegistry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = cvv::validate_cvc(data, None);
    let _ = mask::mask_cvv(data);

    for definition in CardRegistry::builtin().definitions() {
        let sanitized = cvv::sanitize_cvc(data, Some(definition));
        assert!(sanitized.len() <= definition.max_cvv_length().unwrap_or(usize::MAX));

        let _ = cvv::validate_cvc(data, Some(definition));
        if definition.is_valid_cvv_length(sanitized.len()) {
            assert!(cvv::validate_cvc(&sanitized, Some(definition)).is_ok());
        }
    }
});
