//! Luhn (mod 10) checksum.
//!
//! Most card networks end the number with a Luhn check digit, which catches
//! every single-digit error and most adjacent transpositions.

/// Lookup table for doubled digits: double the value, subtract 9 if > 9.
/// Index is the digit (0-9), value is the transformed result.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Checks a card number given as text.
///
/// The input is expected to contain ASCII digits only; callers strip
/// separators first. Any other character makes the check fail.
///
/// An empty string sums to zero and therefore passes, as does `"0"`.
///
/// # Example
///
/// ```
/// use cc_format::luhn::is_luhn_valid;
///
/// assert!(is_luhn_valid("4111111111111111"));
/// assert!(!is_luhn_valid("4111111111111112"));
/// ```
pub fn is_luhn_valid(digits: &str) -> bool {
    let mut values = Vec::with_capacity(digits.len());
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            return false;
        }
        values.push(b - b'0');
    }
    validate(&values)
}

/// Validates a sequence of digit values (0-9) using the Luhn algorithm.
///
/// # Algorithm
///
/// 1. Starting from the rightmost digit (check digit), moving left
/// 2. Double every second digit
/// 3. If doubling results in a number > 9, subtract 9
/// 4. Sum all digits
/// 5. If the sum is divisible by 10, the number is valid
///
/// # Example
///
/// ```
/// use cc_format::luhn::validate;
///
/// assert!(validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]));
/// assert!(!validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2]));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    compute_checksum(digits) % 10 == 0
}

/// Computes the Luhn sum (not reduced modulo 10).
///
/// Digits above 9 are reduced modulo 10 so the table lookup never panics.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = d % 10;
            if i % 2 == 1 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum()
}

/// Generates the check digit for a number that does not have one yet.
///
/// # Example
///
/// ```
/// use cc_format::luhn::generate_check_digit;
///
/// let partial = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
/// assert_eq!(generate_check_digit(&partial), 1);
/// ```
#[inline]
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    // Appending a digit shifts every existing digit one position left, so
    // the rightmost one we have is doubled.
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = d % 10;
            if i % 2 == 0 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum();

    ((10 - (sum % 10)) % 10) as u8
}
