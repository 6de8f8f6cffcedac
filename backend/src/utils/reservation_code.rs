//! Human-readable reservation codes: `{PROPERTY}-{UNIT_TYPE}-{XXXX}`.
//!
//! The suffix is random but not secret. Uniqueness comes from the database
//! constraint and a bounded retry in the booking transaction.

use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

use pms_shared::{RESERVATION_CODE_ALPHABET, RESERVATION_CODE_PATTERN, RESERVATION_CODE_SUFFIX_LEN};

fn code_segment(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_uppercase();
            if c.is_ascii_alphanumeric() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn generate_reservation_code<R: Rng + ?Sized>(
    rng: &mut R,
    property_code: &str,
    unit_type_code: &str,
) -> String {
    let suffix: String = (0..RESERVATION_CODE_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..RESERVATION_CODE_ALPHABET.len());
            RESERVATION_CODE_ALPHABET[idx] as char
        })
        .collect();

    format!(
        "{}-{}-{}",
        code_segment(property_code),
        code_segment(unit_type_code),
        suffix
    )
}

pub fn is_valid_reservation_code(code: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(RESERVATION_CODE_PATTERN).expect("reservation code pattern is a valid regex"))
        .is_match(code)
}
