//! National-ID check-digit computation and validation
//!
//! Implements the modulo-11 weighted-sum scheme: decimal digits are scanned
//! from least to most significant, multiplied by weights cycling through
//! 2..=7, and the check character is derived from `11 - (sum % 11)` with 11
//! mapping to '0' and 10 to 'K'.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compute the check character for a national-ID number.
///
/// Always returns a character in `'0'..='9'` or `'K'`.
pub fn compute_check_digit(number: u64) -> char {
    let mut multiplier = 2u32;
    let mut sum = 0u32;
    let mut rest = number;

    // A body of 0 still contributes one digit, matching the decimal
    // string scan of the reference scheme.
    loop {
        sum += multiplier * (rest % 10) as u32;
        rest /= 10;
        multiplier += 1;
        if multiplier >= 8 {
            multiplier = 2;
        }
        if rest == 0 {
            break;
        }
    }

    let digit = 11 - (sum % 11);
    match digit {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

/// True iff `check` equals the computed check character for `number`.
///
/// The scheme defines 'K' as uppercase; lowercase 'k' is accepted as well
/// because incorrectly cased records are common in practice.
pub fn validate(number: u64, check: char) -> bool {
    let computed = compute_check_digit(number);
    check == computed || (check == 'k' && computed == 'K')
}

/// A national identification number: numeric body plus check character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NationalId {
    /// Numeric body of the identifier
    pub number: u64,
    /// Check character, canonical uppercase
    pub check_digit: char,
}

impl NationalId {
    /// Parse a raw identifier into body and check character.
    ///
    /// Thousands separators (`.`) and hyphens are stripped; the last
    /// remaining character is the check character and everything before it
    /// is the numeric body. Returns `None` for empty input, input of length
    /// <= 1 after stripping, or a body that is not a decimal number. Never
    /// panics.
    pub fn normalize(raw: &str) -> Option<NationalId> {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '.' && *c != '-')
            .collect();
        if cleaned.len() <= 1 {
            return None;
        }

        // Split on the last character, not the last byte: the check
        // character may be multibyte in malformed input.
        let check = cleaned.chars().next_back()?;
        let body = &cleaned[..cleaned.len() - check.len_utf8()];
        let number: u64 = body.parse().ok()?;
        let check_digit = check.to_ascii_uppercase();

        Some(NationalId {
            number,
            check_digit,
        })
    }

    /// True iff the check character matches the computed one
    pub fn is_valid(&self) -> bool {
        validate(self.number, self.check_digit)
    }

    /// Render without the hyphen, for stores that keep identifiers that way
    pub fn format_compact(&self) -> String {
        format!("{}{}", self.number, self.check_digit)
    }
}

impl fmt::Display for NationalId {
    /// Strict `number-check` form
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.number, self.check_digit)
    }
}

/// Validate a raw identifier string end to end.
///
/// Convenience wrapper over [`NationalId::normalize`]; malformed input is
/// reported as `false`, never as an error.
pub fn validate_raw(raw: &str) -> bool {
    NationalId::normalize(raw).is_some_and(|id| id.is_valid())
}
