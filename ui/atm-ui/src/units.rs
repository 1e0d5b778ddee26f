//! Conversion between base units (wei) and display units (ether).

use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::U256;

use crate::error::AtmError;

pub const DECIMALS: usize = 18;

/// Formats a base-unit amount the way ethers does: always one fractional
/// digit, trailing zeros trimmed.
pub fn format_display(value: U256) -> String {
    let raw = match format_units(value, "ether") {
        Ok(s) => s,
        // U256 always fits the ether unit; keep the raw value visible otherwise.
        Err(_) => return value.to_string(),
    };
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        format!("{int_part}.0")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// Parses a display-unit amount typed by the user.
///
/// Blank input means "cancelled" and yields `Ok(None)`.
pub fn parse_display(input: &str) -> Result<Option<U256>, AtmError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let well_formed = !(int_part.is_empty() && frac_part.is_empty())
        && int_part.chars().all(|c| c.is_ascii_digit())
        && frac_part.chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(AtmError::InvalidAmount(format!("'{trimmed}' is not a decimal amount")));
    }
    if frac_part.len() > DECIMALS {
        return Err(AtmError::InvalidAmount(format!(
            "at most {DECIMALS} decimal places are supported"
        )));
    }

    let value = match parse_units(trimmed, "ether") {
        Ok(ParseUnits::U256(value)) => value,
        Ok(ParseUnits::I256(_)) => {
            return Err(AtmError::InvalidAmount("amount must not be negative".into()))
        }
        Err(e) => return Err(AtmError::InvalidAmount(e.to_string())),
    };

    // parse_units wraps on overflow; a value that does not format back to
    // the typed digits did not fit in a uint256.
    if format_display(value) != canonical(int_part, frac_part) {
        return Err(AtmError::InvalidAmount(format!("'{trimmed}' is too large")));
    }
    Ok(Some(value))
}

/// The digits the way `format_display` would print them.
fn canonical(int_part: &str, frac_part: &str) -> String {
    let int = int_part.trim_start_matches('0');
    let frac = frac_part.trim_end_matches('0');
    format!(
        "{}.{}",
        if int.is_empty() { "0" } else { int },
        if frac.is_empty() { "0" } else { frac }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(DECIMALS))
    }

    #[test]
    fn test_format_whole_amounts() {
        assert_eq!(format_display(ether(3)), "3.0");
        assert_eq!(format_display(ether(4)), "4.0");
        assert_eq!(format_display(U256::ZERO), "0.0");
    }

    #[test]
    fn test_format_fractional_amounts() {
        assert_eq!(format_display(U256::from(1_500_000_000_000_000_000u128)), "1.5");
        assert_eq!(format_display(U256::from(1u64)), "0.000000000000000001");
    }

    #[test]
    fn test_parse_blank_is_cancel() {
        assert_eq!(parse_display("").unwrap(), None);
        assert_eq!(parse_display("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_amounts() {
        assert_eq!(parse_display("1").unwrap(), Some(ether(1)));
        assert_eq!(parse_display(" 2.5 ").unwrap(), Some(U256::from(2_500_000_000_000_000_000u128)));
        assert_eq!(parse_display(".5").unwrap(), Some(U256::from(500_000_000_000_000_000u128)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in [
            "abc",
            "-1",
            "1.2.3",
            "1e18",
            ".",
            "0.0000000000000000001",
            "115792089237316195423570985008687907853269984665640564039458",
            "115792089237316195423570985008687907853269984665640564039458.1",
        ] {
            assert!(
                matches!(parse_display(bad), Err(AtmError::InvalidAmount(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_largest_representable() {
        let max_whole = "115792089237316195423570985008687907853269984665640564039457";
        let value = parse_display(max_whole).unwrap().unwrap();
        assert_eq!(format_display(value), format!("{max_whole}.0"));
        assert_eq!(parse_display("007.50").unwrap(), Some(U256::from(7_500_000_000_000_000_000u128)));
    }

    #[test]
    fn test_display_survives_conversion() {
        for s in ["3.0", "0.25", "12.000000000000000001"] {
            let base = parse_display(s).unwrap().unwrap();
            assert_eq!(format_display(base), s);
        }
    }
}
