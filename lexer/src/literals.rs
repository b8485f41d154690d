use crate::ScanError;

/// Parse a run of decimal digits and re-render it canonically (`007` -> `7`).
pub fn canonical_integer(digits: &str) -> Result<String, ScanError> {
    digits
        .parse::<i64>()
        .map(|value| value.to_string())
        .map_err(|_| ScanError::NumberOutOfRange(digits.to_string()))
}
