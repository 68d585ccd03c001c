//! Decoding of JSON-RPC hex quantities (`"0x3e8"`) into native integers.
//!
//! Values are first parsed as 256-bit integers so that oversized inputs are
//! detected instead of wrapping, then narrowed to `u64`.

use alloy_primitives::U256;

/// Errors produced while decoding a hex quantity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("empty hex quantity")]
    Empty,

    #[error("invalid hex quantity '{0}'")]
    Invalid(String),

    #[error("hex quantity '{0}' does not fit in 64 bits")]
    Overflow(String),
}

/// Parses a hex quantity with an optional `0x` prefix into a `u64`.
pub fn parse_quantity(raw: &str) -> Result<u64, QuantityError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(QuantityError::Empty);
    }

    let wide = U256::from_str_radix(digits, 16)
        .map_err(|_| QuantityError::Invalid(raw.to_string()))?;

    u64::try_from(wide).map_err(|_| QuantityError::Overflow(raw.to_string()))
}

/// Renders a block height as a JSON-RPC quantity.
pub fn format_quantity(value: u64) -> String {
    format!("0x{value:x}")
}
