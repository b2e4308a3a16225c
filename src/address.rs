use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TraceError};

/// Minimum number of hex digits in the textual form of an address.
pub const MIN_HEX_WIDTH: usize = 4;

/// A single memory address in a trace.
///
/// Renders as `0x` followed by uppercase hex digits, zero-padded to at
/// least [`MIN_HEX_WIDTH`] digits. Wider values are never truncated.
///
/// In job files an address is a string, either `0x`-prefixed hex or decimal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct AddressRecord(u64);

impl AddressRecord {
    pub const fn new(value: u64) -> Self {
        AddressRecord(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Parses the trace-file form: `0x`/`0X` prefix followed by hex digits
    /// in either case. Surrounding whitespace is ignored.
    pub fn from_hex(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| {
                TraceError::Format(format!("address {:?} lacks a 0x prefix", text))
            })?;
        parse_radix(digits, 16, text)
    }
}

fn parse_radix(digits: &str, radix: u32, original: &str) -> Result<AddressRecord> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(TraceError::Format(format!(
            "address {:?} is not a base-{} number",
            original, radix
        )));
    }
    u64::from_str_radix(digits, radix)
        .map(AddressRecord)
        .map_err(|e| TraceError::Format(format!("address {:?}: {}", original, e)))
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:0width$X}", self.0, width = MIN_HEX_WIDTH)
    }
}

/// Accepts `0x`-prefixed hex or plain decimal, for CLI flags and job files.
impl FromStr for AddressRecord {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            Self::from_hex(trimmed)
        } else {
            parse_radix(trimmed, 10, s)
        }
    }
}

impl From<u64> for AddressRecord {
    fn from(value: u64) -> Self {
        AddressRecord(value)
    }
}

impl From<AddressRecord> for u64 {
    fn from(record: AddressRecord) -> Self {
        record.0
    }
}

impl TryFrom<String> for AddressRecord {
    type Error = TraceError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AddressRecord> for String {
    fn from(record: AddressRecord) -> Self {
        record.to_string()
    }
}
