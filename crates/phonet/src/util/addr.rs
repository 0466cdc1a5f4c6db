//! Phonet address parsing and formatting.

use std::fmt;
use std::str::FromStr;

use crate::netlink::{Error, Result};

/// A Phonet device address.
///
/// Addresses are one byte wide; the two low bits select an object within
/// the device and must be zero when configuring addresses and routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhonetAddr(u8);

impl PhonetAddr {
    /// Mask of the bits that must be clear.
    pub const OBJECT_MASK: u8 = 0x03;

    /// Wrap `value`, rejecting it if the low two bits are set.
    pub fn new(value: u8) -> Result<Self> {
        Self::check(&format!("{:#04x}", value), u32::from(value))
    }

    /// Wrap a byte decoded from the kernel without checking it.
    pub fn from_kernel(value: u8) -> Self {
        Self(value)
    }

    /// The raw byte.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Parse a hexadecimal address with an optional `0x` prefix.
    pub fn parse_hex(s: &str) -> Result<Self> {
        let digits = strip_hex_prefix(s).unwrap_or(s);
        if digits.is_empty() || digits.len() > 2 {
            return Err(invalid(s, "expected one hexadecimal byte"));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| invalid(s, "not a hexadecimal number"))?;
        Self::check(s, value)
    }

    /// Parse an address in C notation: decimal, `0x` hexadecimal or
    /// leading-zero octal.
    pub fn parse_auto(s: &str) -> Result<Self> {
        let (digits, radix) = if let Some(hex) = strip_hex_prefix(s) {
            (hex, 16)
        } else if s.len() > 1 && s.starts_with('0') {
            (&s[1..], 8)
        } else {
            (s, 10)
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(invalid(s, "not a number"));
        }
        let value = u32::from_str_radix(digits, radix).map_err(|_| invalid(s, "out of range"))?;
        Self::check(s, value)
    }

    fn check(input: &str, value: u32) -> Result<Self> {
        let byte = u8::try_from(value).map_err(|_| invalid(input, "must be below 256"))?;
        if byte & Self::OBJECT_MASK != 0 {
            return Err(invalid(input, "low two bits must be zero"));
        }
        Ok(Self(byte))
    }
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

fn invalid(input: &str, reason: &'static str) -> Error {
    Error::InvalidAddress {
        input: input.to_string(),
        reason,
    }
}

impl FromStr for PhonetAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_hex(s)
    }
}

impl From<PhonetAddr> for u8 {
    fn from(addr: PhonetAddr) -> u8 {
        addr.0
    }
}

impl fmt::Display for PhonetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

impl fmt::LowerHex for PhonetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for PhonetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
