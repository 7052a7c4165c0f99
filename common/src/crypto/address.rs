use std::{
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

pub const ADDRESS_SIZE: usize = 20; // 20 bytes / 160 bits

/// Fixed-width account identifier.
///
/// Addresses are rendered as `0x`-prefixed lowercase hex. Parsing accepts
/// the prefix in either case and also its absence, but always requires
/// exactly 40 hex digits.
#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Address(bytes)
    }

    pub const fn zero() -> Self {
        Address::new([0; ADDRESS_SIZE])
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_SIZE] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Syntax check used on raw declaration input before any parsing.
    pub fn is_valid_hex(value: &str) -> bool {
        let digits = strip_hex_prefix(value);
        digits.len() == ADDRESS_SIZE * 2 && digits.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = strip_hex_prefix(s);
        if digits.len() != ADDRESS_SIZE * 2 {
            return Err("Invalid address length");
        }
        let bytes = hex::decode(digits).map_err(|_| "Invalid hex string")?;
        let bytes: [u8; ADDRESS_SIZE] = bytes.try_into().map_err(|_| "Invalid address")?;
        Ok(Address::new(bytes))
    }
}

impl Serializer for Address {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let bytes: [u8; ADDRESS_SIZE] = reader.read_bytes_ref(ADDRESS_SIZE)?.try_into()?;
        Ok(Address::new(bytes))
    }

    fn size(&self) -> usize {
        ADDRESS_SIZE
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'a> Deserialize<'a> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let value = String::deserialize(deserializer)?;
        Address::from_str(&value).map_err(SerdeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_prefix() {
        let plain = "2e833968e5bb786ae419c4d13189fb081cc43bab";
        let prefixed = format!("0x{}", plain);

        let a = Address::from_str(plain).unwrap();
        let b = Address::from_str(&prefixed).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.to_string(), prefixed);
    }

    #[test]
    fn test_is_valid_hex() {
        assert!(Address::is_valid_hex(
            "0x2E833968E5bB786Ae419c4d13189fB081Cc43bab"
        ));
        assert!(Address::is_valid_hex(
            "2e833968e5bb786ae419c4d13189fb081cc43bab"
        ));
        // wrong length
        assert!(!Address::is_valid_hex("0x2e8339"));
        // non-hex digit
        assert!(!Address::is_valid_hex(
            "0x2e833968e5bb786ae419c4d13189fb081cc43bag"
        ));
        assert!(!Address::is_valid_hex(""));
    }

    #[test]
    fn test_serializer_roundtrip() {
        let address = Address::from_str("0x2e833968e5bb786ae419c4d13189fb081cc43bab").unwrap();
        let decoded = Address::from_bytes(&Serializer::to_bytes(&address)).unwrap();
        assert_eq!(address, decoded);
    }
}
