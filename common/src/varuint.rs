use std::{
    fmt::{Debug, Display, Error, Formatter},
    str::FromStr,
};

use primitive_types::U256;
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Unsigned 256-bit token amount with a compact canonical wire form:
/// one length byte followed by only the significant big-endian bytes.
/// The encoding is canonical: a leading zero byte in the payload is
/// rejected on read, so equal values have exactly one byte form.
///
/// JSON form is a decimal string, matching the declaration files.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarUint(U256);

impl VarUint {
    pub const fn zero() -> Self {
        VarUint(U256::zero())
    }

    pub fn one() -> Self {
        VarUint(U256::one())
    }

    pub fn from_u64(value: u64) -> Self {
        VarUint(U256::from(value))
    }

    pub fn from_dec_str(value: &str) -> Result<Self, &'static str> {
        U256::from_dec_str(value)
            .map(VarUint)
            .map_err(|_| "Invalid decimal string")
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn checked_add(&self, other: VarUint) -> Option<VarUint> {
        self.0.checked_add(other.0).map(VarUint)
    }

    pub fn checked_sub(&self, other: VarUint) -> Option<VarUint> {
        self.0.checked_sub(other.0).map(VarUint)
    }

    pub fn checked_mul(&self, other: VarUint) -> Option<VarUint> {
        self.0.checked_mul(other.0).map(VarUint)
    }

    pub fn saturating_add(&self, other: VarUint) -> VarUint {
        VarUint(self.0.saturating_add(other.0))
    }

    // Number of significant bytes in big-endian form (0 for zero)
    fn significant_bytes(&self) -> usize {
        32 - self.0.leading_zeros() as usize / 8
    }
}

impl From<U256> for VarUint {
    fn from(value: U256) -> Self {
        VarUint(value)
    }
}

impl From<u64> for VarUint {
    fn from(value: u64) -> Self {
        VarUint::from_u64(value)
    }
}

impl FromStr for VarUint {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VarUint::from_dec_str(s)
    }
}

impl Serializer for VarUint {
    fn write(&self, writer: &mut Writer) {
        let bytes = self.0.to_big_endian();
        let len = self.significant_bytes();
        writer.write_u8(len as u8);
        writer.write_bytes(&bytes[32 - len..]);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let len = reader.read_u8()? as usize;
        if len > 32 {
            return Err(ReaderError::InvalidSize(len));
        }
        let bytes = reader.read_bytes_ref(len)?;
        if len > 0 && bytes[0] == 0 {
            return Err(ReaderError::InvalidValue);
        }
        Ok(VarUint(U256::from_big_endian(bytes)))
    }

    fn size(&self) -> usize {
        1 + self.significant_bytes()
    }
}

impl Display for VarUint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.0)
    }
}

impl Debug for VarUint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "VarUint({})", self.0)
    }
}

impl Serialize for VarUint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'a> Deserialize<'a> for VarUint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let value = String::deserialize(deserializer)?;
        VarUint::from_dec_str(&value).map_err(SerdeError::custom)
    }
}
