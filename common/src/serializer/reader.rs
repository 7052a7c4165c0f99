use std::array::TryFromSliceError;

use thiserror::Error;

use crate::crypto::{Hash, HASH_SIZE};

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("not enough bytes left to read: requested {requested}, remaining {remaining}")]
    NotEnoughBytes { requested: usize, remaining: usize },

    #[error("invalid size prefix: {0}")]
    InvalidSize(usize),

    #[error("invalid value encountered while deserializing")]
    InvalidValue,

    #[error("invalid hex string")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid UTF-8 string")]
    InvalidString(#[from] std::string::FromUtf8Error),

    #[error("error converting bytes to fixed-size array")]
    ErrorTryInto(#[from] TryFromSliceError),
}

// Reader over a byte slice with a moving cursor.
// Counterpart of Writer, all integers are big-endian.
pub struct Reader<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, total: 0 }
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], ReaderError> {
        if count > self.size() {
            return Err(ReaderError::NotEnoughBytes {
                requested: count,
                remaining: self.size(),
            });
        }
        let bytes = &self.bytes[self.total..self.total + count];
        self.total += count;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReaderError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ReaderError> {
        Ok(u16::from_be_bytes(self.take(2)?.try_into()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReaderError> {
        Ok(u32::from_be_bytes(self.take(4)?.try_into()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReaderError> {
        Ok(u64::from_be_bytes(self.take(8)?.try_into()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, ReaderError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, ReaderError> {
        Ok(self.take(count)?.to_vec())
    }

    pub fn read_bytes_ref(&mut self, count: usize) -> Result<&'a [u8], ReaderError> {
        self.take(count)
    }

    pub fn read_bytes_32(&mut self) -> Result<[u8; 32], ReaderError> {
        Ok(self.take(32)?.try_into()?)
    }

    pub fn read_hash(&mut self) -> Result<Hash, ReaderError> {
        let bytes: [u8; HASH_SIZE] = self.take(HASH_SIZE)?.try_into()?;
        Ok(Hash::new(bytes))
    }

    pub fn read_string(&mut self) -> Result<String, ReaderError> {
        let len = self.read_u8()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes)?)
    }

    // Remaining unread bytes
    pub fn size(&self) -> usize {
        self.bytes.len() - self.total
    }

    pub fn total_size(&self) -> usize {
        self.bytes.len()
    }

    pub fn total_read(&self) -> usize {
        self.total
    }
}
