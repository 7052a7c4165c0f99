mod reader;
mod writer;

pub use reader::{Reader, ReaderError};
pub use writer::Writer;

// Canonical binary encoding used for every persisted structure.
// The byte form produced by `write` is deterministic: two equal values
// always serialize to the same bytes, which is what makes content
// hashing over serialized records meaningful.
pub trait Serializer {
    fn write(&self, writer: &mut Writer);

    fn read(reader: &mut Reader) -> Result<Self, ReaderError>
    where
        Self: Sized;

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size());
        let mut writer = Writer::new(&mut bytes);
        self.write(&mut writer);
        bytes
    }

    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, ReaderError>
    where
        Self: Sized,
    {
        let mut reader = Reader::new(bytes);
        let value = Self::read(&mut reader)?;
        if reader.size() != 0 {
            return Err(ReaderError::InvalidSize(reader.size()));
        }
        Ok(value)
    }

    fn from_hex(hex: &str) -> Result<Self, ReaderError>
    where
        Self: Sized,
    {
        let bytes = hex::decode(hex)?;
        Self::from_bytes(&bytes)
    }

    fn size(&self) -> usize {
        self.to_bytes().len()
    }
}

impl Serializer for u64 {
    fn write(&self, writer: &mut Writer) {
        writer.write_u64(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_u64()
    }

    fn size(&self) -> usize {
        8
    }
}

impl Serializer for String {
    fn write(&self, writer: &mut Writer) {
        writer.write_string(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_string()
    }

    fn size(&self) -> usize {
        1 + self.len()
    }
}

impl<T: Serializer> Serializer for Option<T> {
    fn write(&self, writer: &mut Writer) {
        match self {
            Some(value) => {
                writer.write_bool(true);
                value.write(writer);
            }
            None => writer.write_bool(false),
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        if reader.read_bool()? {
            Ok(Some(T::read(reader)?))
        } else {
            Ok(None)
        }
    }

    fn size(&self) -> usize {
        match self {
            Some(value) => 1 + value.size(),
            None => 1,
        }
    }
}

impl<T: Serializer> Serializer for Vec<T> {
    fn write(&self, writer: &mut Writer) {
        assert!(
            self.len() <= u16::MAX as usize,
            "sequence of {} elements exceeds the canonical two-byte count prefix",
            self.len()
        );
        writer.write_u16(self.len() as u16);
        for element in self {
            element.write(writer);
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let count = reader.read_u16()? as usize;
        let mut elements = Vec::with_capacity(count.min(reader.size()));
        for _ in 0..count {
            elements.push(T::read(reader)?);
        }
        Ok(elements)
    }

    fn size(&self) -> usize {
        2 + self.iter().map(Serializer::size).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_roundtrip() {
        let some: Option<u64> = Some(42);
        let none: Option<u64> = None;

        assert_eq!(Option::<u64>::from_bytes(&some.to_bytes()).unwrap(), some);
        assert_eq!(Option::<u64>::from_bytes(&none.to_bytes()).unwrap(), none);
        assert_eq!(some.size(), 9);
        assert_eq!(none.size(), 1);
    }

    #[test]
    fn test_vec_roundtrip() {
        let values: Vec<u64> = vec![1, 2, 3, u64::MAX];
        let decoded = Vec::<u64>::from_bytes(&values.to_bytes()).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = 7u64.to_bytes();
        bytes.push(0);
        assert!(u64::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_truncated_vec_rejected() {
        let values: Vec<u64> = vec![1, 2, 3];
        let bytes = values.to_bytes();
        assert!(Vec::<u64>::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }
}
