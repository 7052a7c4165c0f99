use serde::{Deserialize, Serialize};

use crate::{
    block::{BlockHeader, CommitCertificate},
    serializer::{Reader, ReaderError, Serializer, Writer},
};

// Sentinel record keys framing the state section of a snapshot file.
// Their values carry the store height as 8 little-endian bytes.
pub const SNAPSHOT_START_MARKER: u8 = 0xF0;
pub const SNAPSHOT_END_MARKER: u8 = 0xF1;

/// One snapshot file record: a raw state-store entry, or a Start/End
/// sentinel.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SnapshotRecord {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl SnapshotRecord {
    pub fn new(key: Vec<u8>, value: Vec<u8>) -> Self {
        SnapshotRecord { key, value }
    }

    pub fn start_marker(height: u64) -> Self {
        SnapshotRecord::new(vec![SNAPSHOT_START_MARKER], height.to_le_bytes().to_vec())
    }

    pub fn end_marker(height: u64) -> Self {
        SnapshotRecord::new(vec![SNAPSHOT_END_MARKER], height.to_le_bytes().to_vec())
    }

    pub fn is_start_marker(&self) -> bool {
        self.key.as_slice() == [SNAPSHOT_START_MARKER]
    }

    pub fn is_end_marker(&self) -> bool {
        self.key.as_slice() == [SNAPSHOT_END_MARKER]
    }

    /// Height carried by a sentinel record, if this is one of valid shape.
    pub fn marker_height(&self) -> Option<u64> {
        if !self.is_start_marker() && !self.is_end_marker() {
            return None;
        }
        let bytes: [u8; 8] = self.value.as_slice().try_into().ok()?;
        Some(u64::from_le_bytes(bytes))
    }
}

impl Serializer for SnapshotRecord {
    fn write(&self, writer: &mut Writer) {
        assert!(
            self.key.len() <= u16::MAX as usize,
            "record key of {} bytes exceeds the two-byte length prefix",
            self.key.len()
        );
        assert!(
            self.value.len() <= u32::MAX as usize,
            "record value of {} bytes exceeds the four-byte length prefix",
            self.value.len()
        );
        writer.write_u16(self.key.len() as u16);
        writer.write_bytes(&self.key);
        writer.write_u32(&(self.value.len() as u32));
        writer.write_bytes(&self.value);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let key_len = reader.read_u16()? as usize;
        let key = reader.read_bytes(key_len)?;
        let value_len = reader.read_u32()? as usize;
        let value = reader.read_bytes(value_len)?;
        Ok(SnapshotRecord { key, value })
    }

    fn size(&self) -> usize {
        2 + self.key.len() + 4 + self.value.len()
    }
}

/// The third block of a trio together with its commit certificate. Only
/// the header and the certifying votes are ever captured; the block
/// itself is never persisted.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SnapshotBlock {
    pub header: BlockHeader,
    pub cert: CommitCertificate,
}

impl Serializer for SnapshotBlock {
    fn write(&self, writer: &mut Writer) {
        self.header.write(writer);
        self.cert.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let header = BlockHeader::read(reader)?;
        let cert = CommitCertificate::read(reader)?;
        Ok(SnapshotBlock { header, cert })
    }

    fn size(&self) -> usize {
        self.header.size() + self.cert.size()
    }
}

/// Three chained synthetic headers anchoring a snapshot to its state.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlockTrio {
    pub first: BlockHeader,
    pub second: BlockHeader,
    pub third: SnapshotBlock,
}

impl Serializer for BlockTrio {
    fn write(&self, writer: &mut Writer) {
        self.first.write(writer);
        self.second.write(writer);
        self.third.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let first = BlockHeader::read(reader)?;
        let second = BlockHeader::read(reader)?;
        let third = SnapshotBlock::read(reader)?;
        Ok(BlockTrio {
            first,
            second,
            third,
        })
    }

    fn size(&self) -> usize {
        self.first.size() + self.second.size() + self.third.size()
    }
}

/// Anchor metadata written as the first record of every snapshot file.
/// Genesis construction produces exactly one trio.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub trios: Vec<BlockTrio>,
}

impl SnapshotMetadata {
    pub fn new(trio: BlockTrio) -> Self {
        SnapshotMetadata { trios: vec![trio] }
    }
}

impl Serializer for SnapshotMetadata {
    fn write(&self, writer: &mut Writer) {
        self.trios.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let trios = Vec::read(reader)?;
        Ok(SnapshotMetadata { trios })
    }

    fn size(&self) -> usize {
        self.trios.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip() {
        let record = SnapshotRecord::new(vec![1, 2, 3], vec![4; 300]);
        let bytes = record.to_bytes();
        assert_eq!(bytes.len(), record.size());
        assert_eq!(SnapshotRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_marker_height() {
        let start = SnapshotRecord::start_marker(7);
        assert!(start.is_start_marker());
        assert!(!start.is_end_marker());
        assert_eq!(start.marker_height(), Some(7));

        let end = SnapshotRecord::end_marker(7);
        assert!(end.is_end_marker());
        assert_eq!(end.marker_height(), Some(7));

        let plain = SnapshotRecord::new(vec![0xAB; 20], vec![1]);
        assert_eq!(plain.marker_height(), None);
    }

    #[test]
    fn test_marker_keys_cannot_collide_with_store_keys() {
        use crate::config::{STAKE_HEIGHT_LIST_KEY, VALIDATOR_POOL_KEY};

        assert_ne!([SNAPSHOT_START_MARKER], VALIDATOR_POOL_KEY);
        assert_ne!([SNAPSHOT_START_MARKER], STAKE_HEIGHT_LIST_KEY);
        assert_ne!([SNAPSHOT_END_MARKER], VALIDATOR_POOL_KEY);
        assert_ne!([SNAPSHOT_END_MARKER], STAKE_HEIGHT_LIST_KEY);
    }
}
