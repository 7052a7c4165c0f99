use std::fmt::{Display, Error as FmtError, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
    crypto::{Hash, Hashable, HASH_SIZE},
    serializer::{Reader, ReaderError, Serializer, Writer},
    time::TimestampSeconds,
};

/// Synthetic bootstrap block header.
///
/// Genesis headers are never persisted individually; they only exist
/// embedded in the snapshot anchor. Identity is the blake3 hash of the
/// canonical serialization, so two headers differing in any field
/// (including the wall-clock timestamp) have different hashes.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlockHeader {
    pub chain_id: String,
    pub height: u64,
    pub epoch: u64,
    pub parent: Hash,
    pub state_hash: Hash,
    pub timestamp: TimestampSeconds,
}

impl BlockHeader {
    pub fn new(
        chain_id: &str,
        height: u64,
        epoch: u64,
        parent: Hash,
        state_hash: Hash,
        timestamp: TimestampSeconds,
    ) -> Self {
        Self {
            chain_id: chain_id.to_owned(),
            height,
            epoch,
            parent,
            state_hash,
            timestamp,
        }
    }
}

impl Serializer for BlockHeader {
    fn write(&self, writer: &mut Writer) {
        writer.write_string(&self.chain_id);
        writer.write_u64(&self.height);
        writer.write_u64(&self.epoch);
        writer.write_hash(&self.parent);
        writer.write_hash(&self.state_hash);
        writer.write_u64(&self.timestamp);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let chain_id = reader.read_string()?;
        let height = reader.read_u64()?;
        let epoch = reader.read_u64()?;
        let parent = reader.read_hash()?;
        let state_hash = reader.read_hash()?;
        let timestamp = reader.read_u64()?;
        Ok(BlockHeader {
            chain_id,
            height,
            epoch,
            parent,
            state_hash,
            timestamp,
        })
    }

    fn size(&self) -> usize {
        1 + self.chain_id.len() // chain_id
            + 8 // height
            + 8 // epoch
            + HASH_SIZE * 2 // parent + state_hash
            + 8 // timestamp
    }
}

impl Hashable for BlockHeader {}

impl Display for BlockHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "BlockHeader[chain_id: {}, height: {}, epoch: {}, parent: {}, state_hash: {}, timestamp: {}]",
            self.chain_id, self.height, self.epoch, self.parent, self.state_hash, self.timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash;

    #[test]
    fn test_header_roundtrip() {
        let header = BlockHeader::new(
            "local_chain",
            0,
            0,
            Hash::zero(),
            hash(b"state"),
            1234567890,
        );

        let serialized = header.to_bytes();
        assert!(serialized.len() == header.size());

        let deserialized = BlockHeader::from_bytes(&serialized).unwrap();
        assert!(header.hash() == deserialized.hash());
        assert_eq!(header, deserialized);
    }

    #[test]
    fn test_hash_covers_every_field() {
        let base = BlockHeader::new("local_chain", 1, 0, Hash::zero(), hash(b"state"), 100);

        let mut other = base.clone();
        other.height = 2;
        assert_ne!(base.hash(), other.hash());

        let mut other = base.clone();
        other.timestamp = 101;
        assert_ne!(base.hash(), other.hash());

        let mut other = base.clone();
        other.chain_id = String::from("other_chain");
        assert_ne!(base.hash(), other.hash());
    }
}
