use serde::{Deserialize, Serialize};

use crate::{
    crypto::{Address, Hash, Signature},
    serializer::{Reader, ReaderError, Serializer, Writer},
};

/// A validator's assertion of agreement on one block.
///
/// Votes produced during genesis construction carry no signature: no
/// validator process exists yet, and trust in the snapshot is established
/// out-of-band by operators comparing file hashes.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Vote {
    pub block: Hash,
    pub height: u64,
    pub voter: Address,
    pub epoch: u64,
    pub signature: Option<Signature>,
}

impl Vote {
    pub fn unsigned(block: Hash, height: u64, voter: Address, epoch: u64) -> Self {
        Vote {
            block,
            height,
            voter,
            epoch,
            signature: None,
        }
    }
}

impl Serializer for Vote {
    fn write(&self, writer: &mut Writer) {
        writer.write_hash(&self.block);
        writer.write_u64(&self.height);
        self.voter.write(writer);
        writer.write_u64(&self.epoch);
        self.signature.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let block = reader.read_hash()?;
        let height = reader.read_u64()?;
        let voter = Address::read(reader)?;
        let epoch = reader.read_u64()?;
        let signature = Option::read(reader)?;
        Ok(Vote {
            block,
            height,
            voter,
            epoch,
            signature,
        })
    }

    fn size(&self) -> usize {
        self.block.size() + 8 + self.voter.size() + 8 + self.signature.size()
    }
}

/// Block hash plus the votes certifying it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CommitCertificate {
    pub block_hash: Hash,
    pub votes: Vec<Vote>,
}

impl CommitCertificate {
    pub fn new(block_hash: Hash, votes: Vec<Vote>) -> Self {
        CommitCertificate { block_hash, votes }
    }
}

impl Serializer for CommitCertificate {
    fn write(&self, writer: &mut Writer) {
        writer.write_hash(&self.block_hash);
        self.votes.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let block_hash = reader.read_hash()?;
        let votes = Vec::read(reader)?;
        Ok(CommitCertificate { block_hash, votes })
    }

    fn size(&self) -> usize {
        self.block_hash.size() + self.votes.size()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::crypto::hash;

    #[test]
    fn test_unsigned_vote_roundtrip() {
        let voter = Address::from_str("0x2e833968e5bb786ae419c4d13189fb081cc43bab").unwrap();
        let vote = Vote::unsigned(hash(b"block"), 1, voter, 0);
        assert!(vote.signature.is_none());

        let decoded = Vote::from_bytes(&vote.to_bytes()).unwrap();
        assert_eq!(decoded, vote);
    }

    #[test]
    fn test_certificate_roundtrip() {
        let voter = Address::from_str("0x2e833968e5bb786ae419c4d13189fb081cc43bab").unwrap();
        let block = hash(b"block");
        let cert = CommitCertificate::new(
            block.clone(),
            vec![Vote::unsigned(block, 1, voter, 0)],
        );

        let decoded = CommitCertificate::from_bytes(&cert.to_bytes()).unwrap();
        assert_eq!(decoded, cert);
    }
}
