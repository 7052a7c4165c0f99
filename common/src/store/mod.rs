use std::collections::BTreeMap;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    account::Account,
    config::{STAKE_HEIGHT_LIST_KEY, VALIDATOR_POOL_KEY},
    crypto::{hash, Address, Hash},
    serializer::{Reader, ReaderError, Serializer, Writer},
    validator::ValidatorCandidatePool,
};

/// Append-only list of heights at which stake transactions occurred.
/// Genesis appends exactly one entry.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct HeightList {
    heights: Vec<u64>,
}

impl HeightList {
    pub fn append(&mut self, height: u64) {
        self.heights.push(height);
    }

    pub fn heights(&self) -> &[u64] {
        &self.heights
    }
}

impl Serializer for HeightList {
    fn write(&self, writer: &mut Writer) {
        self.heights.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let heights = Vec::read(reader)?;
        Ok(HeightList { heights })
    }

    fn size(&self) -> usize {
        self.heights.size()
    }
}

/// In-memory view over the canonical ledger state at one height.
///
/// Entries live in a `BTreeMap`, so traversal order is the lexicographic
/// key order, a pure function of the contents independent of insertion
/// order. Account records are keyed by their raw address bytes; the
/// validator pool and the stake height list live under reserved
/// single-byte keys.
#[derive(Clone, Debug)]
pub struct StoreView {
    height: u64,
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl StoreView {
    pub fn new(height: u64) -> Self {
        StoreView {
            height,
            entries: BTreeMap::new(),
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_account(&self, address: &Address) -> Result<Option<Account>, ReaderError> {
        self.entries
            .get(address.as_bytes().as_slice())
            .map(|bytes| Account::from_bytes(bytes))
            .transpose()
    }

    pub fn set_account(&mut self, account: &Account) {
        trace!("set account {}", account.address);
        self.entries
            .insert(account.address.as_bytes().to_vec(), account.to_bytes());
    }

    pub fn get_validator_pool(&self) -> Result<Option<ValidatorCandidatePool>, ReaderError> {
        self.entries
            .get(VALIDATOR_POOL_KEY.as_slice())
            .map(|bytes| ValidatorCandidatePool::from_bytes(bytes))
            .transpose()
    }

    pub fn set_validator_pool(&mut self, pool: &ValidatorCandidatePool) {
        trace!("set validator candidate pool ({} candidates)", pool.len());
        self.entries
            .insert(VALIDATOR_POOL_KEY.to_vec(), pool.to_bytes());
    }

    pub fn set_stake_height_list(&mut self, list: &HeightList) {
        trace!("set stake height list ({} entries)", list.heights().len());
        self.entries
            .insert(STAKE_HEIGHT_LIST_KEY.to_vec(), list.to_bytes());
    }

    /// Raw insertion, used when replaying a snapshot file back into a view.
    pub fn insert_raw(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    /// Deterministic traversal over every entry in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Content hash of the view: blake3 over the per-entry key and value
    /// hashes in traversal order. Any change to any entry changes the
    /// result; insertion order cannot.
    pub fn root_hash(&self) -> Hash {
        let mut hasher = blake3::Hasher::new();
        for (key, value) in self.iter() {
            hasher.update(hash(key).as_bytes());
            hasher.update(hash(value).as_bytes());
        }
        Hash::new(hasher.finalize().into())
    }
}
