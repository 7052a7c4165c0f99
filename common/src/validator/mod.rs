use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::MAX_NUM_VALIDATORS,
    crypto::Address,
    serializer::{Reader, ReaderError, Serializer, Writer},
    varuint::VarUint,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StakeError {
    #[error("stake amount must be greater than zero")]
    ZeroAmount,

    #[error("stake amount overflow for holder {0}")]
    Overflow(Address),
}

/// One stake entry: an amount attributed to the source account that
/// deposited it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Stake {
    pub source: Address,
    pub amount: VarUint,
}

impl Serializer for Stake {
    fn write(&self, writer: &mut Writer) {
        self.source.write(writer);
        self.amount.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let source = Address::read(reader)?;
        let amount = VarUint::read(reader)?;
        Ok(Stake { source, amount })
    }

    fn size(&self) -> usize {
        self.source.size() + self.amount.size()
    }
}

/// A prospective validator (holder) and the stakes deposited under it,
/// kept in deposit order.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ValidatorCandidate {
    pub holder: Address,
    pub stakes: Vec<Stake>,
}

impl ValidatorCandidate {
    pub fn total_stake(&self) -> VarUint {
        self.stakes
            .iter()
            .fold(VarUint::zero(), |total, stake| {
                total.saturating_add(stake.amount)
            })
    }
}

impl Serializer for ValidatorCandidate {
    fn write(&self, writer: &mut Writer) {
        self.holder.write(writer);
        self.stakes.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let holder = Address::read(reader)?;
        let stakes = Vec::read(reader)?;
        Ok(ValidatorCandidate { holder, stakes })
    }

    fn size(&self) -> usize {
        self.holder.size() + self.stakes.size()
    }
}

/// Aggregate of all validator candidates, ordered by total stake
/// (descending, holder address as the tie break) so traversal and
/// selection are deterministic.
///
/// The only mutation path is `deposit_stake`: a repeat (source, holder)
/// pair merges into the existing stake entry instead of growing the list.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct ValidatorCandidatePool {
    candidates: Vec<ValidatorCandidate>,
}

impl ValidatorCandidatePool {
    pub fn candidates(&self) -> &[ValidatorCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn deposit_stake(
        &mut self,
        source: Address,
        holder: Address,
        amount: VarUint,
    ) -> Result<(), StakeError> {
        if amount.is_zero() {
            return Err(StakeError::ZeroAmount);
        }

        match self.candidates.iter_mut().find(|c| c.holder == holder) {
            Some(candidate) => {
                match candidate.stakes.iter_mut().find(|s| s.source == source) {
                    Some(stake) => {
                        stake.amount = stake
                            .amount
                            .checked_add(amount)
                            .ok_or(StakeError::Overflow(holder))?;
                    }
                    None => candidate.stakes.push(Stake { source, amount }),
                }
            }
            None => self.candidates.push(ValidatorCandidate {
                holder,
                stakes: vec![Stake { source, amount }],
            }),
        }

        self.candidates.sort_by(|a, b| {
            b.total_stake()
                .cmp(&a.total_stake())
                .then_with(|| a.holder.cmp(&b.holder))
        });

        debug!(
            "deposited {} MeriWei from {} under holder {}",
            amount, source, holder
        );
        Ok(())
    }
}

impl Serializer for ValidatorCandidatePool {
    fn write(&self, writer: &mut Writer) {
        self.candidates.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let candidates = Vec::read(reader)?;
        Ok(ValidatorCandidatePool { candidates })
    }

    fn size(&self) -> usize {
        self.candidates.size()
    }
}

/// A selected validator with its voting power.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Validator {
    pub address: Address,
    pub power: VarUint,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct ValidatorSet {
    validators: Vec<Validator>,
}

impl ValidatorSet {
    pub fn new(validators: Vec<Validator>) -> Self {
        ValidatorSet { validators }
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Strategy seam for picking the initial validator set out of the
/// candidate pool.
pub trait ValidatorSelector {
    fn select(&self, pool: &ValidatorCandidatePool) -> ValidatorSet;
}

/// Default selection: the highest-staked candidates, bounded by
/// `MAX_NUM_VALIDATORS`. The pool is already sorted, so this is a prefix
/// scan; candidates without stake never validate.
pub struct TopStakeSelector;

impl ValidatorSelector for TopStakeSelector {
    fn select(&self, pool: &ValidatorCandidatePool) -> ValidatorSet {
        let validators = pool
            .candidates()
            .iter()
            .filter(|candidate| !candidate.total_stake().is_zero())
            .take(MAX_NUM_VALIDATORS)
            .map(|candidate| Validator {
                address: candidate.holder,
                power: candidate.total_stake(),
            })
            .collect();
        ValidatorSet::new(validators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[test]
    fn test_deposit_zero_rejected() {
        let mut pool = ValidatorCandidatePool::default();
        assert_eq!(
            pool.deposit_stake(addr(1), addr(2), VarUint::zero()),
            Err(StakeError::ZeroAmount)
        );
        assert!(pool.is_empty());
    }

    #[test]
    fn test_deposit_merges_repeat_pair() {
        let mut pool = ValidatorCandidatePool::default();
        pool.deposit_stake(addr(1), addr(2), VarUint::from_u64(100))
            .unwrap();
        pool.deposit_stake(addr(1), addr(2), VarUint::from_u64(50))
            .unwrap();

        assert_eq!(pool.len(), 1);
        let candidate = &pool.candidates()[0];
        assert_eq!(candidate.stakes.len(), 1);
        assert_eq!(candidate.total_stake(), VarUint::from_u64(150));
    }

    #[test]
    fn test_candidates_ordered_by_total_stake() {
        let mut pool = ValidatorCandidatePool::default();
        pool.deposit_stake(addr(1), addr(10), VarUint::from_u64(100))
            .unwrap();
        pool.deposit_stake(addr(1), addr(11), VarUint::from_u64(300))
            .unwrap();
        pool.deposit_stake(addr(2), addr(10), VarUint::from_u64(100))
            .unwrap();

        let holders: Vec<Address> = pool.candidates().iter().map(|c| c.holder).collect();
        assert_eq!(holders, vec![addr(11), addr(10)]);

        // equal totals fall back to holder address order
        pool.deposit_stake(addr(3), addr(12), VarUint::from_u64(200))
            .unwrap();
        pool.deposit_stake(addr(4), addr(13), VarUint::from_u64(200))
            .unwrap();
        let holders: Vec<Address> = pool.candidates().iter().map(|c| c.holder).collect();
        assert_eq!(holders, vec![addr(11), addr(10), addr(12), addr(13)]);
    }

    #[test]
    fn test_selection_bounded_and_ordered() {
        let mut pool = ValidatorCandidatePool::default();
        for i in 0..40u8 {
            pool.deposit_stake(addr(200), addr(i), VarUint::from_u64(1000 + i as u64))
                .unwrap();
        }

        let set = TopStakeSelector.select(&pool);
        assert_eq!(set.len(), MAX_NUM_VALIDATORS);
        // highest total first
        assert_eq!(set.validators()[0].address, addr(39));
        assert_eq!(set.validators()[0].power, VarUint::from_u64(1039));
    }

    #[test]
    fn test_pool_roundtrip() {
        let mut pool = ValidatorCandidatePool::default();
        pool.deposit_stake(addr(1), addr(2), VarUint::from_u64(400))
            .unwrap();
        pool.deposit_stake(addr(3), addr(2), VarUint::from_u64(100))
            .unwrap();

        let decoded = ValidatorCandidatePool::from_bytes(&pool.to_bytes()).unwrap();
        assert_eq!(decoded, pool);
    }
}
