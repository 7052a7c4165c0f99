use log::{debug, info};

use meridian_common::{
    block::{BlockHeader, CommitCertificate, Vote},
    config::{GENESIS_EPOCH, GENESIS_HEIGHT},
    crypto::{Hash, Hashable},
    snapshot::{BlockTrio, SnapshotBlock, SnapshotMetadata},
    store::StoreView,
    time::TimestampSeconds,
    validator::{ValidatorCandidatePool, ValidatorSelector},
};

use crate::error::IntegrityError;

/// Build the bootstrap anchor over the finalized state.
///
/// The state content hash is derived here, exactly once: every mutation
/// of the store must be complete before this call, and nothing may touch
/// the store afterwards, or the anchor no longer describes the state it
/// is shipped with.
pub fn build_anchor(
    chain_id: &str,
    sv: &StoreView,
    vcp: &ValidatorCandidatePool,
    selector: &dyn ValidatorSelector,
    timestamp: TimestampSeconds,
) -> SnapshotMetadata {
    let state_hash = sv.root_hash();
    info!("genesis state hash: {}", state_hash);

    let first = BlockHeader::new(
        chain_id,
        GENESIS_HEIGHT,
        GENESIS_EPOCH,
        Hash::zero(),
        state_hash.clone(),
        timestamp,
    );
    let second = BlockHeader::new(
        chain_id,
        GENESIS_HEIGHT + 1,
        GENESIS_EPOCH,
        first.hash(),
        state_hash.clone(),
        timestamp,
    );
    let second_hash = second.hash();
    let third = BlockHeader::new(
        chain_id,
        GENESIS_HEIGHT + 2,
        GENESIS_EPOCH,
        second_hash.clone(),
        state_hash,
        timestamp,
    );

    let validators = selector.select(vcp);
    let votes: Vec<Vote> = validators
        .validators()
        .iter()
        .map(|validator| {
            debug!(
                "genesis validator {}: power = {}",
                validator.address, validator.power
            );
            Vote::unsigned(
                second_hash.clone(),
                second.height,
                validator.address,
                GENESIS_EPOCH,
            )
        })
        .collect();
    info!(
        "selected {} validators for the genesis commit certificate",
        votes.len()
    );

    let cert = CommitCertificate::new(second_hash, votes);
    SnapshotMetadata::new(BlockTrio {
        first,
        second,
        third: SnapshotBlock {
            header: third,
            cert,
        },
    })
}

/// Check the anchor against a replayed state hash: exactly one trio, an
/// unbroken parent chain, one state hash shared by all three headers and
/// equal to the replayed one, and a certificate that references the
/// second block.
pub fn verify_anchor(
    metadata: &SnapshotMetadata,
    computed_state_hash: &Hash,
) -> Result<(), IntegrityError> {
    if metadata.trios.len() != 1 {
        return Err(IntegrityError::UnexpectedTrioCount(metadata.trios.len()));
    }
    let trio = &metadata.trios[0];

    if trio.first.parent != Hash::zero() {
        return Err(IntegrityError::BrokenChain(
            "first block parent is not the zero hash",
        ));
    }
    if trio.second.parent != trio.first.hash() {
        return Err(IntegrityError::BrokenChain(
            "second block parent does not equal the first block hash",
        ));
    }
    if trio.third.header.parent != trio.second.hash() {
        return Err(IntegrityError::BrokenChain(
            "third block parent does not equal the second block hash",
        ));
    }
    if trio.second.state_hash != trio.first.state_hash
        || trio.third.header.state_hash != trio.first.state_hash
    {
        return Err(IntegrityError::BrokenChain(
            "blocks do not share one state hash",
        ));
    }
    if trio.third.cert.block_hash != trio.second.hash() {
        return Err(IntegrityError::BrokenChain(
            "commit certificate does not reference the second block hash",
        ));
    }

    if &trio.first.state_hash != computed_state_hash {
        return Err(IntegrityError::StateHashMismatch {
            expected: trio.first.state_hash.clone(),
            calculated: computed_state_hash.clone(),
        });
    }

    Ok(())
}
