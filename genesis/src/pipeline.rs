use std::{fs::File, path::Path};

use log::info;

use meridian_common::{
    config::GENESIS_HEIGHT,
    snapshot::SnapshotMetadata,
    store::StoreView,
    time::{get_current_time_in_seconds, TimestampSeconds},
    validator::TopStakeSelector,
};

use crate::{
    anchor, audit, balance,
    error::GenesisError,
    input::{BalanceMap, StakeDeclaration},
    snapshot::SnapshotWriter,
    stake,
};

/// Run the full construction pipeline over already-loaded declarations:
/// ingest balances, apply stake deposits, anchor the finalized state, and
/// audit it. The phases are strictly sequential, and the store is never
/// mutated after the anchor is built.
pub fn generate(
    chain_id: &str,
    balances: &BalanceMap,
    declarations: &[StakeDeclaration],
) -> Result<(SnapshotMetadata, StoreView), GenesisError> {
    generate_with_timestamp(
        chain_id,
        balances,
        declarations,
        get_current_time_in_seconds(),
    )
}

/// Same pipeline with an explicit block timestamp, the only
/// wall-clock-derived field. Two calls over identical inputs and the same
/// timestamp produce byte-identical snapshots.
pub fn generate_with_timestamp(
    chain_id: &str,
    balances: &BalanceMap,
    declarations: &[StakeDeclaration],
    timestamp: TimestampSeconds,
) -> Result<(SnapshotMetadata, StoreView), GenesisError> {
    let mut sv = StoreView::new(GENESIS_HEIGHT);

    balance::ingest_balances(&mut sv, balances)?;
    let vcp = stake::apply_stake_deposits(&mut sv, declarations)?;
    let metadata = anchor::build_anchor(chain_id, &sv, &vcp, &TopStakeSelector, timestamp);

    audit::run(&sv)?;

    Ok((metadata, sv))
}

/// Serialize the anchor and the full state to the snapshot file. The file
/// is created from scratch; a failed write leaves it invalid as a whole.
pub fn write_snapshot_file<P: AsRef<Path>>(
    path: P,
    metadata: &SnapshotMetadata,
    sv: &StoreView,
) -> Result<(), GenesisError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = SnapshotWriter::new(file);
    writer.write_metadata(metadata)?;
    writer.write_store(sv)?;

    info!(
        "genesis snapshot written to {} ({} state records)",
        path.display(),
        sv.len()
    );
    Ok(())
}
