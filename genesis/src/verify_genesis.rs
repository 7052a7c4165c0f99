//! Standalone snapshot verification.
//!
//! Replays a genesis snapshot file from scratch: decodes the anchor
//! metadata, rebuilds the state store record by record, recomputes the
//! state content hash against the anchor, validates the bootstrap chain,
//! and re-runs the conservation audit. The file carries no checksum by
//! design; this full replay is the integrity check.

use std::fs::File;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use meridian_genesis::{
    anchor, audit,
    logger::{self, LogLevel},
    snapshot::{replay_store, SnapshotReader},
};

#[derive(Parser, Clone, Debug)]
#[command(name = "verify_genesis")]
#[command(about = "Replay and verify a Meridian genesis snapshot")]
pub struct Config {
    /// Path of the genesis snapshot to verify
    #[clap(long, default_value_t = String::from("./genesis"))]
    genesis: String,

    /// Set log level
    #[clap(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Disable the usage of colors in log
    #[clap(long)]
    disable_log_color: bool,
}

fn main() {
    let config = Config::parse();
    logger::init(config.log_level, config.disable_log_color);

    if let Err(err) = run(&config) {
        error!("snapshot verification failed: {err}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    info!("verifying genesis snapshot {}", config.genesis);

    let file = File::open(&config.genesis)?;
    let mut reader = SnapshotReader::new(file);

    let metadata = reader.read_metadata()?;
    let sv = replay_store(&mut reader)?;

    let state_hash = sv.root_hash();
    anchor::verify_anchor(&metadata, &state_hash)?;
    audit::run(&sv)?;

    info!(
        "snapshot {} is valid: state hash {}, {} state records",
        config.genesis,
        state_hash,
        sv.len()
    );
    Ok(())
}
