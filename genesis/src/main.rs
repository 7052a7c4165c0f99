//! Genesis snapshot generator for the Meridian network.
//!
//! Reads the balance and stake-deposit declaration files, materializes
//! the genesis ledger state, anchors it with the bootstrap block trio,
//! audits the conservation invariants, and writes the snapshot file every
//! joining node loads to reconstruct identical initial state.
//!
//! # Usage
//!
//! ```bash
//! meridian_genesis --chain-id private_net \
//!     --erc20-snapshot ./data/erc20_snapshot.json \
//!     --stake-deposit ./data/stake_deposit.json \
//!     --genesis ./genesis
//! ```

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use meridian_genesis::{
    input,
    logger::{self, LogLevel},
    pipeline,
};

#[derive(Parser, Clone, Debug)]
#[command(name = "meridian_genesis")]
#[command(about = "Meridian genesis snapshot generator")]
pub struct Config {
    /// The ID of the chain
    #[clap(long, default_value_t = String::from("local_chain"))]
    chain_id: String,

    /// The JSON file containing the ERC20 balance snapshot
    #[clap(long, default_value_t = String::from("./erc20_snapshot.json"))]
    erc20_snapshot: String,

    /// The JSON file containing the initial stake deposits
    #[clap(long, default_value_t = String::from("./stake_deposit.json"))]
    stake_deposit: String,

    /// Output path of the genesis snapshot
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
        error!("genesis construction failed: {err}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    info!("generating genesis snapshot for chain {}", config.chain_id);

    let balances = input::load_balances(&config.erc20_snapshot)?;
    let declarations = input::load_stake_declarations(&config.stake_deposit)?;

    let (metadata, sv) = pipeline::generate(&config.chain_id, &balances, &declarations)?;
    pipeline::write_snapshot_file(&config.genesis, &metadata, &sv)?;

    Ok(())
}
