use lazy_static::lazy_static;
use primitive_types::U256;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 18 decimals: 10^18 MeriWei / LuxWei per whole token
pub const COIN_DECIMALS: u32 = 18;

// Every MeriWei ingested at genesis mints this many LuxWei alongside it
pub const LUX_TO_MERI_RATIO: u64 = 5;

// The genesis state is materialized at height 0; the bootstrap chain
// spans heights 0..=2 within epoch 0
pub const GENESIS_HEIGHT: u64 = 0;
pub const GENESIS_EPOCH: u64 = 0;

// Upper bound on the initial validator set size
pub const MAX_NUM_VALIDATORS: usize = 31;

// Reserved single-byte state store keys. Account records are keyed by
// their 20 raw address bytes, so one-byte keys can never collide.
pub const VALIDATOR_POOL_KEY: [u8; 1] = [0x01];
pub const STAKE_HEIGHT_LIST_KEY: [u8; 1] = [0x02];

lazy_static! {
    // 1 billion MERI
    pub static ref MERI_WEI_SUPPLY: U256 =
        U256::exp10(9) * U256::exp10(COIN_DECIMALS as usize);

    // 5 billion LUX, the MERI supply scaled by the genesis mint ratio
    pub static ref LUX_WEI_SUPPLY: U256 =
        *MERI_WEI_SUPPLY * U256::from(LUX_TO_MERI_RATIO);
}
