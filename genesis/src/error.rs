use thiserror::Error;

use meridian_common::{
    crypto::{Address, Hash},
    serializer::ReaderError,
    validator::StakeError,
    varuint::VarUint,
};

/// Malformed declaration input. Detected before any state mutation for
/// the offending entry.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("failed to parse amount: {0}")]
    InvalidAmount(String),

    #[error("malformed input file {path}: {source}")]
    MalformedFile {
        path: String,
        source: serde_json::Error,
    },
}

/// A declaration that is well-formed but cannot be applied against the
/// ledger state built so far. Always fatal for the whole construction.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("no account found for source address {0}")]
    MissingAccount(Address),

    #[error(
        "source account {source_addr} does not have sufficient balance for stake deposit: \
         MeriWei balance = {balance}, stake amount = {amount}"
    )]
    InsufficientBalance {
        source_addr: Address,
        balance: VarUint,
        amount: VarUint,
    },

    #[error("failed to deposit stake: {0}")]
    DepositFailed(#[from] StakeError),
}

/// Post-construction audit or replay failure. The snapshot artifact is
/// invalid as a whole and must be discarded.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("validator candidate pool not detected in the genesis state")]
    MissingValidatorPool,

    #[error("unmatched {denom} total: expected = {expected}, calculated = {calculated}")]
    SupplyMismatch {
        denom: &'static str,
        expected: VarUint,
        calculated: VarUint,
    },

    #[error("{denom} total overflowed while auditing")]
    TotalOverflow { denom: &'static str },

    #[error("state hash mismatch: anchor records {expected}, replay computed {calculated}")]
    StateHashMismatch { expected: Hash, calculated: Hash },

    #[error("expected exactly one block trio in the snapshot anchor, found {0}")]
    UnexpectedTrioCount(usize),

    #[error("anchor chain broken: {0}")]
    BrokenChain(&'static str),

    #[error("snapshot file does not start with a start marker record")]
    MissingStartMarker,

    #[error("snapshot file is truncated: end marker record never observed")]
    TruncatedSnapshot,

    #[error("start marker height {start} does not match end marker height {end}")]
    MarkerHeightMismatch { start: u64, end: u64 },
}

/// Top-level error for the whole construction pipeline. Every failure is
/// unrecoverable at the point of detection; the binaries log the value
/// and exit nonzero.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec failure: {0}")]
    Codec(#[from] ReaderError),
}
