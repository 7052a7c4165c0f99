use std::{fs::File, io::BufReader, path::Path, str::FromStr};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use meridian_common::{crypto::Address, varuint::VarUint};

use crate::error::{GenesisError, InputError};

/// Balance declarations: hex address -> decimal MeriWei amount.
///
/// An `IndexMap` keeps file order for processing and logging; a duplicate
/// address silently overwrites the earlier value (last write wins), which
/// is the documented behavior for this input.
pub type BalanceMap = IndexMap<String, String>;

/// One stake deposit declaration as read from the input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakeDeclaration {
    pub source: String,
    pub holder: String,
    pub amount: String,
}

pub fn load_balances<P: AsRef<Path>>(path: P) -> Result<BalanceMap, GenesisError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let balances: BalanceMap =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            InputError::MalformedFile {
                path: path.display().to_string(),
                source,
            }
        })?;
    debug!("loaded {} balance declarations from {}", balances.len(), path.display());
    Ok(balances)
}

pub fn load_stake_declarations<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<StakeDeclaration>, GenesisError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let declarations: Vec<StakeDeclaration> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            InputError::MalformedFile {
                path: path.display().to_string(),
                source,
            }
        })?;
    debug!(
        "loaded {} stake declarations from {}",
        declarations.len(),
        path.display()
    );
    Ok(declarations)
}

/// Validate and parse a declared hex address.
pub fn parse_address(value: &str) -> Result<Address, InputError> {
    if !Address::is_valid_hex(value) {
        return Err(InputError::InvalidAddress(value.to_owned()));
    }
    Address::from_str(value).map_err(|_| InputError::InvalidAddress(value.to_owned()))
}

/// Parse a declared decimal amount. Anything but a plain base-10 integer
/// is rejected, never truncated or rounded.
pub fn parse_amount(value: &str) -> Result<VarUint, InputError> {
    VarUint::from_dec_str(value).map_err(|_| InputError::InvalidAmount(value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_rejects_non_numeric() {
        assert!(parse_amount("400").is_ok());
        assert!(parse_amount("400x").is_err());
        assert!(parse_amount("4.5").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_parse_address_rejects_bad_syntax() {
        assert!(parse_address("0x2e833968e5bb786ae419c4d13189fb081cc43bab").is_ok());
        assert!(parse_address("2e833968e5bb786ae419c4d13189fb081cc43bab").is_ok());
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("not an address").is_err());
    }

    #[test]
    fn test_duplicate_balance_keys_last_write_wins() {
        let json = r#"{
            "0x2e833968e5bb786ae419c4d13189fb081cc43bab": "100",
            "0x2e833968e5bb786ae419c4d13189fb081cc43bab": "900"
        }"#;
        let balances: BalanceMap = serde_json::from_str(json).unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(
            balances["0x2e833968e5bb786ae419c4d13189fb081cc43bab"],
            "900"
        );
    }
}
