use log::{debug, info};

use meridian_common::{
    account::{Account, Coins},
    config::{GENESIS_HEIGHT, LUX_TO_MERI_RATIO},
    store::StoreView,
    varuint::VarUint,
};

use crate::{
    error::{GenesisError, InputError},
    input::{parse_address, parse_amount, BalanceMap},
};

/// Materialize the declared balances into canonical account records.
///
/// Every declared MeriWei amount mints LuxWei at the fixed genesis ratio.
/// Accounts are written at height 0; re-declaring an address overwrites
/// the earlier record.
pub fn ingest_balances(sv: &mut StoreView, balances: &BalanceMap) -> Result<(), GenesisError> {
    let ratio = VarUint::from_u64(LUX_TO_MERI_RATIO);

    for (declared_address, declared_amount) in balances {
        let address = parse_address(declared_address)?;
        let meri_wei = parse_amount(declared_amount)?;
        let lux_wei = ratio
            .checked_mul(meri_wei)
            .ok_or_else(|| InputError::InvalidAmount(declared_amount.clone()))?;

        let account = Account::new(address, Coins::new(meri_wei, lux_wei), GENESIS_HEIGHT);
        sv.set_account(&account);

        debug!(
            "ingested account {}: {} MeriWei, {} LuxWei",
            address, meri_wei, lux_wei
        );
    }

    info!("ingested {} balance declarations", balances.len());
    Ok(())
}
