use log::info;

use meridian_common::{
    account::Account,
    config::{LUX_WEI_SUPPLY, MERI_WEI_SUPPLY, STAKE_HEIGHT_LIST_KEY, VALIDATOR_POOL_KEY},
    serializer::Serializer,
    store::StoreView,
    validator::ValidatorCandidatePool,
    varuint::VarUint,
};

use crate::error::{GenesisError, IntegrityError};

/// Replay the constructed state and enforce the global conservation laws.
///
/// MeriWei accounting is intentionally combined: account balances and the
/// stake amounts nested inside the validator pool feed one shared
/// accumulator, because staked funds still count as theirs, just
/// earmarked. LuxWei is never staked, so its total
/// comes from account records alone.
pub fn run(sv: &StoreView) -> Result<(), GenesisError> {
    let mut meri_wei_total = VarUint::zero();
    let mut lux_wei_total = VarUint::zero();
    let mut vcp_analyzed = false;

    for (key, value) in sv.iter() {
        if key == VALIDATOR_POOL_KEY.as_slice() {
            let vcp = ValidatorCandidatePool::from_bytes(value)?;
            for candidate in vcp.candidates() {
                info!(
                    "validator candidate {}: total stake = {}",
                    candidate.holder,
                    candidate.total_stake()
                );
                for stake in &candidate.stakes {
                    meri_wei_total = meri_wei_total
                        .checked_add(stake.amount)
                        .ok_or(IntegrityError::TotalOverflow { denom: "MeriWei" })?;
                    info!(
                        "    stake: source = {}, amount = {}",
                        stake.source, stake.amount
                    );
                }
            }
            vcp_analyzed = true;
        } else if key == STAKE_HEIGHT_LIST_KEY.as_slice() {
            // carries no value in either denomination
        } else {
            let account = Account::from_bytes(value)?;
            meri_wei_total = meri_wei_total
                .checked_add(account.balance.meri_wei)
                .ok_or(IntegrityError::TotalOverflow { denom: "MeriWei" })?;
            lux_wei_total = lux_wei_total
                .checked_add(account.balance.lux_wei)
                .ok_or(IntegrityError::TotalOverflow { denom: "LuxWei" })?;
            info!("account {}: {}", account.address, account.balance);
        }
    }

    if !vcp_analyzed {
        return Err(IntegrityError::MissingValidatorPool.into());
    }

    let expected_meri = VarUint::from(*MERI_WEI_SUPPLY);
    info!("expected   MeriWei total = {}", expected_meri);
    info!("calculated MeriWei total = {}", meri_wei_total);
    if meri_wei_total != expected_meri {
        return Err(IntegrityError::SupplyMismatch {
            denom: "MeriWei",
            expected: expected_meri,
            calculated: meri_wei_total,
        }
        .into());
    }

    let expected_lux = VarUint::from(*LUX_WEI_SUPPLY);
    info!("expected   LuxWei total = {}", expected_lux);
    info!("calculated LuxWei total = {}", lux_wei_total);
    if lux_wei_total != expected_lux {
        return Err(IntegrityError::SupplyMismatch {
            denom: "LuxWei",
            expected: expected_lux,
            calculated: lux_wei_total,
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use meridian_common::{
        account::{Account, Coins},
        config::LUX_TO_MERI_RATIO,
        crypto::Address,
        store::HeightList,
    };

    use super::*;

    // one account holding the full supply, minus what is staked
    fn supply_exact_store(staked: u64) -> StoreView {
        let staked = VarUint::from_u64(staked);
        let meri = VarUint::from(*MERI_WEI_SUPPLY)
            .checked_sub(staked)
            .unwrap();
        let lux = VarUint::from(*LUX_WEI_SUPPLY);

        let mut sv = StoreView::new(0);
        sv.set_account(&Account::new(
            Address::new([0xAA; 20]),
            Coins::new(meri, lux),
            0,
        ));

        let mut vcp = ValidatorCandidatePool::default();
        if !staked.is_zero() {
            vcp.deposit_stake(Address::new([0xAA; 20]), Address::new([0xBB; 20]), staked)
                .unwrap();
        }
        sv.set_validator_pool(&vcp);

        let mut hl = HeightList::default();
        hl.append(0);
        sv.set_stake_height_list(&hl);
        sv
    }

    #[test]
    fn test_exact_supply_passes_without_staking() {
        run(&supply_exact_store(0)).unwrap();
    }

    #[test]
    fn test_staked_amounts_count_toward_meri_total() {
        run(&supply_exact_store(1_000_000)).unwrap();
    }

    #[test]
    fn test_off_by_one_fails_supply_mismatch() {
        let mut sv = supply_exact_store(0);
        // burn one wei
        let address = Address::new([0xAA; 20]);
        let mut account = sv.get_account(&address).unwrap().unwrap();
        account.balance.meri_wei = account
            .balance
            .meri_wei
            .checked_sub(VarUint::one())
            .unwrap();
        sv.set_account(&account);

        let err = run(&sv).unwrap_err();
        match err {
            GenesisError::Integrity(IntegrityError::SupplyMismatch {
                denom,
                expected,
                calculated,
            }) => {
                assert_eq!(denom, "MeriWei");
                assert_eq!(
                    expected.checked_sub(calculated),
                    Some(VarUint::one())
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lux_total_independent_of_staking() {
        // staking touched only MeriWei; corrupting LuxWei must fail on
        // its own accumulator
        let mut sv = supply_exact_store(500);
        let address = Address::new([0xAA; 20]);
        let mut account = sv.get_account(&address).unwrap().unwrap();
        account.balance.lux_wei = account
            .balance
            .lux_wei
            .checked_add(VarUint::one())
            .unwrap();
        sv.set_account(&account);

        let err = run(&sv).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::Integrity(IntegrityError::SupplyMismatch { denom: "LuxWei", .. })
        ));
    }

    #[test]
    fn test_missing_pool_record_fails() {
        let mut sv = StoreView::new(0);
        sv.set_account(&Account::new(
            Address::new([0xAA; 20]),
            Coins::new(
                VarUint::from(*MERI_WEI_SUPPLY),
                VarUint::from(*LUX_WEI_SUPPLY),
            ),
            0,
        ));

        let err = run(&sv).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::Integrity(IntegrityError::MissingValidatorPool)
        ));
    }

    #[test]
    fn test_ratio_matches_supplies() {
        let meri = VarUint::from(*MERI_WEI_SUPPLY);
        let lux = VarUint::from(*LUX_WEI_SUPPLY);
        assert_eq!(meri.checked_mul(VarUint::from_u64(LUX_TO_MERI_RATIO)), Some(lux));
    }
}
