use log::{debug, info};

use meridian_common::{
    account::Coins,
    config::GENESIS_HEIGHT,
    store::{HeightList, StoreView},
    validator::ValidatorCandidatePool,
    varuint::VarUint,
};

use crate::{
    error::{GenesisError, StateError},
    input::{parse_address, parse_amount, StakeDeclaration},
};

/// Apply the declared stake deposits against the ingested accounts,
/// strictly in input order.
///
/// Each deposit observes the live balance of its source (earlier
/// deposits in the same run have already been debited), so reordering the
/// input can change which declaration first fails. Any failure aborts the
/// whole construction; no partial application survives.
///
/// On success the populated candidate pool is persisted once, and the
/// genesis height is appended to the stake height list once.
pub fn apply_stake_deposits(
    sv: &mut StoreView,
    declarations: &[StakeDeclaration],
) -> Result<ValidatorCandidatePool, GenesisError> {
    let mut vcp = ValidatorCandidatePool::default();

    for declaration in declarations {
        let source = parse_address(&declaration.source)?;
        let holder = parse_address(&declaration.holder)?;
        let amount = parse_amount(&declaration.amount)?;

        let mut account = sv
            .get_account(&source)?
            .ok_or(StateError::MissingAccount(source))?;

        if account.balance.meri_wei < amount {
            return Err(StateError::InsufficientBalance {
                source_addr: source,
                balance: account.balance.meri_wei,
                amount,
            }
            .into());
        }

        vcp.deposit_stake(source, holder, amount)
            .map_err(StateError::DepositFailed)?;

        let stake = Coins::new(amount, VarUint::zero());
        account.balance = account
            .balance
            .checked_sub(&stake)
            .ok_or(StateError::InsufficientBalance {
                source_addr: source,
                balance: account.balance.meri_wei,
                amount,
            })?;
        account.last_updated_height = GENESIS_HEIGHT;
        sv.set_account(&account);

        debug!(
            "stake deposit applied: source {}, holder {}, amount {} MeriWei",
            source, holder, amount
        );
    }

    sv.set_validator_pool(&vcp);

    let mut height_list = HeightList::default();
    height_list.append(GENESIS_HEIGHT);
    sv.set_stake_height_list(&height_list);

    info!(
        "applied {} stake deposits across {} validator candidates",
        declarations.len(),
        vcp.len()
    );
    Ok(vcp)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use meridian_common::crypto::Address;

    use super::*;
    use crate::balance::ingest_balances;
    use crate::error::InputError;
    use crate::input::BalanceMap;

    const ADDR_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const ADDR_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const ADDR_C: &str = "0xcccccccccccccccccccccccccccccccccccccccc";

    fn setup(balances: &[(&str, &str)]) -> StoreView {
        let balances: BalanceMap = balances
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut sv = StoreView::new(GENESIS_HEIGHT);
        ingest_balances(&mut sv, &balances).unwrap();
        sv
    }

    fn declaration(source: &str, holder: &str, amount: &str) -> StakeDeclaration {
        StakeDeclaration {
            source: source.to_string(),
            holder: holder.to_string(),
            amount: amount.to_string(),
        }
    }

    fn meri_balance(sv: &StoreView, addr: &str) -> VarUint {
        sv.get_account(&Address::from_str(addr).unwrap())
            .unwrap()
            .unwrap()
            .balance
            .meri_wei
    }

    #[test]
    fn test_deposit_debits_meri_only() {
        let mut sv = setup(&[(ADDR_A, "1000")]);
        let vcp =
            apply_stake_deposits(&mut sv, &[declaration(ADDR_A, ADDR_B, "400")]).unwrap();

        let account = sv
            .get_account(&Address::from_str(ADDR_A).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(account.balance.meri_wei, VarUint::from_u64(600));
        assert_eq!(account.balance.lux_wei, VarUint::from_u64(5000));

        assert_eq!(vcp.len(), 1);
        let candidate = &vcp.candidates()[0];
        assert_eq!(candidate.holder, Address::from_str(ADDR_B).unwrap());
        assert_eq!(candidate.stakes.len(), 1);
        assert_eq!(candidate.stakes[0].source, Address::from_str(ADDR_A).unwrap());
        assert_eq!(candidate.total_stake(), VarUint::from_u64(400));
    }

    #[test]
    fn test_exact_balance_deposit_leaves_zero() {
        let mut sv = setup(&[(ADDR_A, "1000")]);
        apply_stake_deposits(&mut sv, &[declaration(ADDR_A, ADDR_B, "1000")]).unwrap();

        assert_eq!(meri_balance(&sv, ADDR_A), VarUint::zero());
        let account = sv
            .get_account(&Address::from_str(ADDR_A).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(account.balance.lux_wei, VarUint::from_u64(5000));
    }

    #[test]
    fn test_missing_source_account() {
        let mut sv = setup(&[(ADDR_A, "1000")]);
        let err =
            apply_stake_deposits(&mut sv, &[declaration(ADDR_C, ADDR_B, "1")]).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::State(StateError::MissingAccount(_))
        ));
    }

    #[test]
    fn test_insufficient_balance_is_fatal() {
        let mut sv = setup(&[(ADDR_A, "1000")]);
        let err =
            apply_stake_deposits(&mut sv, &[declaration(ADDR_A, ADDR_B, "1001")]).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::State(StateError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_deposits_observe_live_balance() {
        // 600 then 500 out of 1000: the second deposit must see the
        // already-debited balance and fail
        let mut sv = setup(&[(ADDR_A, "1000")]);
        let declarations = vec![
            declaration(ADDR_A, ADDR_B, "600"),
            declaration(ADDR_A, ADDR_C, "500"),
        ];
        let err = apply_stake_deposits(&mut sv, &declarations).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::State(StateError::InsufficientBalance { .. })
        ));

        // swapped order fails on the other declaration for the same reason
        let mut sv = setup(&[(ADDR_A, "1000")]);
        let declarations = vec![
            declaration(ADDR_A, ADDR_C, "500"),
            declaration(ADDR_A, ADDR_B, "600"),
        ];
        let err = apply_stake_deposits(&mut sv, &declarations).unwrap_err();
        match err {
            GenesisError::State(StateError::InsufficientBalance { balance, amount, .. }) => {
                assert_eq!(balance, VarUint::from_u64(500));
                assert_eq!(amount, VarUint::from_u64(600));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_amount_string_rejected() {
        let mut sv = setup(&[(ADDR_A, "1000")]);
        let err =
            apply_stake_deposits(&mut sv, &[declaration(ADDR_A, ADDR_B, "40O")]).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::Input(InputError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_pool_and_height_list_persisted_once() {
        let mut sv = setup(&[(ADDR_A, "1000")]);
        apply_stake_deposits(&mut sv, &[declaration(ADDR_A, ADDR_B, "400")]).unwrap();

        let pool = sv.get_validator_pool().unwrap().unwrap();
        assert_eq!(pool.len(), 1);
        // two accounts worth of records would be wrong: one account,
        // one pool record, one height list record
        assert_eq!(sv.len(), 3);
    }
}
