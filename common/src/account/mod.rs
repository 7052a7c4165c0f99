use std::fmt::{Display, Error, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
    crypto::Address,
    serializer::{Reader, ReaderError, Serializer, Writer},
    varuint::VarUint,
};

/// Balance pair covering both ledger denominations.
///
/// MERI is the stake-bearing denomination; LUX is the fee denomination
/// minted at a fixed ratio at genesis and never staked. Arithmetic is
/// checked only: an underflow is a caller invariant violation and is
/// surfaced as `None`, never clamped to zero.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Coins {
    pub meri_wei: VarUint,
    pub lux_wei: VarUint,
}

impl Coins {
    pub const fn new(meri_wei: VarUint, lux_wei: VarUint) -> Self {
        Coins { meri_wei, lux_wei }
    }

    pub const fn zero() -> Self {
        Coins::new(VarUint::zero(), VarUint::zero())
    }

    pub fn checked_add(&self, other: &Coins) -> Option<Coins> {
        Some(Coins {
            meri_wei: self.meri_wei.checked_add(other.meri_wei)?,
            lux_wei: self.lux_wei.checked_add(other.lux_wei)?,
        })
    }

    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        Some(Coins {
            meri_wei: self.meri_wei.checked_sub(other.meri_wei)?,
            lux_wei: self.lux_wei.checked_sub(other.lux_wei)?,
        })
    }
}

impl Serializer for Coins {
    fn write(&self, writer: &mut Writer) {
        self.meri_wei.write(writer);
        self.lux_wei.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let meri_wei = VarUint::read(reader)?;
        let lux_wei = VarUint::read(reader)?;
        Ok(Coins { meri_wei, lux_wei })
    }

    fn size(&self) -> usize {
        self.meri_wei.size() + self.lux_wei.size()
    }
}

impl Display for Coins {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{} MeriWei / {} LuxWei", self.meri_wei, self.lux_wei)
    }
}

/// One ledger account record as persisted in the state store.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub balance: Coins,
    pub last_updated_height: u64,
}

impl Account {
    pub const fn new(address: Address, balance: Coins, last_updated_height: u64) -> Self {
        Account {
            address,
            balance,
            last_updated_height,
        }
    }
}

impl Serializer for Account {
    fn write(&self, writer: &mut Writer) {
        self.address.write(writer);
        self.balance.write(writer);
        writer.write_u64(&self.last_updated_height);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let address = Address::read(reader)?;
        let balance = Coins::read(reader)?;
        let last_updated_height = reader.read_u64()?;
        Ok(Account {
            address,
            balance,
            last_updated_height,
        })
    }

    fn size(&self) -> usize {
        self.address.size() + self.balance.size() + 8
    }
}
