mod address;
mod hash;
mod signature;

pub use address::{Address, ADDRESS_SIZE};
pub use hash::{hash, Hash, Hashable, HASH_SIZE};
pub use signature::{Signature, SIGNATURE_SIZE};
