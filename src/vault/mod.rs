use crate::core::{FinalizedTx, Party, StateAndRef};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("recorded transaction consumes a state this vault does not hold")]
    UnknownInput,
    #[error("transaction {0} was already recorded")]
    AlreadyRecorded(String),
    #[error("vault data corrupted: {0}")]
    Corrupted(#[from] bincode::Error),
}

// The party-local store of live states. Only finalized transactions mutate
// it: the consumed input is retired and the outputs become the new heads.
// Full lineage retention lives behind this trait, out of the protocol's
// sight.
pub trait Vault {
    fn unconsumed(&self) -> Result<Vec<StateAndRef>, VaultError>;

    // Live states whose participant set is exactly the given set,
    // regardless of ordering.
    fn unconsumed_by_participants(
        &self,
        participants: &[Party],
    ) -> Result<Vec<StateAndRef>, VaultError>;

    fn record(&mut self, tx: &FinalizedTx) -> Result<(), VaultError>;
}

mod ram;
pub use ram::*;
