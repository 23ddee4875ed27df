use super::{Vault, VaultError};
use crate::core::{FinalizedTx, Party, StateAndRef, StateRef};
use std::collections::HashMap;

// In-memory vault. Retired states are kept for lineage, keyed by the
// transaction that consumed them.
pub struct RamVault {
    heads: HashMap<StateRef, StateAndRef>,
    consumed: HashMap<StateRef, crate::core::TxId>,
}

impl RamVault {
    pub fn new() -> RamVault {
        RamVault {
            heads: HashMap::new(),
            consumed: HashMap::new(),
        }
    }
}

impl Default for RamVault {
    fn default() -> Self {
        Self::new()
    }
}

impl Vault for RamVault {
    fn unconsumed(&self) -> Result<Vec<StateAndRef>, VaultError> {
        Ok(self.heads.values().cloned().collect())
    }

    fn unconsumed_by_participants(
        &self,
        participants: &[Party],
    ) -> Result<Vec<StateAndRef>, VaultError> {
        Ok(self
            .heads
            .values()
            .filter(|sr| {
                let parts = sr.state.participants();
                parts.len() == participants.len()
                    && participants.iter().all(|p| parts.contains(p))
            })
            .cloned()
            .collect())
    }

    fn record(&mut self, tx: &FinalizedTx) -> Result<(), VaultError> {
        let txid = tx.id();
        if self.consumed.values().any(|t| *t == txid)
            || tx.output_refs().iter().any(|r| self.heads.contains_key(r))
        {
            return Err(VaultError::AlreadyRecorded(txid.to_string()));
        }
        if let Some(input) = &tx.tx.tx.input {
            if self.heads.remove(&input.reference).is_none() {
                return Err(VaultError::UnknownInput);
            }
            self.consumed.insert(input.reference, txid);
        }
        for (reference, state) in tx.output_refs().into_iter().zip(tx.tx.tx.outputs.iter()) {
            self.heads.insert(
                reference,
                StateAndRef {
                    state: state.clone(),
                    reference,
                },
            );
        }
        Ok(())
    }
}
