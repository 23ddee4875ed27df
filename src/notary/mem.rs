use super::{Finality, NotaryDiscovery, NotaryError};
use crate::core::{Party, Signature, SignedProposal, StateRef, TxId};
use crate::wallet::Wallet;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

// Reference notary: a spent-reference map behind a mutex. Re-notarizing
// the same transaction is answered again rather than treated as a
// conflict, so a retried submission stays safe.
pub struct MemoryNotary {
    wallet: Wallet,
    consumed: Mutex<HashMap<StateRef, TxId>>,
}

impl MemoryNotary {
    pub fn new(wallet: Wallet) -> MemoryNotary {
        MemoryNotary {
            wallet,
            consumed: Mutex::new(HashMap::new()),
        }
    }

    pub fn party(&self) -> Party {
        self.wallet.party()
    }
}

#[async_trait]
impl Finality for MemoryNotary {
    async fn notarize(&self, stx: &SignedProposal) -> Result<Signature, NotaryError> {
        if !stx.is_fully_signed() {
            return Err(NotaryError::MissingSignatures);
        }
        let txid = stx.id();
        if let Some(input) = &stx.tx.input {
            let mut consumed = self.consumed.lock().await;
            match consumed.get(&input.reference).copied() {
                Some(winner) if winner != txid => {
                    log::warn!(
                        "Notary conflict: {} is consumed by {}, rejecting {}",
                        input.reference,
                        winner,
                        txid
                    );
                    return Err(NotaryError::Conflict(
                        input.reference.to_string(),
                        winner.to_string(),
                    ));
                }
                _ => {
                    consumed.insert(input.reference, txid);
                }
            }
        }
        log::debug!("Notarized transaction {}", txid);
        Ok(self.wallet.sign_bytes(txid.as_bytes()))
    }
}

impl NotaryDiscovery for MemoryNotary {
    fn default_notary(&self) -> Result<Party, NotaryError> {
        Ok(self.party())
    }
}
