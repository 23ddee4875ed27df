use crate::core::Party;
use crate::notary::{Finality, NotaryDiscovery};
use crate::vault::Vault;
use crate::wallet::Wallet;
use tokio::sync::RwLock;

// One party's runtime: its signing wallet, its vault of live states and a
// handle to the finality service. Sessions share this read-mostly; each
// session's own phase and signatures stay inside the session.
pub struct FlowContext<V: Vault, N: Finality + NotaryDiscovery> {
    pub wallet: Wallet,
    pub vault: RwLock<V>,
    pub notary: N,
}

impl<V: Vault, N: Finality + NotaryDiscovery> FlowContext<V, N> {
    pub fn new(wallet: Wallet, vault: V, notary: N) -> Self {
        Self {
            wallet,
            vault: RwLock::new(vault),
            notary,
        }
    }

    pub fn party(&self) -> Party {
        self.wallet.party()
    }
}
