use crate::core::{Party, Signature, SignedProposal};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotaryError {
    #[error("input state {0} was already consumed by transaction {1}")]
    Conflict(String, String),
    #[error("proposal is missing required signatures")]
    MissingSignatures,
    #[error("no notary is known for this network")]
    NoKnownNotary,
}

// The finality service contract. Given a fully-signed proposal, either
// every party can treat the transition as permanent, or the referenced
// input was already spent and the whole attempt is void. The notary
// totally orders consumption of each state reference; there is no partial
// outcome.
#[async_trait]
pub trait Finality {
    async fn notarize(&self, stx: &SignedProposal) -> Result<Signature, NotaryError>;
}

#[async_trait]
impl<T: Finality + Send + Sync> Finality for std::sync::Arc<T> {
    async fn notarize(&self, stx: &SignedProposal) -> Result<Signature, NotaryError> {
        (**self).notarize(stx).await
    }
}

// Single-notary networks answer with the same identity for every request.
pub trait NotaryDiscovery {
    fn default_notary(&self) -> Result<Party, NotaryError>;
}

impl<T: NotaryDiscovery> NotaryDiscovery for std::sync::Arc<T> {
    fn default_notary(&self) -> Result<Party, NotaryError> {
        (**self).default_notary()
    }
}

mod mem;
pub use mem::*;
