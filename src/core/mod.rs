pub mod hash;
mod money;
mod party;
mod proposal;
mod state;

use crate::crypto;

pub use money::Amount;
pub use proposal::Command;
pub use state::UniqueIdentifier;

pub type Hasher = hash::Sha3Hasher;
pub type Signer = crypto::ed25519::Ed25519<Hasher>;

pub type PublicKey = <Signer as crypto::SignatureScheme>::Pub;
pub type Signature = <Signer as crypto::SignatureScheme>::Sig;

pub type Party = party::Party<Signer>;
pub type ParsePartyError = party::ParsePartyError;

pub type AccountState = state::AccountState<Signer>;
pub type AgreementState = state::AgreementState<Signer>;
pub type StateData = state::StateData<Signer>;

pub type TxId = proposal::TxId<Hasher>;
pub type StateRef = proposal::StateRef<Hasher>;
pub type StateAndRef = proposal::StateAndRef<Hasher, Signer>;
pub type AttachmentId = proposal::AttachmentId<Hasher>;
pub type Proposal = proposal::Proposal<Hasher, Signer>;
pub type SignedProposal = proposal::SignedProposal<Hasher, Signer>;
pub type FinalizedTx = proposal::FinalizedTx<Hasher, Signer>;
