use crate::core::{FinalizedTx, Signature, SignedProposal, TxId};
use serde_derive::{Deserialize, Serialize};

// The entire cross-party surface of the protocol. Parties coordinate only
// through these messages; no state is shared.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum FlowMessage {
    // Initiator -> acceptor: a proposal carrying the initiator's own
    // signature.
    Propose(SignedProposal),
    // Acceptor -> initiator: endorsement of the identified proposal.
    Countersign { id: TxId, sig: Signature },
    // Acceptor -> initiator: explicit refusal, with the reason.
    Reject { id: TxId, reason: String },
    // Initiator -> acceptor: the notarized transaction.
    Finalized(FinalizedTx),
    // Initiator -> acceptor: the notary refused the transaction because a
    // competing transaction consumed its input first.
    Conflict { id: TxId, reason: String },
}

impl FlowMessage {
    pub fn label(&self) -> &'static str {
        match self {
            FlowMessage::Propose(_) => "Propose",
            FlowMessage::Countersign { .. } => "Countersign",
            FlowMessage::Reject { .. } => "Reject",
            FlowMessage::Finalized(_) => "Finalized",
            FlowMessage::Conflict { .. } => "Conflict",
        }
    }
}
