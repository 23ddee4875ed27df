use super::hash::Hash;
use super::party::Party;
use super::state::StateData;
use crate::crypto::SignatureScheme;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId<H: Hash>(H::Output);

impl<H: Hash> TxId<H> {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<H: Hash> std::fmt::Display for TxId<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0.as_ref()))
    }
}

// Reference to one output of a finalized transaction. Consuming a state
// means consuming its reference; the notary orders that consumption.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateRef<H: Hash> {
    pub txid: TxId<H>,
    pub index: u32,
}

impl<H: Hash> std::fmt::Display for StateRef<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct StateAndRef<H: Hash, S: SignatureScheme> {
    pub state: StateData<S>,
    pub reference: StateRef<H>,
}

// Content hash of an externally stored document. Whether the document is
// trusted is decided elsewhere.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentId<H: Hash>(H::Output);

impl<H: Hash> AttachmentId<H> {
    pub fn of(content: &[u8]) -> Self {
        Self(H::hash(content))
    }
}

impl<H: Hash> std::fmt::Display for AttachmentId<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0.as_ref()))
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Create,
    Deposit,
    Withdraw,
    Agree,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Command::Create => write!(f, "Create"),
            Command::Deposit => write!(f, "Deposit"),
            Command::Withdraw => write!(f, "Withdraw"),
            Command::Agree => write!(f, "Agree"),
        }
    }
}

// A candidate transition: at most one consumed input, the produced outputs,
// a command tag and the set of keys that must endorse it. Not a fact until
// fully signed and notarized.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Proposal<H: Hash, S: SignatureScheme> {
    pub input: Option<StateAndRef<H, S>>,
    pub outputs: Vec<StateData<S>>,
    pub command: Command,
    pub signers: Vec<S::Pub>,
    pub notary: Party<S>,
    pub attachment: Option<AttachmentId<H>>,
}

impl<H: Hash, S: SignatureScheme> Proposal<H, S> {
    pub fn id(&self) -> TxId<H> {
        TxId(H::hash(&bincode::serialize(self).unwrap()))
    }

    pub fn single_output(&self) -> Option<&StateData<S>> {
        match self.outputs.as_slice() {
            [out] => Some(out),
            _ => None,
        }
    }
}

// A proposal plus the endorsements collected so far. Signatures are made
// over the transaction id.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SignedProposal<H: Hash, S: SignatureScheme> {
    pub tx: Proposal<H, S>,
    pub sigs: Vec<(S::Pub, S::Sig)>,
}

impl<H: Hash, S: SignatureScheme> SignedProposal<H, S> {
    pub fn new(tx: Proposal<H, S>) -> Self {
        Self {
            tx,
            sigs: Vec::new(),
        }
    }

    pub fn id(&self) -> TxId<H> {
        self.tx.id()
    }

    pub fn add_signature(&mut self, pk: S::Pub, sig: S::Sig) {
        self.sigs.push((pk, sig));
    }

    pub fn signed_by(&self, pk: &S::Pub) -> bool {
        let id = self.id();
        self.sigs
            .iter()
            .any(|(p, sig)| p == pk && S::verify(p, id.as_bytes(), sig))
    }

    // Required signers whose valid endorsement has not been collected yet.
    pub fn missing_signers(&self) -> Vec<S::Pub> {
        self.tx
            .signers
            .iter()
            .filter(|pk| !self.signed_by(pk))
            .cloned()
            .collect()
    }

    pub fn is_fully_signed(&self) -> bool {
        self.missing_signers().is_empty()
    }

    // Every collected signature must be valid, whether or not its key is a
    // required signer.
    pub fn verify_signatures(&self) -> bool {
        let id = self.id();
        self.sigs
            .iter()
            .all(|(pk, sig)| S::verify(pk, id.as_bytes(), sig))
    }
}

// A transition accepted by the notary. Both parties store this record.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct FinalizedTx<H: Hash, S: SignatureScheme> {
    pub tx: SignedProposal<H, S>,
    pub notary_sig: S::Sig,
}

impl<H: Hash, S: SignatureScheme> FinalizedTx<H, S> {
    pub fn id(&self) -> TxId<H> {
        self.tx.id()
    }

    pub fn verify_notary(&self) -> bool {
        let id = self.id();
        S::verify(&self.tx.tx.notary.pub_key, id.as_bytes(), &self.notary_sig)
    }

    // References to the outputs this transaction produced.
    pub fn output_refs(&self) -> Vec<StateRef<H>> {
        let txid = self.id();
        (0..self.tx.tx.outputs.len() as u32)
            .map(|index| StateRef { txid: txid.clone(), index })
            .collect()
    }
}
