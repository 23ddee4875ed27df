use crate::core::{Party, PublicKey, Signature, SignedProposal, Signer};
use crate::crypto::SignatureScheme;

// The local signing collaborator. Derives a keypair from a seed and
// endorses proposals on behalf of one party; nothing here talks to the
// network.
#[derive(Clone)]
pub struct Wallet {
    name: String,
    private_key: <Signer as SignatureScheme>::Priv,
    pub_key: PublicKey,
}

impl Wallet {
    pub fn new(name: &str, seed: &[u8]) -> Self {
        let (pk, sk) = Signer::generate_keys(seed);
        Self {
            name: name.into(),
            private_key: sk,
            pub_key: pk,
        }
    }

    pub fn party(&self) -> Party {
        Party::new(&self.name, self.pub_key.clone())
    }

    pub fn sign_bytes(&self, msg: &[u8]) -> Signature {
        Signer::sign(&self.private_key, msg)
    }

    // Endorse a proposal: the signature is made over the transaction id.
    pub fn sign(&self, stx: &mut SignedProposal) {
        let sig = self.sign_bytes(stx.id().as_bytes());
        stx.add_signature(self.pub_key.clone(), sig);
    }
}
