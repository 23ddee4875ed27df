use std::fmt::Debug;

use serde::Serialize;
use sha3::{Digest, Sha3_256};

pub trait Hash: Debug + Clone + Serialize + 'static {
    /// The length in bytes of the hasher output
    const LENGTH: usize;

    type Output: Debug
        + Clone
        + Copy
        + PartialEq
        + Eq
        + std::hash::Hash
        + serde::Serialize
        + serde::de::DeserializeOwned
        + AsRef<[u8]>
        + AsMut<[u8]>
        + Default;

    fn hash(s: &[u8]) -> Self::Output;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sha3Hasher;

impl Hash for Sha3Hasher {
    const LENGTH: usize = 32;
    type Output = [u8; 32];

    fn hash(s: &[u8]) -> Self::Output {
        let mut h = Sha3_256::new();
        h.update(s);
        h.finalize().into()
    }
}
