use crate::crypto::SignatureScheme;
use std::str::FromStr;
use thiserror::Error;

// A party is a named identity holding the public key that must endorse any
// state transition it participates in. Key custody lives outside this crate.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct Party<S: SignatureScheme> {
    pub name: String,
    pub pub_key: S::Pub,
}

impl<S: SignatureScheme> Party<S> {
    pub fn new(name: &str, pub_key: S::Pub) -> Self {
        Self {
            name: name.into(),
            pub_key,
        }
    }
}

impl<S: SignatureScheme> PartialEq for Party<S> {
    fn eq(&self, other: &Self) -> bool {
        self.pub_key == other.pub_key
    }
}

impl<S: SignatureScheme> Eq for Party<S> {}

impl<S: SignatureScheme> std::hash::Hash for Party<S> {
    fn hash<Hasher>(&self, state: &mut Hasher)
    where
        Hasher: std::hash::Hasher,
    {
        self.pub_key.hash(state);
    }
}

impl<S: SignatureScheme> std::fmt::Display for Party<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Error, Debug)]
pub enum ParsePartyError {
    #[error("party invalid")]
    Invalid,
}

impl<S: SignatureScheme> FromStr for Party<S>
where
    <S::Pub as FromStr>::Err: std::fmt::Debug,
{
    type Err = ParsePartyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, key) = s.split_once('@').ok_or(ParsePartyError::Invalid)?;
        Ok(Party {
            name: name.into(),
            pub_key: S::Pub::from_str(key).map_err(|_| ParsePartyError::Invalid)?,
        })
    }
}
