use super::money::Amount;
use super::party::Party;
use crate::crypto::SignatureScheme;
use rand::Rng;

// One logical account is a chain of AccountState versions sharing a single
// UniqueIdentifier. Only the newest version of a chain is live; consumed
// versions are retired by the vault, never mutated.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueIdentifier([u8; 16]);

impl UniqueIdentifier {
    pub fn fresh() -> Self {
        Self(rand::thread_rng().gen())
    }
}

impl std::fmt::Display for UniqueIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// The state object recording the account agreed between two parties.
//
// `bank` holds the account and approves transitions, `account_holder` owns
// the balance. Both must sign every deposit and withdrawal.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct AccountState<S: SignatureScheme> {
    pub linear_id: UniqueIdentifier,
    pub balance: Amount,
    pub bank: Party<S>,
    pub account_holder: Party<S>,
}

impl<S: SignatureScheme> AccountState<S> {
    pub fn new(balance: Amount, bank: Party<S>, account_holder: Party<S>) -> Self {
        Self {
            linear_id: UniqueIdentifier::fresh(),
            balance,
            bank,
            account_holder,
        }
    }

    // The next version of this account. Successors keep the linear id, so a
    // chain of transitions stays one logical account.
    pub fn successor(&self, balance: Amount) -> Self {
        Self {
            linear_id: self.linear_id,
            balance,
            bank: self.bank.clone(),
            account_holder: self.account_holder.clone(),
        }
    }

    pub fn participants(&self) -> Vec<Party<S>> {
        vec![self.bank.clone(), self.account_holder.clone()]
    }
}

// A free-form agreement between two parties, referencing an external
// document by content hash. No balance is involved.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct AgreementState<S: SignatureScheme> {
    pub party_a: Party<S>,
    pub party_b: Party<S>,
    pub text: String,
}

impl<S: SignatureScheme> AgreementState<S> {
    pub fn participants(&self) -> Vec<Party<S>> {
        vec![self.party_a.clone(), self.party_b.clone()]
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub enum StateData<S: SignatureScheme> {
    Account(AccountState<S>),
    Agreement(AgreementState<S>),
}

impl<S: SignatureScheme> StateData<S> {
    pub fn participants(&self) -> Vec<Party<S>> {
        match self {
            StateData::Account(acc) => acc.participants(),
            StateData::Agreement(agr) => agr.participants(),
        }
    }

    pub fn as_account(&self) -> Option<&AccountState<S>> {
        match self {
            StateData::Account(acc) => Some(acc),
            _ => None,
        }
    }

    pub fn as_agreement(&self) -> Option<&AgreementState<S>> {
        match self {
            StateData::Agreement(agr) => Some(agr),
            _ => None,
        }
    }
}
