use crate::contract::ContractError;
use crate::notary::NotaryError;
use crate::vault::VaultError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("The Amount provided should not be negative")]
    InvalidAmount,
    #[error("Minimum amount to deposit in the account should be £50")]
    DepositBelowFloor,
    #[error("The withdrawal amount cannot be greater than the balance.")]
    WithdrawalExceedsBalance,
    #[error("no live account found for the given participants")]
    StateNotFound,
    #[error("more than one live account found for the given participants")]
    AmbiguousState,
    #[error("contract violation: {0}")]
    Contract(#[from] ContractError),
    #[error("rejected by local policy: {0}")]
    PolicyRejection(String),
    #[error("counterparty rejected the proposal: {0}")]
    Rejected(String),
    #[error("output state is not of the expected type")]
    TypeMismatch,
    #[error("input state was consumed by a competing transaction")]
    Conflict,
    #[error("timed out waiting for the counterparty")]
    Timeout,
    #[error("session channel closed unexpectedly")]
    ChannelClosed,
    #[error("unexpected message: {0}")]
    Protocol(String),
    #[error("proposal carries an invalid signature")]
    BadProposalSignature,
    #[error("countersignature from {0} is invalid")]
    BadCountersignature(String),
    #[error("vault error happened: {0}")]
    Vault(#[from] VaultError),
    #[error("notary error happened: {0}")]
    Notary(NotaryError),
}

// Conflicts get their own terminal variant; everything else the notary
// reports is wrapped as-is.
impl From<NotaryError> for FlowError {
    fn from(e: NotaryError) -> Self {
        match e {
            NotaryError::Conflict(_, _) => FlowError::Conflict,
            other => FlowError::Notary(other),
        }
    }
}
