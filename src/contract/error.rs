use thiserror::Error;

// One variant per business rule. Display strings are the human-readable
// reasons handed back to both parties, so they are part of the contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("Only one output state should be created.")]
    MultipleOutputs,
    #[error("All of the participants must be signers.")]
    MissingSigner,
    #[error("The withdrawal amount cannot be greater than the balance.")]
    Overdrawn,
    #[error("Minimum Balance in the account after withdrawal should be £100")]
    MinimumBalance,
    #[error("Deposit amount provided should not be negative")]
    NegativeDeposit,
    #[error("Minimum amount that can be deposited in the account £500")]
    MinimumDeposit,
    #[error("output state is not of the expected type")]
    WrongStateType,
    #[error("deposits and withdrawals must consume an input state")]
    MissingInput,
    #[error("agreements cannot consume an input state")]
    UnexpectedInput,
    #[error("agreements must reference an attached document")]
    MissingAttachment,
}
