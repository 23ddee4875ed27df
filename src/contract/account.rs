use super::{all_participants_signed, ContractError};
use crate::config::{MINIMUM_DEPOSIT, MINIMUM_REMAINING_BALANCE};
use crate::core::{Amount, Proposal, StateData};

pub(super) fn verify_withdraw(tx: &Proposal, out: &StateData) -> Result<(), ContractError> {
    let out = out.as_account().ok_or(ContractError::WrongStateType)?;
    all_participants_signed(&out.participants(), &tx.signers)?;
    if out.balance <= Amount(0.0) {
        return Err(ContractError::Overdrawn);
    }
    if out.balance < MINIMUM_REMAINING_BALANCE {
        return Err(ContractError::MinimumBalance);
    }
    Ok(())
}

pub(super) fn verify_deposit(tx: &Proposal, out: &StateData) -> Result<(), ContractError> {
    let out = out.as_account().ok_or(ContractError::WrongStateType)?;
    all_participants_signed(&out.participants(), &tx.signers)?;
    let input = tx.input.as_ref().ok_or(ContractError::MissingInput)?;
    let input = input
        .state
        .as_account()
        .ok_or(ContractError::WrongStateType)?;
    if out.balance <= input.balance {
        return Err(ContractError::NegativeDeposit);
    }
    if out.balance - input.balance < MINIMUM_DEPOSIT {
        return Err(ContractError::MinimumDeposit);
    }
    Ok(())
}
