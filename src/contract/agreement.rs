use super::{all_participants_signed, ContractError};
use crate::core::{Proposal, StateData};

// Agreements create a fact out of thin air: no input is consumed. The
// referenced attachment must be present, but whether it is trustworthy is
// decided by an external service.
pub(super) fn verify_agree(tx: &Proposal, out: &StateData) -> Result<(), ContractError> {
    let out = out.as_agreement().ok_or(ContractError::WrongStateType)?;
    if tx.input.is_some() {
        return Err(ContractError::UnexpectedInput);
    }
    all_participants_signed(&out.participants(), &tx.signers)?;
    if tx.attachment.is_none() {
        return Err(ContractError::MissingAttachment);
    }
    Ok(())
}
