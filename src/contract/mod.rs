mod error;
pub use error::*;

mod account;
mod agreement;

use crate::core::{Command, Party, Proposal, PublicKey};

// The transition verifier. Pure and deterministic: the supplied proposal is
// the whole universe, nothing is read from disk or network.
//
// Rules are evaluated in a fixed order per command and the first failing
// rule is reported; later rules are not evaluated.
pub fn verify(tx: &Proposal) -> Result<(), ContractError> {
    let out = tx.single_output().ok_or(ContractError::MultipleOutputs)?;
    match tx.command {
        // No invariants are enforced on account creation yet.
        Command::Create => Ok(()),
        Command::Deposit => account::verify_deposit(tx, out),
        Command::Withdraw => account::verify_withdraw(tx, out),
        Command::Agree => agreement::verify_agree(tx, out),
    }
}

fn all_participants_signed(
    participants: &[Party],
    signers: &[PublicKey],
) -> Result<(), ContractError> {
    if participants
        .iter()
        .all(|p| signers.contains(&p.pub_key))
    {
        Ok(())
    } else {
        Err(ContractError::MissingSigner)
    }
}
