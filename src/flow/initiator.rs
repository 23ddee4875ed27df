use super::{FlowContext, FlowError, FlowMessage, FlowSession, Phase};
use crate::config::INITIATOR_DEPOSIT_FLOOR;
use crate::contract;
use crate::core::{
    Amount, Command, FinalizedTx, Party, Proposal, Signer, SignedProposal, StateData,
};
use crate::crypto::SignatureScheme;
use crate::notary::{Finality, NotaryDiscovery, NotaryError};
use crate::vault::Vault;

#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub is_deposit: bool,
    pub amount: Amount,
    pub counterparty: Party,
}

// Drive one deposit/withdraw attempt against the counterparty. Runs the
// whole machine: generate, verify, sign, gather the countersignature,
// finalize. Any failure aborts the attempt; nothing is recorded unless the
// notary accepted the transaction.
pub async fn initiate<V: Vault, N: Finality + NotaryDiscovery>(
    ctx: &FlowContext<V, N>,
    session: &mut FlowSession,
    req: TransferRequest,
) -> Result<FinalizedTx, FlowError> {
    let result = drive(ctx, session, req).await;
    if let Err(e) = &result {
        log::warn!("[session {:016x}] initiator aborted: {}", session.id(), e);
        session.advance(Phase::Aborted);
    }
    result
}

async fn drive<V: Vault, N: Finality + NotaryDiscovery>(
    ctx: &FlowContext<V, N>,
    session: &mut FlowSession,
    req: TransferRequest,
) -> Result<FinalizedTx, FlowError> {
    // Checked before anything is queried or created.
    if req.amount < Amount(0.0) {
        return Err(FlowError::InvalidAmount);
    }

    session.advance(Phase::Generating);
    let me = ctx.party();
    let heads = ctx
        .vault
        .read()
        .await
        .unconsumed_by_participants(&[me.clone(), req.counterparty.clone()])?;
    let accounts: Vec<_> = heads
        .into_iter()
        .filter(|sr| sr.state.as_account().is_some())
        .collect();
    let input = match accounts.as_slice() {
        [] => return Err(FlowError::StateNotFound),
        [one] => one.clone(),
        _ => return Err(FlowError::AmbiguousState),
    };
    let account = input
        .state
        .as_account()
        .ok_or(FlowError::TypeMismatch)?
        .clone();

    let (command, balance) = if req.is_deposit {
        if req.amount < INITIATOR_DEPOSIT_FLOOR {
            return Err(FlowError::DepositBelowFloor);
        }
        (Command::Deposit, account.balance + req.amount)
    } else {
        if req.amount > account.balance {
            return Err(FlowError::WithdrawalExceedsBalance);
        }
        (Command::Withdraw, account.balance - req.amount)
    };

    let tx = Proposal {
        outputs: vec![StateData::Account(account.successor(balance))],
        input: Some(input),
        command,
        signers: vec![me.pub_key.clone(), req.counterparty.pub_key.clone()],
        notary: ctx.notary.default_notary()?,
        attachment: None,
    };

    session.advance(Phase::Verifying);
    contract::verify(&tx)?;

    session.advance(Phase::Signing);
    let mut stx = SignedProposal::new(tx);
    ctx.wallet.sign(&mut stx);

    let stx = collect_countersignature(session, stx, &req.counterparty).await?;
    finalize(ctx, session, stx).await
}

// Send the partially-signed proposal and block until the counterparty
// endorses or rejects it.
pub(super) async fn collect_countersignature(
    session: &mut FlowSession,
    mut stx: SignedProposal,
    counterparty: &Party,
) -> Result<SignedProposal, FlowError> {
    session.advance(Phase::GatheringSignature);
    let id = stx.id();
    session.send(FlowMessage::Propose(stx.clone()))?;
    let wait = session.options().collect_timeout;
    match session.recv(wait).await? {
        FlowMessage::Countersign { id: got, sig } if got == id => {
            if !Signer::verify(&counterparty.pub_key, id.as_bytes(), &sig) {
                return Err(FlowError::BadCountersignature(counterparty.name.clone()));
            }
            stx.add_signature(counterparty.pub_key.clone(), sig);
            Ok(stx)
        }
        FlowMessage::Reject { id: got, reason } if got == id => Err(FlowError::Rejected(reason)),
        msg => Err(FlowError::Protocol(format!(
            "{} while gathering signatures for {}",
            msg.label(),
            id
        ))),
    }
}

// Submit to the notary and distribute the outcome. Past this point the
// attempt cannot be cancelled: it either finalizes on both sides or
// conflicts.
pub(super) async fn finalize<V: Vault, N: Finality + NotaryDiscovery>(
    ctx: &FlowContext<V, N>,
    session: &mut FlowSession,
    stx: SignedProposal,
) -> Result<FinalizedTx, FlowError> {
    session.advance(Phase::Finalizing);
    let id = stx.id();
    match ctx.notary.notarize(&stx).await {
        Ok(notary_sig) => {
            let ftx = FinalizedTx { tx: stx, notary_sig };
            ctx.vault.write().await.record(&ftx)?;
            if session.send(FlowMessage::Finalized(ftx.clone())).is_err() {
                // The transaction is final regardless; the counterparty
                // can recover it from the finality service.
                log::warn!(
                    "[session {:016x}] counterparty unreachable for finalized {}",
                    session.id(),
                    id
                );
            }
            session.advance(Phase::Finalized);
            Ok(ftx)
        }
        Err(e @ NotaryError::Conflict(_, _)) => {
            let _ = session.send(FlowMessage::Conflict {
                id,
                reason: e.to_string(),
            });
            Err(FlowError::Conflict)
        }
        Err(e) => Err(e.into()),
    }
}
