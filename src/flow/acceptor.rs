use super::{FlowContext, FlowError, FlowMessage, FlowSession, Phase};
use crate::config::ACCEPTOR_BALANCE_CAP;
use crate::core::{FinalizedTx, TxId};
use crate::notary::{Finality, NotaryDiscovery};
use crate::vault::Vault;

// The counterparty's side of a deposit/withdraw attempt: review the
// proposal, apply our own acceptance policy on top of the contract, then
// countersign and wait for the notarized outcome.
pub async fn accept<V: Vault, N: Finality + NotaryDiscovery>(
    ctx: &FlowContext<V, N>,
    session: &mut FlowSession,
) -> Result<FinalizedTx, FlowError> {
    let result = drive(ctx, session).await;
    if let Err(e) = &result {
        log::warn!("[session {:016x}] acceptor aborted: {}", session.id(), e);
        session.advance(Phase::Aborted);
    }
    result
}

async fn drive<V: Vault, N: Finality + NotaryDiscovery>(
    ctx: &FlowContext<V, N>,
    session: &mut FlowSession,
) -> Result<FinalizedTx, FlowError> {
    session.advance(Phase::Reviewing);
    let wait = session.options().collect_timeout;
    let stx = match session.recv(wait).await? {
        FlowMessage::Propose(stx) => stx,
        msg => {
            return Err(FlowError::Protocol(format!(
                "{} while waiting for a proposal",
                msg.label()
            )))
        }
    };
    let id = stx.id();

    // This must be an account transaction with a single output.
    let account = stx
        .tx
        .single_output()
        .and_then(|out| out.as_account())
        .ok_or(FlowError::TypeMismatch)?;

    if !stx.verify_signatures() {
        return Err(FlowError::BadProposalSignature);
    }

    // Local policy, deliberately stricter than the contract. The contract
    // itself is enforced by the initiator and the notary.
    if account.balance > ACCEPTOR_BALANCE_CAP {
        let reason = "I won't accept account transactions with a value over 100.".to_string();
        session.send(FlowMessage::Reject {
            id,
            reason: reason.clone(),
        })?;
        return Err(FlowError::PolicyRejection(reason));
    }

    let sig = ctx.wallet.sign_bytes(id.as_bytes());
    session.send(FlowMessage::Countersign { id, sig })?;

    await_finality(ctx, session, id).await
}

// Block until the finality service (relayed over the session) delivers
// the transaction we countersigned, or reports that it lost.
pub(super) async fn await_finality<V: Vault, N: Finality + NotaryDiscovery>(
    ctx: &FlowContext<V, N>,
    session: &mut FlowSession,
    id: TxId,
) -> Result<FinalizedTx, FlowError> {
    session.advance(Phase::AwaitingFinality);
    let wait = session.options().finality_timeout;
    match session.recv(wait).await? {
        FlowMessage::Finalized(ftx) if ftx.id() == id => {
            if !ftx.verify_notary() {
                return Err(FlowError::Protocol(format!(
                    "invalid notary signature on {}",
                    id
                )));
            }
            ctx.vault.write().await.record(&ftx)?;
            session.advance(Phase::Finalized);
            Ok(ftx)
        }
        FlowMessage::Finalized(ftx) => Err(FlowError::Protocol(format!(
            "Finalized {} does not match countersigned {}",
            ftx.id(),
            id
        ))),
        FlowMessage::Conflict { id: got, .. } if got == id => Err(FlowError::Conflict),
        msg => Err(FlowError::Protocol(format!(
            "{} while waiting for finality of {}",
            msg.label(),
            id
        ))),
    }
}
