use super::acceptor::await_finality;
use super::initiator::{collect_countersignature, finalize};
use super::{FlowContext, FlowError, FlowMessage, FlowSession, Phase};
use crate::contract;
use crate::core::{
    AgreementState, AttachmentId, Command, FinalizedTx, Party, Proposal, SignedProposal, StateData,
};
use crate::notary::{Finality, NotaryDiscovery};
use crate::vault::Vault;

// The generalized two-party variant: agree on a piece of text plus an
// externally stored document. No balance rules apply; whether the
// document itself is trustworthy is somebody else's problem.
#[derive(Debug, Clone)]
pub struct AgreementRequest {
    pub text: String,
    pub attachment: AttachmentId,
    pub counterparty: Party,
}

pub async fn propose_agreement<V: Vault, N: Finality + NotaryDiscovery>(
    ctx: &FlowContext<V, N>,
    session: &mut FlowSession,
    req: AgreementRequest,
) -> Result<FinalizedTx, FlowError> {
    let result = drive_propose(ctx, session, req).await;
    if let Err(e) = &result {
        log::warn!("[session {:016x}] proposer aborted: {}", session.id(), e);
        session.advance(Phase::Aborted);
    }
    result
}

async fn drive_propose<V: Vault, N: Finality + NotaryDiscovery>(
    ctx: &FlowContext<V, N>,
    session: &mut FlowSession,
    req: AgreementRequest,
) -> Result<FinalizedTx, FlowError> {
    session.advance(Phase::Generating);
    let me = ctx.party();
    let tx = Proposal {
        input: None,
        outputs: vec![StateData::Agreement(AgreementState {
            party_a: me.clone(),
            party_b: req.counterparty.clone(),
            text: req.text,
        })],
        command: Command::Agree,
        signers: vec![me.pub_key.clone(), req.counterparty.pub_key.clone()],
        notary: ctx.notary.default_notary()?,
        attachment: Some(req.attachment),
    };

    session.advance(Phase::Verifying);
    contract::verify(&tx)?;

    session.advance(Phase::Signing);
    let mut stx = SignedProposal::new(tx);
    ctx.wallet.sign(&mut stx);

    let stx = collect_countersignature(session, stx, &req.counterparty).await?;
    finalize(ctx, session, stx).await
}

pub async fn accept_agreement<V: Vault, N: Finality + NotaryDiscovery>(
    ctx: &FlowContext<V, N>,
    session: &mut FlowSession,
) -> Result<FinalizedTx, FlowError> {
    let result = drive_accept(ctx, session).await;
    if let Err(e) = &result {
        log::warn!("[session {:016x}] agreer aborted: {}", session.id(), e);
        session.advance(Phase::Aborted);
    }
    result
}

async fn drive_accept<V: Vault, N: Finality + NotaryDiscovery>(
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

    // Structural check only: the transaction must produce an agreement.
    // Everything else is the contract's business.
    stx.tx
        .single_output()
        .and_then(|out| out.as_agreement())
        .ok_or(FlowError::TypeMismatch)?;

    if !stx.verify_signatures() {
        return Err(FlowError::BadProposalSignature);
    }

    let sig = ctx.wallet.sign_bytes(id.as_bytes());
    session.send(FlowMessage::Countersign { id, sig })?;

    await_finality(ctx, session, id).await
}
