use super::*;
use crate::config;
use crate::contract::{self, ContractError};
use crate::core::{
    AccountState, Amount, AttachmentId, Command, FinalizedTx, Proposal, SignedProposal, StateData,
};
use crate::notary::{Finality, MemoryNotary, NotaryDiscovery};
use crate::vault::{RamVault, Vault};
use crate::wallet::Wallet;
use std::sync::Arc;
use std::time::Duration;

type TestContext = FlowContext<RamVault, Arc<MemoryNotary>>;

fn test_network() -> (TestContext, TestContext) {
    let _ = env_logger::builder().is_test(true).try_init();
    let notary = Arc::new(MemoryNotary::new(Wallet::new("Notary", b"NOTARY")));
    let bank = FlowContext::new(
        Wallet::new("MiniCorp", b"BANK"),
        RamVault::new(),
        Arc::clone(&notary),
    );
    let holder = FlowContext::new(
        Wallet::new("MegaCorp", b"HOLDER"),
        RamVault::new(),
        notary,
    );
    (bank, holder)
}

fn sessions() -> (FlowSession, FlowSession) {
    FlowSession::pair(config::get_test_flow_options())
}

// Issue an account by a jointly-signed Create transition, recorded to both
// vaults. Issuance is non-interactive; only deposits and withdrawals go
// through the proposal protocol.
async fn issue_account(bank: &TestContext, holder: &TestContext, balance: f64) -> FinalizedTx {
    let account = AccountState::new(Amount(balance), bank.party(), holder.party());
    let tx = Proposal {
        input: None,
        outputs: vec![StateData::Account(account)],
        command: Command::Create,
        signers: vec![bank.party().pub_key, holder.party().pub_key],
        notary: bank.notary.default_notary().unwrap(),
        attachment: None,
    };
    contract::verify(&tx).unwrap();
    let mut stx = SignedProposal::new(tx);
    bank.wallet.sign(&mut stx);
    holder.wallet.sign(&mut stx);
    let notary_sig = bank.notary.notarize(&stx).await.unwrap();
    let ftx = FinalizedTx { tx: stx, notary_sig };
    bank.vault.write().await.record(&ftx).unwrap();
    holder.vault.write().await.record(&ftx).unwrap();
    ftx
}

async fn head_balance(ctx: &TestContext) -> Amount {
    let heads = ctx.vault.read().await.unconsumed().unwrap();
    heads
        .iter()
        .filter_map(|sr| sr.state.as_account())
        .map(|acc| acc.balance)
        .next()
        .unwrap()
}

fn deposit(amount: f64, counterparty: &TestContext) -> TransferRequest {
    TransferRequest {
        is_deposit: true,
        amount: Amount(amount),
        counterparty: counterparty.party(),
    }
}

fn withdraw(amount: f64, counterparty: &TestContext) -> TransferRequest {
    TransferRequest {
        is_deposit: false,
        amount: Amount(amount),
        counterparty: counterparty.party(),
    }
}

#[tokio::test]
async fn test_flow_rejects_negative_amounts() {
    let (bank, holder) = test_network();
    let (mut sa, _sb) = sessions();

    // The vault is empty: a negative amount must be refused before the
    // vault is even consulted, or this would be StateNotFound.
    let res = initiate(&bank, &mut sa, deposit(-500.0, &holder)).await;
    assert!(matches!(res, Err(FlowError::InvalidAmount)));
    assert_eq!(sa.phase(), Phase::Aborted);
}

#[tokio::test]
async fn test_withdrawal_to_minimum_balance_finalizes() {
    let (bank, holder) = test_network();
    issue_account(&bank, &holder, 600.0).await;
    let (mut sa, mut sb) = sessions();

    let (initiated, accepted) = tokio::join!(
        initiate(&bank, &mut sa, withdraw(500.0, &holder)),
        accept(&holder, &mut sb)
    );
    let ftx = initiated.unwrap();
    assert_eq!(accepted.unwrap().id(), ftx.id());
    assert!(ftx.verify_notary());

    assert_eq!(sa.phase(), Phase::Finalized);
    assert_eq!(sb.phase(), Phase::Finalized);
    assert_eq!(head_balance(&bank).await, Amount(100.0));
    assert_eq!(head_balance(&holder).await, Amount(100.0));
}

#[tokio::test]
async fn test_deposit_of_exactly_500_finalizes() {
    let (bank, holder) = test_network();
    // Issuance enforces no invariants, so an overdrawn account can exist;
    // a 500 deposit then lands exactly on the acceptor's cap.
    issue_account(&bank, &holder, -400.0).await;
    let before = head_balance(&bank).await;
    let (mut sa, mut sb) = sessions();

    let (initiated, accepted) = tokio::join!(
        initiate(&bank, &mut sa, deposit(500.0, &holder)),
        accept(&holder, &mut sb)
    );
    initiated.unwrap();
    accepted.unwrap();

    assert_eq!(head_balance(&bank).await, before + Amount(500.0));
    assert_eq!(head_balance(&holder).await, Amount(100.0));
}

#[tokio::test]
async fn test_deposit_is_rejected_by_counterparty_policy() {
    let (bank, holder) = test_network();
    issue_account(&bank, &holder, 1000.0).await;
    let (mut sa, mut sb) = sessions();

    let (initiated, accepted) = tokio::join!(
        initiate(&bank, &mut sa, deposit(500.0, &holder)),
        accept(&holder, &mut sb)
    );
    match initiated {
        Err(FlowError::Rejected(reason)) => {
            assert_eq!(
                reason,
                "I won't accept account transactions with a value over 100."
            );
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(matches!(accepted, Err(FlowError::PolicyRejection(_))));

    // Nothing moved on either side.
    assert_eq!(head_balance(&bank).await, Amount(1000.0));
    assert_eq!(head_balance(&holder).await, Amount(1000.0));
    assert_eq!(sa.phase(), Phase::Aborted);
    assert_eq!(sb.phase(), Phase::Aborted);
}

#[tokio::test]
async fn test_small_deposits_fail_before_a_proposal_is_built() {
    let (bank, holder) = test_network();
    issue_account(&bank, &holder, 1000.0).await;
    let (mut sa, mut sb) = sessions();

    let res = initiate(&bank, &mut sa, deposit(40.0, &holder)).await;
    assert!(matches!(res, Err(FlowError::DepositBelowFloor)));

    // The counterparty never heard about the attempt.
    assert!(matches!(
        sb.recv(Duration::from_millis(20)).await,
        Err(FlowError::Timeout)
    ));
}

#[tokio::test]
async fn test_deposit_below_contract_minimum_aborts_in_verification() {
    let (bank, holder) = test_network();
    issue_account(&bank, &holder, 1000.0).await;
    let (mut sa, mut sb) = sessions();

    // 100 passes the initiator's floor of 50 but violates the contract's
    // 500 minimum: the attempt dies locally, before any message is sent.
    let res = initiate(&bank, &mut sa, deposit(100.0, &holder)).await;
    assert!(matches!(
        res,
        Err(FlowError::Contract(ContractError::MinimumDeposit))
    ));
    assert!(matches!(
        sb.recv(Duration::from_millis(20)).await,
        Err(FlowError::Timeout)
    ));
    assert_eq!(head_balance(&bank).await, Amount(1000.0));
}

#[tokio::test]
async fn test_withdrawal_cannot_exceed_the_balance() {
    let (bank, holder) = test_network();
    issue_account(&bank, &holder, 1000.0).await;
    let (mut sa, _sb) = sessions();

    let res = initiate(&bank, &mut sa, withdraw(2000.0, &holder)).await;
    assert!(matches!(res, Err(FlowError::WithdrawalExceedsBalance)));
}

#[tokio::test]
async fn test_missing_account_fails_fast() {
    let (bank, holder) = test_network();
    let (mut sa, _sb) = sessions();

    let res = initiate(&bank, &mut sa, withdraw(100.0, &holder)).await;
    assert!(matches!(res, Err(FlowError::StateNotFound)));
}

#[tokio::test]
async fn test_ambiguous_accounts_fail_fast() {
    let (bank, holder) = test_network();
    issue_account(&bank, &holder, 600.0).await;
    issue_account(&bank, &holder, 700.0).await;
    let (mut sa, _sb) = sessions();

    let res = initiate(&bank, &mut sa, withdraw(100.0, &holder)).await;
    assert!(matches!(res, Err(FlowError::AmbiguousState)));
}

#[tokio::test]
async fn test_conflicting_transition_aborts_both_sides() {
    let (bank, holder) = test_network();
    issue_account(&bank, &holder, 600.0).await;

    // A competing, fully-signed transition consumes the head behind the
    // protocol's back.
    let head = bank.vault.read().await.unconsumed().unwrap()[0].clone();
    let competing = Proposal {
        outputs: vec![StateData::Account(
            head.state.as_account().unwrap().successor(Amount(150.0)),
        )],
        input: Some(head),
        command: Command::Withdraw,
        signers: vec![bank.party().pub_key, holder.party().pub_key],
        notary: bank.notary.default_notary().unwrap(),
        attachment: None,
    };
    let mut competing = SignedProposal::new(competing);
    bank.wallet.sign(&mut competing);
    holder.wallet.sign(&mut competing);
    bank.notary.notarize(&competing).await.unwrap();

    let (mut sa, mut sb) = sessions();
    let (initiated, accepted) = tokio::join!(
        initiate(&bank, &mut sa, withdraw(500.0, &holder)),
        accept(&holder, &mut sb)
    );
    assert!(matches!(initiated, Err(FlowError::Conflict)));
    assert!(matches!(accepted, Err(FlowError::Conflict)));

    // The losing attempt recorded nothing.
    assert_eq!(head_balance(&bank).await, Amount(600.0));
    assert_eq!(head_balance(&holder).await, Amount(600.0));
}

#[tokio::test]
async fn test_timeout_when_counterparty_is_silent() {
    let (bank, holder) = test_network();
    issue_account(&bank, &holder, 600.0).await;
    let (mut sa, _sb) = sessions();

    // The acceptor never runs; _sb just keeps the channel open.
    let res = initiate(&bank, &mut sa, withdraw(500.0, &holder)).await;
    assert!(matches!(res, Err(FlowError::Timeout)));
    assert_eq!(sa.phase(), Phase::Aborted);
}

#[tokio::test]
async fn test_unexpected_message_is_a_protocol_error() {
    let (bank, holder) = test_network();
    let ftx = issue_account(&bank, &holder, 600.0).await;
    let (sa, mut sb) = sessions();

    sa.send(FlowMessage::Conflict {
        id: ftx.id(),
        reason: "out of order".into(),
    })
    .unwrap();
    let res = accept(&holder, &mut sb).await;
    assert!(matches!(res, Err(FlowError::Protocol(_))));
}

#[tokio::test]
async fn test_countersignature_from_the_wrong_key_is_refused() {
    let (bank, holder) = test_network();
    issue_account(&bank, &holder, 600.0).await;
    let (mut sa, mut sb) = sessions();
    let mallory = Wallet::new("Mallory", b"MALLORY");

    let counterfeit = async {
        if let FlowMessage::Propose(stx) = sb.recv(Duration::from_millis(100)).await.unwrap() {
            let id = stx.id();
            sb.send(FlowMessage::Countersign {
                id,
                sig: mallory.sign_bytes(id.as_bytes()),
            })
            .unwrap();
        }
    };
    let (initiated, _) = tokio::join!(
        initiate(&bank, &mut sa, withdraw(500.0, &holder)),
        counterfeit
    );
    assert!(matches!(initiated, Err(FlowError::BadCountersignature(_))));
}

#[tokio::test]
async fn test_countersignature_for_another_transaction_is_refused() {
    let (bank, holder) = test_network();
    let issued = issue_account(&bank, &holder, 600.0).await;
    let (mut sa, mut sb) = sessions();

    let wrong_id = async {
        if let FlowMessage::Propose(_) = sb.recv(Duration::from_millis(100)).await.unwrap() {
            let id = issued.id();
            sb.send(FlowMessage::Countersign {
                id,
                sig: holder.wallet.sign_bytes(id.as_bytes()),
            })
            .unwrap();
        }
    };
    let (initiated, _) = tokio::join!(
        initiate(&bank, &mut sa, withdraw(500.0, &holder)),
        wrong_id
    );
    assert!(matches!(initiated, Err(FlowError::Protocol(_))));
}

#[tokio::test]
async fn test_finalized_transaction_must_match_the_countersigned_id() {
    let (bank, holder) = test_network();
    let issued = issue_account(&bank, &holder, 600.0).await;
    let (mut sa, mut sb) = sessions();

    let initiator = async {
        let head = bank.vault.read().await.unconsumed().unwrap()[0].clone();
        let tx = Proposal {
            outputs: vec![StateData::Account(
                head.state.as_account().unwrap().successor(Amount(100.0)),
            )],
            input: Some(head),
            command: Command::Withdraw,
            signers: vec![bank.party().pub_key, holder.party().pub_key],
            notary: bank.notary.default_notary().unwrap(),
            attachment: None,
        };
        let mut stx = SignedProposal::new(tx);
        bank.wallet.sign(&mut stx);
        sa.send(FlowMessage::Propose(stx)).unwrap();
        sa.recv(Duration::from_millis(100)).await.unwrap();
        // Deliver a different (but genuinely notarized) transaction.
        sa.send(FlowMessage::Finalized(issued.clone())).unwrap();
    };
    let (_, accepted) = tokio::join!(initiator, accept(&holder, &mut sb));
    assert!(matches!(accepted, Err(FlowError::Protocol(_))));
}

#[tokio::test]
async fn test_agreement_round_trip() {
    let (bank, holder) = test_network();
    let (mut sa, mut sb) = sessions();

    let req = AgreementRequest {
        text: "MiniCorp agrees with MegaCorp".into(),
        attachment: AttachmentId::of(b"scanned contract"),
        counterparty: holder.party(),
    };
    let (proposed, agreed) = tokio::join!(
        propose_agreement(&bank, &mut sa, req),
        accept_agreement(&holder, &mut sb)
    );
    let ftx = proposed.unwrap();
    assert_eq!(agreed.unwrap().id(), ftx.id());

    let heads = holder.vault.read().await.unconsumed().unwrap();
    let agreement = heads[0].state.as_agreement().unwrap();
    assert_eq!(agreement.text, "MiniCorp agrees with MegaCorp");
    assert_eq!(sa.phase(), Phase::Finalized);
    assert_eq!(sb.phase(), Phase::Finalized);
}

#[tokio::test]
async fn test_agreement_acceptor_requires_an_agreement_output() {
    let (bank, holder) = test_network();
    let (sa, mut sb) = sessions();

    // An account transaction pushed at the agreement acceptor.
    let tx = Proposal {
        input: None,
        outputs: vec![StateData::Account(AccountState::new(
            Amount(1000.0),
            bank.party(),
            holder.party(),
        ))],
        command: Command::Create,
        signers: vec![bank.party().pub_key, holder.party().pub_key],
        notary: bank.notary.default_notary().unwrap(),
        attachment: None,
    };
    let mut stx = SignedProposal::new(tx);
    bank.wallet.sign(&mut stx);
    sa.send(FlowMessage::Propose(stx)).unwrap();

    let res = accept_agreement(&holder, &mut sb).await;
    assert!(matches!(res, Err(FlowError::TypeMismatch)));
    assert_eq!(sb.phase(), Phase::Aborted);
}

#[tokio::test]
async fn test_acceptor_refuses_invalidly_signed_proposals() {
    let (bank, holder) = test_network();
    issue_account(&bank, &holder, 600.0).await;
    let (sa, mut sb) = sessions();

    let head = bank.vault.read().await.unconsumed().unwrap()[0].clone();
    let tx = Proposal {
        outputs: vec![StateData::Account(
            head.state.as_account().unwrap().successor(Amount(100.0)),
        )],
        input: Some(head),
        command: Command::Withdraw,
        signers: vec![bank.party().pub_key, holder.party().pub_key],
        notary: bank.notary.default_notary().unwrap(),
        attachment: None,
    };
    let mut stx = SignedProposal::new(tx);
    // A signature lifted from a different transaction does not verify
    // against this id.
    let mallory_sig = bank.wallet.sign_bytes(b"something else entirely");
    stx.add_signature(bank.party().pub_key, mallory_sig);
    sa.send(FlowMessage::Propose(stx)).unwrap();

    let res = accept(&holder, &mut sb).await;
    assert!(matches!(res, Err(FlowError::BadProposalSignature)));
}
