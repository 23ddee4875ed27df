use super::{FlowError, FlowMessage};
use crate::config::FlowOptions;
use rand::Rng;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

// Progress through a protocol attempt. Each session owns its own phase;
// there is no cross-session progress state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Generating,
    Verifying,
    Signing,
    GatheringSignature,
    Finalizing,
    Reviewing,
    AwaitingFinality,
    Finalized,
    Aborted,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Phase::Generating => {
                write!(f, "Generating transaction based on new account transaction value.")
            }
            Phase::Verifying => write!(f, "Verifying contract constraints."),
            Phase::Signing => write!(f, "Signing transaction with our private key."),
            Phase::GatheringSignature => write!(f, "Gathering the counterparty's signature."),
            Phase::Finalizing => {
                write!(f, "Obtaining notary signature and recording transaction.")
            }
            Phase::Reviewing => write!(f, "Reviewing the incoming proposal."),
            Phase::AwaitingFinality => write!(f, "Waiting for the finalized transaction."),
            Phase::Finalized => write!(f, "Transaction finalized."),
            Phase::Aborted => write!(f, "Session aborted."),
        }
    }
}

// One endpoint of a protocol attempt. Everything a flow needs to talk to
// its counterparty: a duplex message channel, the attempt's timeouts and
// the observable phase.
pub struct FlowSession {
    id: u64,
    sender: mpsc::UnboundedSender<FlowMessage>,
    receiver: mpsc::UnboundedReceiver<FlowMessage>,
    opts: FlowOptions,
    phase: Phase,
}

impl FlowSession {
    // Two connected endpoints, one per party.
    pub fn pair(opts: FlowOptions) -> (FlowSession, FlowSession) {
        let id = rand::thread_rng().gen::<u64>();
        let (initiator_send, acceptor_recv) = mpsc::unbounded_channel();
        let (acceptor_send, initiator_recv) = mpsc::unbounded_channel();
        (
            FlowSession {
                id,
                sender: initiator_send,
                receiver: initiator_recv,
                opts: opts.clone(),
                phase: Phase::Generating,
            },
            FlowSession {
                id,
                sender: acceptor_send,
                receiver: acceptor_recv,
                opts,
                phase: Phase::Reviewing,
            },
        )
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn options(&self) -> &FlowOptions {
        &self.opts
    }

    pub fn advance(&mut self, phase: Phase) {
        self.phase = phase;
        log::info!("[session {:016x}] {}", self.id, phase);
    }

    pub fn send(&self, msg: FlowMessage) -> Result<(), FlowError> {
        log::debug!("[session {:016x}] sending {}", self.id, msg.label());
        self.sender.send(msg).map_err(|_| FlowError::ChannelClosed)
    }

    // Blocks until the counterparty answers. Expiry is a timeout failure,
    // distinct from an explicit rejection.
    pub async fn recv(&mut self, wait: Duration) -> Result<FlowMessage, FlowError> {
        match timeout(wait, self.receiver.recv()).await {
            Err(_) => Err(FlowError::Timeout),
            Ok(None) => Err(FlowError::ChannelClosed),
            Ok(Some(msg)) => {
                log::debug!("[session {:016x}] received {}", self.id, msg.label());
                Ok(msg)
            }
        }
    }
}
