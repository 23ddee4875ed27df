mod acceptor;
mod agreement;
mod context;
mod error;
mod initiator;
mod messages;
mod session;

pub use acceptor::accept;
pub use agreement::{accept_agreement, propose_agreement, AgreementRequest};
pub use context::FlowContext;
pub use error::FlowError;
pub use initiator::{initiate, TransferRequest};
pub use messages::FlowMessage;
pub use session::{FlowSession, Phase};

#[cfg(test)]
mod test;
