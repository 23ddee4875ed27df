use crate::core::Amount;
use std::time::Duration;

// Contract-level floors. Checked by the transition verifier.
pub const MINIMUM_DEPOSIT: Amount = Amount(500.0);
pub const MINIMUM_REMAINING_BALANCE: Amount = Amount(100.0);

// Flow-level floor applied by the initiator before a proposal is even
// built. Lower than MINIMUM_DEPOSIT; the two checks are independent.
pub const INITIATOR_DEPOSIT_FLOOR: Amount = Amount(50.0);

// The acceptor's local policy cap on the resulting balance.
pub const ACCEPTOR_BALANCE_CAP: Amount = Amount(100.0);

#[derive(Debug, Clone)]
pub struct FlowOptions {
    // How long a party waits for the counterparty's countersignature or
    // rejection.
    pub collect_timeout: Duration,
    // How long the acceptor waits for the finalized transaction.
    pub finality_timeout: Duration,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            collect_timeout: Duration::from_secs(30),
            finality_timeout: Duration::from_secs(60),
        }
    }
}

pub fn get_test_flow_options() -> FlowOptions {
    FlowOptions {
        collect_timeout: Duration::from_millis(100),
        finality_timeout: Duration::from_millis(200),
    }
}
