pub mod config;
pub mod contract;
pub mod core;
pub mod crypto;
pub mod flow;
pub mod notary;
pub mod vault;
pub mod wallet;
