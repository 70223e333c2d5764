//! blockpeek - terminal Ethereum block explorer
//!
//! Shows the most recently mined block, its transaction hashes, a selected
//! transaction's receipt, and address/ENS balances, all fetched on demand
//! from an Alchemy HTTP endpoint.

pub mod app;
pub mod client;
pub mod config;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use app::{Action, App, FetchKind, FetchOutcome, FetchResult, FetchStatus, ViewState};
pub use client::{AlchemyClient, ChainClient, ClientError};
pub use config::Config;
