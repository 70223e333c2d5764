use thiserror::Error;

use crate::client::ClientError;
use crate::models::{BlockDetails, Receipt};

/// Why an async operation failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Invalid selection: index {index} out of range for {len} transactions")]
    InvalidSelection { index: usize, len: usize },
}

/// Lifecycle of one async operation, kept per operation so the UI can tell
/// "no data yet" from "loading" from "last fetch failed"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    InFlight,
    Failed(FetchError),
}

impl FetchStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, FetchStatus::InFlight)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// The single view-state record. The controller is its only writer; the
/// renderer is a pure function of it.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Most recently fetched chain tip, unset until the first fetch lands
    pub latest_block_number: Option<u64>,
    /// Details of the latest block; replaced wholesale, never merged
    pub block: Option<BlockDetails>,
    /// Whether the transaction list is rendered
    pub transactions_visible: bool,
    /// Cursor position in the transaction list
    pub cursor: usize,
    /// Receipt of the last selected transaction; overwritten on each selection
    pub receipt: Option<Receipt>,
    /// Address/ENS input, mutated per keystroke, never validated locally
    pub address_query: String,
    /// Wei balance string, empty until the first successful lookup
    pub balance: String,
    /// Set when a lookup fails, cleared by the next success
    pub address_not_found: bool,
    /// Whether keystrokes go to the address input
    pub address_input_active: bool,

    pub block_number_status: FetchStatus,
    pub block_status: FetchStatus,
    pub receipt_status: FetchStatus,
    pub balance_status: FetchStatus,
}
