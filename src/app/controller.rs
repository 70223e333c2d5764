use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use ethers::types::U256;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Action, FetchError, FetchStatus, ViewState};
use crate::client::{ChainClient, ClientError};
use crate::models::{BlockDetails, Receipt};

/// The four kinds of outgoing calls, each with its own sequence counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    BlockNumber,
    Block,
    Receipt,
    Balance,
}

#[derive(Debug)]
pub enum FetchResult {
    BlockNumber(Result<u64, ClientError>),
    Block(Result<BlockDetails, ClientError>),
    Receipt(Result<Receipt, ClientError>),
    Balance(Result<U256, ClientError>),
}

/// Completion message sent back to the controller by a fetch task
#[derive(Debug)]
pub struct FetchOutcome {
    pub kind: FetchKind,
    pub seq: u64,
    pub result: FetchResult,
}

/// View-state controller and single writer of [`ViewState`].
///
/// Every outgoing call is tagged with a monotonically increasing sequence
/// number per call kind. An outcome whose sequence number is no longer the
/// latest issued for its kind is discarded, so overlapping calls of the same
/// kind resolve last-issued-wins rather than last-response-wins.
pub struct App {
    state: ViewState,
    client: Arc<dyn ChainClient>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    latest_seq: HashMap<FetchKind, u64>,
    shutdown: CancellationToken,
    should_quit: bool,
}

impl App {
    pub fn new(
        client: Arc<dyn ChainClient>,
        outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            state: ViewState::default(),
            client,
            outcome_tx,
            latest_seq: HashMap::new(),
            shutdown,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Initial fetch, the equivalent of the mount-time block number request
    pub fn start(&mut self) {
        info!("Requesting initial block number");
        self.spawn_block_number_fetch();
    }

    pub fn handle_action(&mut self, action: Action) {
        debug!("Handling action: {:?}", action);
        match action {
            Action::Refresh => self.spawn_block_number_fetch(),
            Action::ToggleTransactions => {
                self.state.transactions_visible = !self.state.transactions_visible;
            }
            Action::SelectTransaction(index) => self.select_transaction(index),
            Action::CursorUp => {
                self.state.cursor = self.state.cursor.saturating_sub(1);
            }
            Action::CursorDown => {
                if let Some(block) = &self.state.block {
                    if self.state.cursor + 1 < block.transactions.len() {
                        self.state.cursor += 1;
                    }
                }
            }
            Action::EnterAddressMode => self.state.address_input_active = true,
            Action::LeaveAddressMode => self.state.address_input_active = false,
            Action::AddressInput(c) => self.state.address_query.push(c),
            Action::AddressBackspace => {
                self.state.address_query.pop();
            }
            Action::LookupBalance => self.spawn_balance_fetch(),
            Action::Quit => {
                info!("Quit requested");
                self.shutdown.cancel();
                self.should_quit = true;
            }
        }
    }

    /// Resolve the hash against the transaction list as it exists right now;
    /// a bad index is rejected here and never reaches the client.
    fn select_transaction(&mut self, index: usize) {
        let len = self
            .state
            .block
            .as_ref()
            .map(|b| b.transactions.len())
            .unwrap_or(0);

        match self
            .state
            .block
            .as_ref()
            .and_then(|b| b.transactions.get(index))
        {
            Some(hash) => {
                let hash = hash.clone();
                self.spawn_receipt_fetch(hash);
            }
            None => {
                warn!("Selection index {} out of range ({} transactions)", index, len);
                self.state.receipt_status =
                    FetchStatus::Failed(FetchError::InvalidSelection { index, len });
            }
        }
    }

    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if !self.is_current(outcome.kind, outcome.seq) {
            debug!(
                "Discarding stale {:?} outcome (seq {})",
                outcome.kind, outcome.seq
            );
            return;
        }

        match outcome.result {
            FetchResult::BlockNumber(Ok(number)) => {
                self.state.block_number_status = FetchStatus::Idle;
                if self.state.latest_block_number != Some(number) {
                    info!("Latest block number: {}", number);
                    self.state.latest_block_number = Some(number);
                    // Observer: a newly set block number always triggers a block fetch
                    self.spawn_block_fetch(number);
                }
            }
            FetchResult::BlockNumber(Err(e)) => {
                warn!("Block number fetch failed: {}", e);
                self.state.block_number_status = FetchStatus::Failed(e.into());
            }
            FetchResult::Block(Ok(block)) => {
                info!(
                    "Loaded block {} with {} transactions",
                    block.number,
                    block.transactions.len()
                );
                self.state.block_status = FetchStatus::Idle;
                self.state.cursor = self
                    .state
                    .cursor
                    .min(block.transactions.len().saturating_sub(1));
                self.state.block = Some(block);
            }
            FetchResult::Block(Err(e)) => {
                // Previous details stay on screen; the status line marks them stale
                warn!("Block fetch failed: {}", e);
                self.state.block_status = FetchStatus::Failed(e.into());
            }
            FetchResult::Receipt(Ok(receipt)) => {
                self.state.receipt_status = FetchStatus::Idle;
                self.state.receipt = Some(receipt);
            }
            FetchResult::Receipt(Err(e)) => {
                warn!("Receipt fetch failed: {}", e);
                self.state.receipt_status = FetchStatus::Failed(e.into());
            }
            FetchResult::Balance(Ok(wei)) => {
                self.state.balance_status = FetchStatus::Idle;
                self.state.balance = wei.to_string();
                self.state.address_not_found = false;
            }
            FetchResult::Balance(Err(e)) => {
                // BalanceResult keeps its previous value
                warn!("Balance lookup failed: {}", e);
                self.state.address_not_found = true;
                self.state.balance_status = FetchStatus::Failed(e.into());
            }
        }
    }

    fn next_seq(&mut self, kind: FetchKind) -> u64 {
        let seq = self.latest_seq.entry(kind).or_insert(0);
        *seq += 1;
        *seq
    }

    fn is_current(&self, kind: FetchKind, seq: u64) -> bool {
        self.latest_seq.get(&kind) == Some(&seq)
    }

    fn spawn_fetch<F>(&self, kind: FetchKind, seq: u64, fut: F)
    where
        F: Future<Output = FetchResult> + Send + 'static,
    {
        let tx = self.outcome_tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                result = fut => {
                    let _ = tx.send(FetchOutcome { kind, seq, result });
                }
            }
        });
    }

    fn spawn_block_number_fetch(&mut self) {
        let seq = self.next_seq(FetchKind::BlockNumber);
        self.state.block_number_status = FetchStatus::InFlight;
        let client = Arc::clone(&self.client);
        self.spawn_fetch(FetchKind::BlockNumber, seq, async move {
            FetchResult::BlockNumber(client.get_latest_block_number().await)
        });
    }

    fn spawn_block_fetch(&mut self, number: u64) {
        let seq = self.next_seq(FetchKind::Block);
        self.state.block_status = FetchStatus::InFlight;
        let client = Arc::clone(&self.client);
        self.spawn_fetch(FetchKind::Block, seq, async move {
            FetchResult::Block(client.get_block(number).await)
        });
    }

    fn spawn_receipt_fetch(&mut self, hash: String) {
        let seq = self.next_seq(FetchKind::Receipt);
        self.state.receipt_status = FetchStatus::InFlight;
        let client = Arc::clone(&self.client);
        self.spawn_fetch(FetchKind::Receipt, seq, async move {
            FetchResult::Receipt(client.get_transaction_receipt(&hash).await)
        });
    }

    fn spawn_balance_fetch(&mut self) {
        let seq = self.next_seq(FetchKind::Balance);
        self.state.balance_status = FetchStatus::InFlight;
        let query = self.state.address_query.clone();
        let client = Arc::clone(&self.client);
        self.spawn_fetch(FetchKind::Balance, seq, async move {
            FetchResult::Balance(client.get_balance(&query).await)
        });
    }
}
