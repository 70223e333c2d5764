//! End-to-end controller flows driven through the public API with a
//! scripted chain client.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ethers::types::U256;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;

use blockpeek::models::{BlockDetails, Receipt};
use blockpeek::{Action, App, ChainClient, ClientError, FetchOutcome};

#[derive(Default)]
struct ScriptedChain {
    block_numbers: Mutex<VecDeque<Result<u64, ClientError>>>,
    blocks: Mutex<VecDeque<Result<BlockDetails, ClientError>>>,
    receipts: Mutex<VecDeque<Result<Receipt, ClientError>>>,
    balances: Mutex<VecDeque<Result<U256, ClientError>>>,
}

fn unscripted<T>() -> Result<T, ClientError> {
    Err(ClientError::Network("unscripted call".to_string()))
}

#[async_trait]
impl ChainClient for ScriptedChain {
    async fn get_latest_block_number(&self) -> Result<u64, ClientError> {
        self.block_numbers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn get_block(&self, _number: u64) -> Result<BlockDetails, ClientError> {
        self.blocks.lock().unwrap().pop_front().unwrap_or_else(unscripted)
    }

    async fn get_transaction_receipt(&self, _hash: &str) -> Result<Receipt, ClientError> {
        self.receipts.lock().unwrap().pop_front().unwrap_or_else(unscripted)
    }

    async fn get_balance(&self, _address_or_name: &str) -> Result<U256, ClientError> {
        self.balances.lock().unwrap().pop_front().unwrap_or_else(unscripted)
    }
}

fn new_app(chain: Arc<ScriptedChain>) -> (App, UnboundedReceiver<FetchOutcome>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (App::new(chain, tx, CancellationToken::new()), rx)
}

async fn pump(app: &mut App, rx: &mut UnboundedReceiver<FetchOutcome>) {
    let outcome = rx.recv().await.expect("expected a fetch outcome");
    app.apply_outcome(outcome);
}

#[tokio::test]
async fn mount_toggle_select_scenario() {
    let chain = Arc::new(ScriptedChain::default());
    chain.block_numbers.lock().unwrap().push_back(Ok(100));

    let mut block = BlockDetails::dummy(100);
    block.parent_hash = "0xabc".to_string();
    block.transactions = vec!["0x1".to_string(), "0x2".to_string()];
    chain.blocks.lock().unwrap().push_back(Ok(block));

    chain.receipts.lock().unwrap().push_back(Ok(Receipt {
        transaction_hash: "0x2".to_string(),
        from: "0xA".to_string(),
        to: Some("0xB".to_string()),
        confirmations: 5,
    }));

    let (mut app, mut rx) = new_app(chain);
    app.start();
    pump(&mut app, &mut rx).await; // latest block number
    pump(&mut app, &mut rx).await; // block details

    let details = app.state().block.as_ref().unwrap();
    assert_eq!(app.state().latest_block_number, Some(100));
    assert_eq!(details.number, 100);
    assert_eq!(details.parent_hash, "0xabc");
    assert_eq!(details.transactions, vec!["0x1".to_string(), "0x2".to_string()]);

    // Transactions are hidden until toggled
    assert!(!app.state().transactions_visible);
    app.handle_action(Action::ToggleTransactions);
    assert!(app.state().transactions_visible);

    app.handle_action(Action::SelectTransaction(1));
    pump(&mut app, &mut rx).await;

    let receipt = app.state().receipt.as_ref().unwrap();
    assert_eq!(receipt.transaction_hash, "0x2");
    assert_eq!(receipt.from, "0xA");
    assert_eq!(receipt.to.as_deref(), Some("0xB"));
    assert_eq!(receipt.confirmations, 5);
}

#[tokio::test]
async fn invalid_address_balance_scenario() {
    let chain = Arc::new(ScriptedChain::default());
    chain
        .balances
        .lock()
        .unwrap()
        .push_back(Err(ClientError::InvalidAddress("not-an-address".to_string())));

    let (mut app, mut rx) = new_app(chain);
    app.handle_action(Action::EnterAddressMode);
    for c in "not-an-address".chars() {
        app.handle_action(Action::AddressInput(c));
    }
    assert_eq!(app.state().address_query, "not-an-address");

    app.handle_action(Action::LookupBalance);
    pump(&mut app, &mut rx).await;

    assert!(app.state().address_not_found);
    assert_eq!(app.state().balance, "");
}

#[tokio::test]
async fn timed_out_lookup_surfaces_distinct_error() {
    let chain = Arc::new(ScriptedChain::default());
    chain
        .balances
        .lock()
        .unwrap()
        .push_back(Err(ClientError::Timeout(10_000)));

    let (mut app, mut rx) = new_app(chain);
    app.handle_action(Action::AddressInput('x'));
    app.handle_action(Action::LookupBalance);
    pump(&mut app, &mut rx).await;

    let error = app.state().balance_status.error().expect("error status");
    assert!(error.to_string().contains("timed out"));
    assert!(app.state().address_not_found);
}
