mod alchemy;
mod error;

pub use alchemy::AlchemyClient;
pub use error::ClientError;

use async_trait::async_trait;
use ethers::types::U256;

use crate::models::{BlockDetails, Receipt};

/// Read-only access to chain data, abstracted over the provider so the
/// controller can be driven by a mock in tests.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Block number of the most recently mined block
    async fn get_latest_block_number(&self) -> Result<u64, ClientError>;

    /// Block summary (transaction hashes only) for a block number
    async fn get_block(&self, number: u64) -> Result<BlockDetails, ClientError>;

    /// Receipt for a transaction hash, with a derived confirmation count
    async fn get_transaction_receipt(&self, hash: &str) -> Result<Receipt, ClientError>;

    /// Balance in wei for an address or ENS name
    async fn get_balance(&self, address_or_name: &str) -> Result<U256, ClientError>;
}
