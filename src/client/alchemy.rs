use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider, ProviderError};
use ethers::types::{Address, BlockNumber, NameOrAddress, H256, U256};
use tokio::time::timeout;
use tracing::debug;

use super::{ChainClient, ClientError};
use crate::config::Config;
use crate::models::{BlockDetails, Receipt};

/// Chain data client backed by an Alchemy (or compatible) HTTP endpoint
pub struct AlchemyClient {
    provider: Provider<Http>,
    request_timeout: Duration,
}

impl AlchemyClient {
    pub fn new(config: &Config) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.provider_url.as_str())
            .context("Failed to create HTTP provider")?;

        Ok(Self {
            provider,
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    /// Bound every provider call; a hung request must not leave the view
    /// stuck in a loading state forever.
    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        let ms = self.request_timeout.as_millis() as u64;
        timeout(self.request_timeout, fut)
            .await
            .unwrap_or(Err(ClientError::Timeout(ms)))
    }
}

fn network_error(e: ProviderError) -> ClientError {
    ClientError::Network(e.to_string())
}

fn balance_error(e: ProviderError) -> ClientError {
    match e {
        ProviderError::EnsError(name) | ProviderError::EnsNotOwned(name) => {
            ClientError::InvalidAddress(name)
        }
        other => ClientError::Network(other.to_string()),
    }
}

/// Convert an ethers block (hashes only) to our model
fn convert_block(eth_block: ethers::types::Block<H256>, number: u64) -> Result<BlockDetails, ClientError> {
    let block_number = eth_block
        .number
        .ok_or_else(|| ClientError::NotFound(format!("block {} is still pending", number)))?
        .as_u64();

    let transactions = eth_block
        .transactions
        .into_iter()
        .map(|tx_hash| format!("{:?}", tx_hash))
        .collect();

    Ok(BlockDetails {
        number: block_number,
        hash: format!("{:?}", eth_block.hash.unwrap_or_default()),
        parent_hash: format!("{:?}", eth_block.parent_hash),
        timestamp: eth_block.timestamp.as_u64(),
        gas_used: eth_block.gas_used.as_u64(),
        gas_limit: eth_block.gas_limit.as_u64(),
        miner: format!("{:?}", eth_block.author.unwrap_or_default()),
        transactions,
    })
}

#[async_trait]
impl ChainClient for AlchemyClient {
    async fn get_latest_block_number(&self) -> Result<u64, ClientError> {
        self.with_timeout(async {
            let number = self
                .provider
                .get_block_number()
                .await
                .map_err(network_error)?;
            Ok(number.as_u64())
        })
        .await
    }

    async fn get_block(&self, number: u64) -> Result<BlockDetails, ClientError> {
        debug!("Fetching block {}", number);
        self.with_timeout(async {
            let block = self
                .provider
                .get_block(BlockNumber::Number(number.into()))
                .await
                .map_err(network_error)?
                .ok_or_else(|| ClientError::NotFound(format!("block {}", number)))?;
            convert_block(block, number)
        })
        .await
    }

    async fn get_transaction_receipt(&self, hash: &str) -> Result<Receipt, ClientError> {
        debug!("Fetching receipt for {}", hash);
        let tx_hash: H256 = hash
            .parse()
            .map_err(|_| ClientError::NotFound(format!("malformed transaction hash {}", hash)))?;

        self.with_timeout(async {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(network_error)?
                .ok_or_else(|| ClientError::NotFound(format!("transaction {}", hash)))?;

            // Receipts don't carry a confirmation count; derive it from the chain tip
            let latest = self
                .provider
                .get_block_number()
                .await
                .map_err(network_error)?
                .as_u64();
            let confirmations = receipt
                .block_number
                .map(|n| latest.saturating_sub(n.as_u64()) + 1)
                .unwrap_or(0);

            Ok(Receipt {
                transaction_hash: format!("{:?}", receipt.transaction_hash),
                from: format!("{:?}", receipt.from),
                to: receipt.to.map(|addr| format!("{:?}", addr)),
                confirmations,
            })
        })
        .await
    }

    async fn get_balance(&self, address_or_name: &str) -> Result<U256, ClientError> {
        debug!("Fetching balance for {}", address_or_name);
        let who = match address_or_name.parse::<Address>() {
            Ok(addr) => NameOrAddress::Address(addr),
            // Not a hex address: let the provider resolve it as an ENS name
            Err(_) => NameOrAddress::Name(address_or_name.to_string()),
        };

        self.with_timeout(async { self.provider.get_balance(who, None).await.map_err(balance_error) })
            .await
    }
}
