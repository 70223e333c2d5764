use serde::{Deserialize, Serialize};

/// Block summary with transaction hashes only
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockDetails {
    pub number: u64,
    pub hash: String,
    pub parent_hash: String,
    pub timestamp: u64,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub miner: String,
    pub transactions: Vec<String>,
}

impl BlockDetails {
    // Helper to create a dummy block for testing
    pub fn dummy(number: u64) -> Self {
        Self {
            number,
            hash: format!("0xhash{}", number),
            parent_hash: format!("0xparent{}", number),
            timestamp: 1678912345 + number,
            gas_used: 21000,
            gas_limit: 30000000,
            miner: "0xminer".to_string(),
            transactions: vec![],
        }
    }
}

/// Finalized record of one transaction's execution
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: String,
    pub from: String,
    pub to: Option<String>,
    pub confirmations: u64,
}
