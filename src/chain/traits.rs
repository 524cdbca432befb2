//! Trait seams for the chain client capabilities.
//!
//! The service layer depends only on these traits; the alloy-backed
//! implementations live in [`crate::chain::rpc`]. Tests substitute scripted
//! fakes or mocks.

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::Result;

/// One contract call in a batched read.
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub to: Address,
    pub method: String,
    pub args: Vec<DynSolValue>,
    /// Return tuple type the response is decoded against.
    pub returns: DynSolType,
}

impl ContractCall {
    pub fn new(to: Address, method: &str, args: Vec<DynSolValue>, returns: DynSolType) -> Self {
        Self {
            to,
            method: method.to_string(),
            args,
            returns,
        }
    }
}

/// A raw event log entry. `log_index` breaks ordering ties within a block.
#[derive(Debug, Clone)]
pub struct ChainLog {
    pub address: Address,
    pub block_number: u64,
    pub log_index: u64,
    pub tx_hash: B256,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Receipt of a mined transaction. `success: false` means the transaction
/// was mined but reverted.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub success: bool,
    pub block_number: Option<u64>,
}

/// Read-only chain capability: single calls, batched calls, event logs and
/// balance queries.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Issue one eth_call and decode the return data against `returns`.
    async fn call(
        &self,
        to: Address,
        method: &str,
        args: Vec<DynSolValue>,
        returns: &DynSolType,
    ) -> Result<DynSolValue>;

    /// Issue a batch of calls in one round trip.
    ///
    /// The i-th output MUST decode the i-th input; callers re-associate
    /// identifiers to structs by position.
    async fn multicall(&self, calls: Vec<ContractCall>) -> Result<Vec<DynSolValue>>;

    /// Fetch raw logs for one event signature from `from_block` to latest.
    async fn logs(
        &self,
        address: Address,
        event_signature: &str,
        from_block: u64,
    ) -> Result<Vec<ChainLog>>;

    /// Native-coin balance of an address.
    async fn native_balance(&self, address: Address) -> Result<U256>;

    /// ERC-20 balance of `holder` for `token`.
    async fn token_balance(&self, token: Address, holder: Address) -> Result<U256>;
}

/// Transaction-submitting capability bound to one account.
///
/// `submit` signs, sends, and waits for the transaction to be mined; a
/// mined-but-reverted transaction is an Ok receipt with `success: false`,
/// while transport failures are errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WalletClient: Send + Sync {
    fn account(&self) -> Address;

    async fn submit(
        &self,
        to: Address,
        method: &str,
        args: Vec<DynSolValue>,
    ) -> Result<TxReceipt>;
}
