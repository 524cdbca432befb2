//! JSON-RPC backed implementations of [`ChainReader`] and [`WalletClient`].
//!
//! Calls are assembled dynamically: the four byte selector is derived from
//! the method name plus the Solidity type names of the arguments, arguments
//! are ABI encoded as a parameter list, and return data is decoded against
//! the caller supplied [`DynSolType`]. Batched reads go through the
//! canonical Multicall3 deployment.

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{address, keccak256, Address, Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::transports::http::reqwest;
use async_trait::async_trait;
use tracing::{debug, info};

use super::{ChainLog, ChainReader, ContractCall, Result, ServiceError, TxReceipt, WalletClient};

/// Multicall3 lives at the same address on every supported chain.
const MULTICALL3: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

sol! {
    #[sol(rpc)]
    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Result3 {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls)
            external
            payable
            returns (Result3[] memory returnData);
    }

    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Build calldata for a dynamic method call.
fn encode_call(method: &str, args: &[DynSolValue]) -> Result<Bytes> {
    let mut type_names = Vec::with_capacity(args.len());
    for arg in args {
        let name = arg.sol_type_name().ok_or_else(|| {
            ServiceError::Rpc(format!("argument to {method} has no Solidity type"))
        })?;
        type_names.push(name.into_owned());
    }
    let signature = format!("{}({})", method, type_names.join(","));
    let selector = &keccak256(signature.as_bytes())[..4];

    let mut data = selector.to_vec();
    if !args.is_empty() {
        data.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
    }
    Ok(Bytes::from(data))
}

fn decode_return(method: &str, returns: &DynSolType, raw: &[u8]) -> Result<DynSolValue> {
    returns
        .abi_decode_params(raw)
        .map_err(|e| ServiceError::Decode(format!("decoding {method} return: {e}")))
}

/// Read-only JSON-RPC client. A fresh provider is built per operation so the
/// client stays cheap to clone and free of connection state.
#[derive(Debug, Clone)]
pub struct RpcChainReader {
    rpc_url: String,
}

impl RpcChainReader {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
        }
    }

    fn url(&self) -> Result<reqwest::Url> {
        self.rpc_url
            .parse()
            .map_err(|e| ServiceError::Configuration(format!("invalid RPC URL: {e}")))
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn call(
        &self,
        to: Address,
        method: &str,
        args: Vec<DynSolValue>,
        returns: &DynSolType,
    ) -> Result<DynSolValue> {
        let provider = ProviderBuilder::new().on_http(self.url()?);
        let data = encode_call(method, &args)?;
        debug!(%to, method, "eth_call");

        let tx = TransactionRequest::default().with_to(to).with_input(data);
        let raw = provider
            .call(&tx)
            .await
            .map_err(|e| ServiceError::Rpc(format!("{method} call failed: {e}")))?;
        decode_return(method, returns, &raw)
    }

    async fn multicall(&self, calls: Vec<ContractCall>) -> Result<Vec<DynSolValue>> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }
        let provider = ProviderBuilder::new().on_http(self.url()?);

        let mut batch = Vec::with_capacity(calls.len());
        for call in &calls {
            batch.push(IMulticall3::Call3 {
                target: call.to,
                allowFailure: false,
                callData: encode_call(&call.method, &call.args)?,
            });
        }

        debug!(count = calls.len(), "multicall aggregate3");
        let contract = IMulticall3::new(MULTICALL3, &provider);
        let outcome = contract
            .aggregate3(batch)
            .call()
            .await
            .map_err(|e| ServiceError::Rpc(format!("multicall failed: {e}")))?;

        if outcome.returnData.len() != calls.len() {
            return Err(ServiceError::Rpc(format!(
                "multicall returned {} results for {} calls",
                outcome.returnData.len(),
                calls.len()
            )));
        }

        // Multicall3 guarantees result order matches call order.
        let mut decoded = Vec::with_capacity(calls.len());
        for (call, result) in calls.iter().zip(outcome.returnData) {
            decoded.push(decode_return(&call.method, &call.returns, &result.returnData)?);
        }
        Ok(decoded)
    }

    async fn logs(
        &self,
        address: Address,
        event_signature: &str,
        from_block: u64,
    ) -> Result<Vec<ChainLog>> {
        let provider = ProviderBuilder::new().on_http(self.url()?);
        let topic0 = keccak256(event_signature.as_bytes());
        let filter = Filter::new()
            .address(address)
            .event_signature(topic0)
            .from_block(from_block);

        let logs = provider
            .get_logs(&filter)
            .await
            .map_err(|e| ServiceError::Rpc(format!("log query failed: {e}")))?;
        debug!(%address, event_signature, count = logs.len(), "fetched logs");

        Ok(logs
            .into_iter()
            .map(|log| ChainLog {
                address: log.inner.address,
                block_number: log.block_number.unwrap_or(0),
                log_index: log.log_index.unwrap_or(0),
                tx_hash: log.transaction_hash.unwrap_or_default(),
                topics: log.inner.data.topics().to_vec(),
                data: log.inner.data.data.clone(),
            })
            .collect())
    }

    async fn native_balance(&self, address: Address) -> Result<U256> {
        let provider = ProviderBuilder::new().on_http(self.url()?);
        provider
            .get_balance(address)
            .await
            .map_err(|e| ServiceError::Rpc(format!("balance query failed: {e}")))
    }

    async fn token_balance(&self, token: Address, holder: Address) -> Result<U256> {
        let provider = ProviderBuilder::new().on_http(self.url()?);
        let contract = IERC20::new(token, &provider);
        let balance = contract
            .balanceOf(holder)
            .call()
            .await
            .map_err(|e| ServiceError::Rpc(format!("balanceOf query failed: {e}")))?;
        Ok(balance._0)
    }
}

/// Signing JSON-RPC client. The private key is parsed once at construction
/// so a malformed key fails fast instead of on the first write.
#[derive(Debug, Clone)]
pub struct RpcWallet {
    rpc_url: String,
    signer: PrivateKeySigner,
}

impl RpcWallet {
    pub fn new(rpc_url: impl Into<String>, private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| ServiceError::Wallet(format!("invalid private key: {e}")))?;
        Ok(Self {
            rpc_url: rpc_url.into(),
            signer,
        })
    }
}

#[async_trait]
impl WalletClient for RpcWallet {
    fn account(&self) -> Address {
        self.signer.address()
    }

    async fn submit(
        &self,
        to: Address,
        method: &str,
        args: Vec<DynSolValue>,
    ) -> Result<TxReceipt> {
        let url = self
            .rpc_url
            .parse()
            .map_err(|e| ServiceError::Configuration(format!("invalid RPC URL: {e}")))?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(EthereumWallet::from(self.signer.clone()))
            .on_http(url);

        let data = encode_call(method, &args)?;
        let tx = TransactionRequest::default().with_to(to).with_input(data);

        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| ServiceError::Transaction(format!("{method} send failed: {e}")))?;
        info!(method, tx_hash = %pending.tx_hash(), "transaction sent");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ServiceError::Transaction(format!("{method} receipt failed: {e}")))?;

        Ok(TxReceipt {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            block_number: receipt.block_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_known_signature() {
        // transfer(address,uint256) selector is 0xa9059cbb
        let args = vec![
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Uint(U256::ZERO, 256),
        ];
        let data = encode_call("transfer", &args).unwrap();
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        // selector plus two 32 byte words
        assert_eq!(data.len(), 4 + 64);
    }

    #[test]
    fn zero_arg_call_is_selector_only() {
        let data = encode_call("paused", &[]).unwrap();
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn bad_private_key_is_a_wallet_error() {
        let err = RpcWallet::new("http://localhost:8545", "not-a-key").unwrap_err();
        assert!(matches!(err, ServiceError::Wallet(_)));
    }
}
