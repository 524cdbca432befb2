//! Chain access: client traits, alloy-backed implementations, response
//! decoding and the contract service.

pub mod decode;
pub mod error;
pub mod rpc;
pub mod service;
pub mod traits;

pub use error::{Result, ServiceError};
pub use rpc::{RpcChainReader, RpcWallet};
pub use service::{ContractService, PausedFlags, PLAN_COUNT};
pub use traits::{ChainLog, ChainReader, ContractCall, TxReceipt, WalletClient};
