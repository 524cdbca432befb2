//! Deployment configuration.
//!
//! Every contract address is supplied explicitly, keyed by chain id. There
//! is no ambient "current chain" anywhere in the crate; callers pick the
//! address set for the chain they are talking to.

use std::collections::HashMap;

use alloy::primitives::Address;

use crate::chain::{Result, ServiceError};

/// Default decimals assumed when a deployment does not specify its token.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Addresses of one deployment of the protocol.
#[derive(Debug, Clone)]
pub struct ContractAddresses {
    pub policy_manager: Address,
    pub claim_manager: Address,
    pub risk_pool: Address,
    /// Premium token for this deployment, when known up front.
    pub premium_token: Option<Address>,
    pub token_symbol: Option<String>,
    pub token_decimals: Option<u8>,
}

impl ContractAddresses {
    pub fn new(policy_manager: Address, claim_manager: Address, risk_pool: Address) -> Self {
        Self {
            policy_manager,
            claim_manager,
            risk_pool,
            premium_token: None,
            token_symbol: None,
            token_decimals: None,
        }
    }

    pub fn with_token(mut self, token: Address, symbol: &str, decimals: u8) -> Self {
        self.premium_token = Some(token);
        self.token_symbol = Some(symbol.to_string());
        self.token_decimals = Some(decimals);
        self
    }

    pub fn decimals(&self) -> u8 {
        self.token_decimals.unwrap_or(DEFAULT_TOKEN_DECIMALS)
    }
}

/// Address book across chains plus the RPC endpoint and optional signing key.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub private_key: Option<String>,
    deployments: HashMap<u64, ContractAddresses>,
}

impl ChainConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            private_key: None,
            deployments: HashMap::new(),
        }
    }

    pub fn with_private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    pub fn with_deployment(mut self, chain_id: u64, addresses: ContractAddresses) -> Self {
        self.deployments.insert(chain_id, addresses);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Requires `CHAIN_RPC_URL`, `CHAIN_ID`, `POLICY_MANAGER_ADDRESS`,
    /// `CLAIM_MANAGER_ADDRESS` and `RISK_POOL_ADDRESS`. `PREMIUM_TOKEN_ADDRESS`,
    /// `PREMIUM_TOKEN_SYMBOL`, `PREMIUM_TOKEN_DECIMALS` and `WALLET_PRIVATE_KEY`
    /// are optional.
    pub fn from_env() -> Result<Self> {
        let rpc_url = require_env("CHAIN_RPC_URL")?;
        let chain_id: u64 = require_env("CHAIN_ID")?
            .parse()
            .map_err(|e| ServiceError::Configuration(format!("CHAIN_ID: {e}")))?;

        let mut addresses = ContractAddresses::new(
            parse_address_env("POLICY_MANAGER_ADDRESS")?,
            parse_address_env("CLAIM_MANAGER_ADDRESS")?,
            parse_address_env("RISK_POOL_ADDRESS")?,
        );
        if let Ok(token) = std::env::var("PREMIUM_TOKEN_ADDRESS") {
            addresses.premium_token = Some(token.parse().map_err(|e| {
                ServiceError::Configuration(format!("PREMIUM_TOKEN_ADDRESS: {e}"))
            })?);
            addresses.token_symbol = std::env::var("PREMIUM_TOKEN_SYMBOL").ok();
            addresses.token_decimals = std::env::var("PREMIUM_TOKEN_DECIMALS")
                .ok()
                .and_then(|s| s.parse().ok());
        }

        let mut config = Self::new(rpc_url).with_deployment(chain_id, addresses);
        if let Ok(key) = std::env::var("WALLET_PRIVATE_KEY") {
            config.private_key = Some(key);
        }
        Ok(config)
    }

    /// Address set for `chain_id`, or a configuration error naming the chain.
    pub fn addresses(&self, chain_id: u64) -> Result<&ContractAddresses> {
        self.deployments.get(&chain_id).ok_or_else(|| {
            ServiceError::Configuration(format!("no deployment configured for chain {chain_id}"))
        })
    }

    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.deployments.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| ServiceError::Configuration(format!("{name} is not set")))
}

fn parse_address_env(name: &str) -> Result<Address> {
    require_env(name)?
        .parse()
        .map_err(|e| ServiceError::Configuration(format!("{name}: {e}")))
}
