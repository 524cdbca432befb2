//! Bima Core Library
//!
//! Chain data access and analytics aggregation for a health-insurance
//! protocol deployed as three contracts (PolicyManager, ClaimManager,
//! RiskPoolTreasury). Reads decode on-chain structs into typed records,
//! writes run submit-and-wait flows, and the analytics layer turns the
//! normalized records into chartable aggregates.
//!
//! ## Modules
//!
//! - [`domain`] - Core domain types (policies, claims, plans, analytics shapes)
//! - [`chain`] - Client traits, alloy-backed RPC implementations, decoding, service
//! - [`analytics`] - Pure aggregation over normalized records
//! - [`config`] - Per-chain contract address resolution
//! - [`units`] - Fixed-point token amount conversion
//! - [`telemetry`] - Tracing initialization

pub mod analytics;
pub mod chain;
pub mod config;
pub mod domain;
pub mod telemetry;
pub mod units;

// Re-export commonly used types
pub use domain::{
    AnalyticsData, Claim, ClaimStatus, ContractStats, DoctorAuthorization, PaymentType, Plan,
    PlanType, Policy, PolicyStatus, TimeRange, TokenMeta, TxOutcome,
};

pub use chain::{
    ChainReader, ContractService, Result, RpcChainReader, RpcWallet, ServiceError, WalletClient,
};

pub use analytics::build_analytics;
pub use config::{ChainConfig, ContractAddresses};
