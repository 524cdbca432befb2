//! Policy-side domain records.
//!
//! All records are read-only projections of contract state. Monetary fields
//! are decimal strings already scaled by the payment token's decimals;
//! timestamps are seconds since epoch. Addresses and hashes are plain hex
//! strings so callers never handle chain-specific types.

use serde::{Deserialize, Serialize};

use super::types::{PaymentType, PlanType, PolicyStatus};

/// An insurance policy instance owned by a holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub policy_id: u64,
    pub policyholder: String,
    /// Raw plan index; decode via [`PlanType`].
    pub plan_type: u8,
    /// Raw payment-type index; decode via [`PaymentType`].
    pub payment_type: u8,
    pub payment_token: String,
    pub coverage_amount: String,
    pub deductible: String,
    pub premium: String,
    pub start_date: u64,
    pub end_date: u64,
    pub last_payment_date: u64,
    /// Raw status index; decode via [`PolicyStatus`].
    pub status: u8,
    /// Content-addressed metadata reference; opaque to this layer.
    pub metadata_ref: String,
    pub total_paid: String,
    pub claims_used: String,
    /// coverage − claims used, floored at zero. Computed at decode time from
    /// the raw integer fields so no string arithmetic happens downstream.
    pub remaining_coverage: String,
}

impl Policy {
    pub fn status_enum(&self) -> Option<PolicyStatus> {
        PolicyStatus::from_u8(self.status)
    }

    pub fn plan_label(&self) -> &'static str {
        PlanType::label(self.plan_type)
    }

    pub fn payment_label(&self) -> &'static str {
        PaymentType::label(self.payment_type)
    }

    /// A policy is valid while its status is Active.
    pub fn is_valid(&self) -> bool {
        self.status_enum() == Some(PolicyStatus::Active)
    }
}

/// A plan template (not an instance): pricing and coverage per plan type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub plan_type: u8,
    pub one_time_price: String,
    pub monthly_price: String,
    pub coverage_amount: String,
    pub deductible: String,
    pub metadata_ref: String,
    pub is_active: bool,
}

/// Aggregate counters plus the treasury balance for the configured token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractStats {
    pub total_policies: u64,
    pub total_claims: u64,
    /// Risk-pool balance for the queried token; "0" when no token is
    /// configured for the chain.
    pub treasury_balance: String,
}

impl Default for ContractStats {
    fn default() -> Self {
        Self {
            total_policies: 0,
            total_claims: 0,
            treasury_balance: "0".to_string(),
        }
    }
}

/// Payment-token metadata, resolved config-first with a chain fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMeta {
    pub address: Option<String>,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMeta {
    /// Fallback when neither config nor chain can supply metadata.
    pub fn unknown() -> Self {
        Self {
            address: None,
            symbol: "TOKEN".to_string(),
            decimals: 18,
        }
    }
}
