//! Claim-side domain records.

use serde::{Deserialize, Serialize};

use super::types::ClaimStatus;

/// A claim filed against a policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: u64,
    pub policy_id: u64,
    pub claimant: String,
    pub claim_amount: String,
    pub approved_amount: String,
    /// Raw status index; decode via [`ClaimStatus`].
    pub status: u8,
    pub submission_date: u64,
    /// Zero while the claim is unprocessed.
    pub processed_date: u64,
    /// Content-addressed supporting-documents reference; opaque here.
    pub documents_ref: String,
    pub description: String,
}

impl Claim {
    pub fn status_enum(&self) -> Option<ClaimStatus> {
        ClaimStatus::from_u8(self.status)
    }

    pub fn status_label(&self) -> &'static str {
        ClaimStatus::label(self.status)
    }

    pub fn is_processed(&self) -> bool {
        self.processed_date != 0
    }
}

/// Current authorization state for a doctor, rebuilt from the
/// DoctorAuthorized event log (last write per address wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorAuthorization {
    pub address: String,
    pub authorized: bool,
    pub block_number: u64,
    pub tx_hash: String,
}
