//! Shared enumeration tables for the insurance protocol.
//!
//! Every status/plan/payment field stored on-chain as a small integer is
//! decoded through exactly one mapping defined here. Aggregation and display
//! paths reference these tables instead of re-deriving labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Seconds in one calendar day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Insurance plan classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Basic,
    Premium,
    Platinum,
}

impl PlanType {
    pub fn as_u8(&self) -> u8 {
        match self {
            PlanType::Basic => 0,
            PlanType::Premium => 1,
            PlanType::Platinum => 2,
        }
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(PlanType::Basic),
            1 => Some(PlanType::Premium),
            2 => Some(PlanType::Platinum),
            _ => None,
        }
    }

    /// Display label for a raw plan index; unknown indices map to "Unknown".
    pub fn label(raw: u8) -> &'static str {
        match Self::from_u8(raw) {
            Some(PlanType::Basic) => "Basic",
            Some(PlanType::Premium) => "Premium",
            Some(PlanType::Platinum) => "Platinum",
            None => "Unknown",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PlanType::label(self.as_u8()))
    }
}

/// How a policy's premium is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    OneTime,
    Monthly,
}

impl PaymentType {
    pub fn as_u8(&self) -> u8 {
        match self {
            PaymentType::OneTime => 0,
            PaymentType::Monthly => 1,
        }
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(PaymentType::OneTime),
            1 => Some(PaymentType::Monthly),
            _ => None,
        }
    }

    /// Chart label for a raw payment-type index. Anything that is not
    /// one-time counts as monthly, matching how the contract treats it.
    pub fn label(raw: u8) -> &'static str {
        match raw {
            0 => "One-time",
            _ => "Monthly",
        }
    }
}

/// Policy lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Active,
    Expired,
    Cancelled,
    Suspended,
}

impl PolicyStatus {
    pub fn as_u8(&self) -> u8 {
        match self {
            PolicyStatus::Active => 0,
            PolicyStatus::Expired => 1,
            PolicyStatus::Cancelled => 2,
            PolicyStatus::Suspended => 3,
        }
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(PolicyStatus::Active),
            1 => Some(PolicyStatus::Expired),
            2 => Some(PolicyStatus::Cancelled),
            3 => Some(PolicyStatus::Suspended),
            _ => None,
        }
    }

    pub fn label(raw: u8) -> &'static str {
        match Self::from_u8(raw) {
            Some(PolicyStatus::Active) => "Active",
            Some(PolicyStatus::Expired) => "Expired",
            Some(PolicyStatus::Cancelled) => "Cancelled",
            Some(PolicyStatus::Suspended) => "Suspended",
            None => "Unknown",
        }
    }
}

/// Claim lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl ClaimStatus {
    pub fn as_u8(&self) -> u8 {
        match self {
            ClaimStatus::Pending => 0,
            ClaimStatus::Approved => 1,
            ClaimStatus::Rejected => 2,
            ClaimStatus::Paid => 3,
        }
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(ClaimStatus::Pending),
            1 => Some(ClaimStatus::Approved),
            2 => Some(ClaimStatus::Rejected),
            3 => Some(ClaimStatus::Paid),
            _ => None,
        }
    }

    pub fn label(raw: u8) -> &'static str {
        match Self::from_u8(raw) {
            Some(ClaimStatus::Pending) => "Pending",
            Some(ClaimStatus::Approved) => "Approved",
            Some(ClaimStatus::Rejected) => "Rejected",
            Some(ClaimStatus::Paid) => "Paid",
            None => "Unknown",
        }
    }

    /// Whether a raw status counts as approved for rate purposes.
    ///
    /// Approved and Paid both count: a paid claim passed through approval.
    /// The status *distribution* keeps them as separate buckets; the two
    /// views answer different questions and must not be unified.
    pub fn counts_as_approved(raw: u8) -> bool {
        matches!(
            Self::from_u8(raw),
            Some(ClaimStatus::Approved) | Some(ClaimStatus::Paid)
        )
    }
}

/// Time window selector for analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "90d")]
    NinetyDays,
    #[serde(rename = "1y")]
    OneYear,
}

impl TimeRange {
    pub fn days(&self) -> u64 {
        match self {
            TimeRange::SevenDays => 7,
            TimeRange::ThirtyDays => 30,
            TimeRange::NinetyDays => 90,
            TimeRange::OneYear => 365,
        }
    }

    pub fn window_secs(&self) -> u64 {
        self.days() * SECONDS_PER_DAY
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRange::SevenDays => write!(f, "7d"),
            TimeRange::ThirtyDays => write!(f, "30d"),
            TimeRange::NinetyDays => write!(f, "90d"),
            TimeRange::OneYear => write!(f, "1y"),
        }
    }
}

/// Outcome of a write operation.
///
/// A mined-but-reverted transaction is `success: false` with the hash still
/// present; a transaction that never made it on-chain carries the error
/// message instead. Neither case is an `Err` at the service boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutcome {
    pub success: bool,
    pub tx_hash: Option<String>,
    pub error: Option<String>,
}

impl TxOutcome {
    pub fn confirmed(tx_hash: String) -> Self {
        Self {
            success: true,
            tx_hash: Some(tx_hash),
            error: None,
        }
    }

    pub fn reverted(tx_hash: String) -> Self {
        Self {
            success: false,
            tx_hash: Some(tx_hash),
            error: Some("transaction reverted".to_string()),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_hash: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_roundtrip() {
        for v in 0..4u8 {
            assert_eq!(PolicyStatus::from_u8(v).unwrap().as_u8(), v);
            assert_eq!(ClaimStatus::from_u8(v).unwrap().as_u8(), v);
        }
        for v in 0..3u8 {
            assert_eq!(PlanType::from_u8(v).unwrap().as_u8(), v);
        }
        assert!(PlanType::from_u8(3).is_none());
        assert!(ClaimStatus::from_u8(4).is_none());
    }

    #[test]
    fn labels_cover_unknown_indices() {
        assert_eq!(PlanType::label(0), "Basic");
        assert_eq!(PlanType::label(9), "Unknown");
        assert_eq!(ClaimStatus::label(3), "Paid");
        assert_eq!(ClaimStatus::label(7), "Unknown");
        assert_eq!(PaymentType::label(0), "One-time");
        assert_eq!(PaymentType::label(1), "Monthly");
    }

    #[test]
    fn approved_includes_paid() {
        assert!(ClaimStatus::counts_as_approved(1));
        assert!(ClaimStatus::counts_as_approved(3));
        assert!(!ClaimStatus::counts_as_approved(0));
        assert!(!ClaimStatus::counts_as_approved(2));
    }

    #[test]
    fn time_range_windows() {
        assert_eq!(TimeRange::SevenDays.window_secs(), 7 * 86_400);
        assert_eq!(TimeRange::OneYear.days(), 365);
        assert_eq!(TimeRange::ThirtyDays.to_string(), "30d");
    }
}
