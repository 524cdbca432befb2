//! Normalization of raw contract responses into domain records.
//!
//! Depending on how the node and ABI describe a struct return, the decoded
//! value arrives either as a named struct (`DynSolValue::CustomStruct`) or a
//! positional tuple (`DynSolValue::Tuple`). One decoder per entity accepts
//! both: each field is looked up by its ABI name first, then by its fixed
//! positional index. All monetary fields pass through
//! [`crate::units::format_token_units`] with the caller's decimals.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::U256;

use crate::domain::{Claim, Plan, Policy};
use crate::units::format_token_units;

use super::{Result, ServiceError};

/// Resolve a struct field by ABI name, falling back to its positional index.
pub fn field<'a>(value: &'a DynSolValue, name: &str, index: usize) -> Option<&'a DynSolValue> {
    match value {
        DynSolValue::CustomStruct {
            prop_names, tuple, ..
        } => prop_names
            .iter()
            .position(|p| p == name)
            .and_then(|i| tuple.get(i))
            .or_else(|| tuple.get(index)),
        DynSolValue::Tuple(items) => items.get(index),
        _ => None,
    }
}

fn missing(entity: &str, name: &str) -> ServiceError {
    ServiceError::Decode(format!("{entity} response missing field {name}"))
}

fn as_u256(value: &DynSolValue) -> Option<U256> {
    match value {
        DynSolValue::Uint(v, _) => Some(*v),
        DynSolValue::Int(v, _) => (*v >= alloy::primitives::I256::ZERO)
            .then(|| v.into_raw()),
        _ => None,
    }
}

fn as_u64(value: &DynSolValue) -> Option<u64> {
    as_u256(value).map(|v| v.try_into().unwrap_or(u64::MAX))
}

fn as_u8(value: &DynSolValue) -> Option<u8> {
    as_u64(value).map(|v| u8::try_from(v).unwrap_or(u8::MAX))
}

fn as_address(value: &DynSolValue) -> Option<String> {
    value.as_address().map(|a| a.to_string())
}

fn as_string(value: &DynSolValue) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}

fn as_bool(value: &DynSolValue) -> Option<bool> {
    value.as_bool()
}

macro_rules! req {
    ($entity:expr, $value:expr, $name:literal, $index:expr, $coerce:ident) => {
        field($value, $name, $index)
            .and_then($coerce)
            .ok_or_else(|| missing($entity, $name))?
    };
}

/// Decode a `policies(id)` response.
///
/// Layout: [policyId, policyholder, planType, paymentType, paymentToken,
/// coverageAmount, deductible, premium, startDate, endDate, lastPaymentDate,
/// status, ipfsMetadata, totalPaid, claimsUsed]. The id the caller asked for
/// is authoritative; the echoed slot 0 is ignored.
pub fn policy_from_value(policy_id: u64, value: &DynSolValue, decimals: u8) -> Result<Policy> {
    const E: &str = "policy";
    let coverage = req!(E, value, "coverageAmount", 5, as_u256);
    let claims_used = req!(E, value, "claimsUsed", 14, as_u256);

    Ok(Policy {
        policy_id,
        policyholder: req!(E, value, "policyholder", 1, as_address),
        plan_type: req!(E, value, "planType", 2, as_u8),
        payment_type: req!(E, value, "paymentType", 3, as_u8),
        payment_token: req!(E, value, "paymentToken", 4, as_address),
        coverage_amount: format_token_units(coverage, decimals),
        deductible: format_token_units(req!(E, value, "deductible", 6, as_u256), decimals),
        premium: format_token_units(req!(E, value, "premium", 7, as_u256), decimals),
        start_date: req!(E, value, "startDate", 8, as_u64),
        end_date: req!(E, value, "endDate", 9, as_u64),
        last_payment_date: req!(E, value, "lastPaymentDate", 10, as_u64),
        status: req!(E, value, "status", 11, as_u8),
        metadata_ref: req!(E, value, "ipfsMetadata", 12, as_string),
        total_paid: format_token_units(req!(E, value, "totalPaid", 13, as_u256), decimals),
        claims_used: format_token_units(claims_used, decimals),
        remaining_coverage: format_token_units(coverage.saturating_sub(claims_used), decimals),
    })
}

/// Decode a `claims(id)` response.
///
/// Layout: [claimId, policyId, claimant, claimAmount, approvedAmount,
/// status, submissionDate, processedDate, ipfsDocuments, description].
pub fn claim_from_value(claim_id: u64, value: &DynSolValue, decimals: u8) -> Result<Claim> {
    const E: &str = "claim";
    Ok(Claim {
        claim_id,
        policy_id: req!(E, value, "policyId", 1, as_u64),
        claimant: req!(E, value, "claimant", 2, as_address),
        claim_amount: format_token_units(req!(E, value, "claimAmount", 3, as_u256), decimals),
        approved_amount: format_token_units(
            req!(E, value, "approvedAmount", 4, as_u256),
            decimals,
        ),
        status: req!(E, value, "status", 5, as_u8),
        submission_date: req!(E, value, "submissionDate", 6, as_u64),
        processed_date: req!(E, value, "processedDate", 7, as_u64),
        documents_ref: req!(E, value, "ipfsDocuments", 8, as_string),
        description: req!(E, value, "description", 9, as_string),
    })
}

/// Decode an `insurancePlans(index)` response.
///
/// Layout: [oneTimePrice, monthlyPrice, coverageAmount, deductible,
/// ipfsHash, isActive]. Plans carry no id of their own; the queried index
/// is the plan type.
pub fn plan_from_value(plan_type: u8, value: &DynSolValue, decimals: u8) -> Result<Plan> {
    const E: &str = "plan";
    Ok(Plan {
        plan_type,
        one_time_price: format_token_units(req!(E, value, "oneTimePrice", 0, as_u256), decimals),
        monthly_price: format_token_units(req!(E, value, "monthlyPrice", 1, as_u256), decimals),
        coverage_amount: format_token_units(
            req!(E, value, "coverageAmount", 2, as_u256),
            decimals,
        ),
        deductible: format_token_units(req!(E, value, "deductible", 3, as_u256), decimals),
        metadata_ref: req!(E, value, "ipfsHash", 4, as_string),
        is_active: req!(E, value, "isActive", 5, as_bool),
    })
}

/// Decode a `uint256[]` id-list response.
pub fn ids_from_value(value: &DynSolValue) -> Result<Vec<u64>> {
    let value = unwrap_single(value)
        .ok_or_else(|| ServiceError::Decode("empty id list response".to_string()))?;
    match value {
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => items
            .iter()
            .map(|v| as_u64(v).ok_or_else(|| missing("id list", "element")))
            .collect(),
        _ => Err(ServiceError::Decode(
            "expected an array of identifiers".to_string(),
        )),
    }
}

/// Decode a single uint return.
pub fn uint_from_value(value: &DynSolValue) -> Result<U256> {
    unwrap_single(value)
        .and_then(as_u256)
        .ok_or_else(|| ServiceError::Decode("expected an unsigned integer".to_string()))
}

/// Decode a single bool return.
pub fn bool_from_value(value: &DynSolValue) -> Result<bool> {
    unwrap_single(value)
        .and_then(as_bool)
        .ok_or_else(|| ServiceError::Decode("expected a boolean".to_string()))
}

/// Decode a single address return as a checksummed string.
pub fn address_from_value(value: &DynSolValue) -> Result<String> {
    unwrap_single(value)
        .and_then(as_address)
        .ok_or_else(|| ServiceError::Decode("expected an address".to_string()))
}

/// Decode a single string return.
pub fn string_from_value(value: &DynSolValue) -> Result<String> {
    unwrap_single(value)
        .and_then(as_string)
        .ok_or_else(|| ServiceError::Decode("expected a string".to_string()))
}

// Single-value returns sometimes arrive wrapped in a one-element tuple,
// depending on whether the decoder treated them as a parameter list.
fn unwrap_single(value: &DynSolValue) -> Option<&DynSolValue> {
    match value {
        DynSolValue::Tuple(items) if items.len() == 1 => items.first(),
        other => Some(other),
    }
}
