//! Typed read/write operations against the protocol contracts.
//!
//! `ContractService` owns the read surface and the submit-and-wait write
//! flows. Collection and stats reads degrade to an empty or zero value on
//! RPC and decode failures (logged, never propagated); single-record reads
//! surface their error; configuration and wallet errors always surface.
//! Writes fold mined-but-reverted and transient failures into a
//! [`TxOutcome`] so callers get a result object instead of an exception
//! boundary.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ContractAddresses;
use crate::domain::{
    Claim, ClaimStatus, ContractStats, DoctorAuthorization, PaymentType, Plan, Policy, TokenMeta,
    TxOutcome,
};
use crate::units::{format_token_units, parse_token_units};

use super::decode;
use super::{ChainReader, ContractCall, Result, ServiceError, TxReceipt, WalletClient};

/// Number of plan templates a deployment defines.
pub const PLAN_COUNT: u8 = 3;

/// Claims hydrated per multicall round trip in a full scan.
const CLAIM_CHUNK: usize = 250;

const POLICY_RETURNS: &str = "(uint256,address,uint8,uint8,address,uint256,uint256,uint256,uint256,uint256,uint256,uint8,string,uint256,uint256)";
const CLAIM_RETURNS: &str =
    "(uint256,uint256,address,uint256,uint256,uint8,uint256,uint256,string,string)";
const PLAN_RETURNS: &str = "(uint256,uint256,uint256,uint256,string,bool)";

const DOCTOR_AUTHORIZED_EVENT: &str = "DoctorAuthorized(address,bool)";

/// Pause flags of the two pausable contracts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PausedFlags {
    pub policy_manager: bool,
    pub claim_manager: bool,
}

fn sol_type(s: &str) -> Result<DynSolType> {
    DynSolType::parse(s).map_err(|e| ServiceError::Decode(format!("bad return type {s}: {e}")))
}

fn uint(v: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(v), 256)
}

fn uint8(v: u8) -> DynSolValue {
    DynSolValue::Uint(U256::from(v), 8)
}

/// Service over one deployment's contracts.
pub struct ContractService {
    reader: Arc<dyn ChainReader>,
    addresses: ContractAddresses,
    decimals: u8,
}

impl ContractService {
    pub fn new(reader: Arc<dyn ChainReader>, addresses: ContractAddresses) -> Self {
        let decimals = addresses.decimals();
        Self {
            reader,
            addresses,
            decimals,
        }
    }

    pub fn addresses(&self) -> &ContractAddresses {
        &self.addresses
    }

    // Collection reads degrade to `default` unless the error is fatal.
    fn degrade<T>(&self, what: &str, err: ServiceError, default: T) -> Result<T> {
        if err.is_fatal() {
            return Err(err);
        }
        warn!(%err, "{what} read failed, returning safe default");
        Ok(default)
    }

    // ---- token metadata ----

    /// Token symbol and decimals: configuration first, then a chain lookup,
    /// then the safe default.
    pub async fn token_meta(&self, token: Option<Address>) -> Result<TokenMeta> {
        let token = match token.or(self.addresses.premium_token) {
            Some(t) => t,
            None => return Ok(TokenMeta::unknown()),
        };

        if self.addresses.premium_token == Some(token) {
            if let (Some(symbol), Some(decimals)) = (
                self.addresses.token_symbol.clone(),
                self.addresses.token_decimals,
            ) {
                return Ok(TokenMeta {
                    address: Some(token.to_string()),
                    symbol,
                    decimals,
                });
            }
        }

        let calls = vec![
            ContractCall::new(token, "symbol", vec![], sol_type("(string)")?),
            ContractCall::new(token, "decimals", vec![], sol_type("(uint8)")?),
        ];
        match self.reader.multicall(calls).await {
            Ok(results) if results.len() == 2 => {
                let symbol = decode::string_from_value(&results[0])?;
                let decimals = decode::uint_from_value(&results[1])?
                    .try_into()
                    .unwrap_or(u8::MAX);
                Ok(TokenMeta {
                    address: Some(token.to_string()),
                    symbol,
                    decimals,
                })
            }
            Ok(_) => Ok(TokenMeta {
                address: Some(token.to_string()),
                ..TokenMeta::unknown()
            }),
            Err(e) => self.degrade(
                "token metadata",
                e,
                TokenMeta {
                    address: Some(token.to_string()),
                    ..TokenMeta::unknown()
                },
            ),
        }
    }

    // ---- boolean reads ----

    /// Whether `address` is the PolicyManager owner. The caller owns the
    /// access decision; this is only the raw comparison.
    pub async fn is_owner(&self, address: Address) -> Result<bool> {
        let result = self
            .reader
            .call(
                self.addresses.policy_manager,
                "owner",
                vec![],
                &sol_type("(address)")?,
            )
            .await;
        match result {
            Ok(v) => {
                let owner = decode::address_from_value(&v)?;
                Ok(owner.eq_ignore_ascii_case(&address.to_string()))
            }
            Err(e) => self.degrade("owner", e, false),
        }
    }

    pub async fn is_authorized_doctor(&self, address: Address) -> Result<bool> {
        let result = self
            .reader
            .call(
                self.addresses.claim_manager,
                "authorizedDoctors",
                vec![DynSolValue::Address(address)],
                &sol_type("(bool)")?,
            )
            .await;
        match result {
            Ok(v) => decode::bool_from_value(&v),
            Err(e) => self.degrade("doctor authorization", e, false),
        }
    }

    pub async fn is_token_accepted(&self, token: Address) -> Result<bool> {
        let result = self
            .reader
            .call(
                self.addresses.policy_manager,
                "acceptedTokens",
                vec![DynSolValue::Address(token)],
                &sol_type("(bool)")?,
            )
            .await;
        match result {
            Ok(v) => decode::bool_from_value(&v),
            Err(e) => self.degrade("token whitelist", e, false),
        }
    }

    // ---- plans ----

    pub async fn plan(&self, plan_type: u8) -> Result<Plan> {
        let value = self
            .reader
            .call(
                self.addresses.policy_manager,
                "insurancePlans",
                vec![uint8(plan_type)],
                &sol_type(PLAN_RETURNS)?,
            )
            .await?;
        decode::plan_from_value(plan_type, &value, self.decimals)
    }

    /// Plan templates in index order 0..count. Deployments define
    /// [`PLAN_COUNT`] templates; callers wanting all of them pass that.
    pub async fn plans(&self, count: u8) -> Result<Vec<Plan>> {
        let returns = sol_type(PLAN_RETURNS)?;
        let calls = (0..count)
            .map(|i| {
                ContractCall::new(
                    self.addresses.policy_manager,
                    "insurancePlans",
                    vec![uint8(i)],
                    returns.clone(),
                )
            })
            .collect();
        match self.reader.multicall(calls).await {
            Ok(results) => results
                .iter()
                .enumerate()
                .map(|(i, v)| decode::plan_from_value(i as u8, v, self.decimals))
                .collect(),
            Err(e) => self.degrade("plans", e, Vec::new()),
        }
    }

    // ---- policies ----

    pub async fn policy(&self, policy_id: u64) -> Result<Policy> {
        let value = self
            .reader
            .call(
                self.addresses.policy_manager,
                "policies",
                vec![uint(policy_id)],
                &sol_type(POLICY_RETURNS)?,
            )
            .await?;
        let policy = decode::policy_from_value(policy_id, &value, self.decimals)?;
        if policy.policyholder == Address::ZERO.to_string() {
            return Err(ServiceError::NotFound {
                entity: "policy",
                id: policy_id,
            });
        }
        Ok(policy)
    }

    /// Policies owned by `holder`. An empty id list short-circuits before
    /// any batch call is issued.
    pub async fn user_policies(&self, holder: Address) -> Result<Vec<Policy>> {
        let ids = self
            .reader
            .call(
                self.addresses.policy_manager,
                "getUserPolicies",
                vec![DynSolValue::Address(holder)],
                &sol_type("(uint256[])")?,
            )
            .await
            .and_then(|v| decode::ids_from_value(&v));
        let ids = match ids {
            Ok(ids) => ids,
            Err(e) => return self.degrade("user policies", e, Vec::new()),
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self.hydrate_policies(&ids).await {
            Ok(policies) => Ok(policies),
            Err(e) => self.degrade("user policies", e, Vec::new()),
        }
    }

    async fn hydrate_policies(&self, ids: &[u64]) -> Result<Vec<Policy>> {
        let returns = sol_type(POLICY_RETURNS)?;
        let calls = ids
            .iter()
            .map(|id| {
                ContractCall::new(
                    self.addresses.policy_manager,
                    "policies",
                    vec![uint(*id)],
                    returns.clone(),
                )
            })
            .collect();
        let results = self.reader.multicall(calls).await?;
        ids.iter()
            .zip(results.iter())
            .map(|(id, v)| decode::policy_from_value(*id, v, self.decimals))
            .collect()
    }

    pub async fn remaining_coverage(&self, policy_id: u64) -> Result<String> {
        Ok(self.policy(policy_id).await?.remaining_coverage)
    }

    // ---- claims ----

    pub async fn claim(&self, claim_id: u64) -> Result<Claim> {
        let value = self
            .reader
            .call(
                self.addresses.claim_manager,
                "claims",
                vec![uint(claim_id)],
                &sol_type(CLAIM_RETURNS)?,
            )
            .await?;
        decode::claim_from_value(claim_id, &value, self.decimals)
    }

    /// Claims filed against one policy, in the order the contract lists
    /// them. Presentation sorts belong to callers.
    pub async fn policy_claims(&self, policy_id: u64) -> Result<Vec<Claim>> {
        let ids = self
            .reader
            .call(
                self.addresses.claim_manager,
                "getPolicyClaims",
                vec![uint(policy_id)],
                &sol_type("(uint256[])")?,
            )
            .await
            .and_then(|v| decode::ids_from_value(&v));
        let ids = match ids {
            Ok(ids) => ids,
            Err(e) => return self.degrade("policy claims", e, Vec::new()),
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self.hydrate_claims(&ids).await {
            Ok(claims) => Ok(claims),
            Err(e) => self.degrade("policy claims", e, Vec::new()),
        }
    }

    /// Every claim on the contract, ids 1..=total ascending, hydrated in
    /// fixed-size chunks so no single round trip grows unbounded.
    pub async fn all_claims(&self) -> Result<Vec<Claim>> {
        let total = self
            .reader
            .call(
                self.addresses.claim_manager,
                "getTotalClaims",
                vec![],
                &sol_type("(uint256)")?,
            )
            .await
            .and_then(|v| decode::uint_from_value(&v));
        let total: u64 = match total {
            Ok(v) => v.try_into().unwrap_or(u64::MAX),
            Err(e) => return self.degrade("claim total", e, Vec::new()),
        };
        if total == 0 {
            return Ok(Vec::new());
        }

        let ids: Vec<u64> = (1..=total).collect();
        let mut claims = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(CLAIM_CHUNK) {
            match self.hydrate_claims(chunk).await {
                Ok(batch) => claims.extend(batch),
                Err(e) => return self.degrade("all claims", e, Vec::new()),
            }
        }
        debug!(total, fetched = claims.len(), "full claim scan complete");
        Ok(claims)
    }

    async fn hydrate_claims(&self, ids: &[u64]) -> Result<Vec<Claim>> {
        let returns = sol_type(CLAIM_RETURNS)?;
        let calls = ids
            .iter()
            .map(|id| {
                ContractCall::new(
                    self.addresses.claim_manager,
                    "claims",
                    vec![uint(*id)],
                    returns.clone(),
                )
            })
            .collect();
        let results = self.reader.multicall(calls).await?;
        ids.iter()
            .zip(results.iter())
            .map(|(id, v)| decode::claim_from_value(*id, v, self.decimals))
            .collect()
    }

    // ---- stats & balances ----

    pub async fn contract_stats(&self, token: Option<Address>) -> Result<ContractStats> {
        let counters = async {
            let calls = vec![
                ContractCall::new(
                    self.addresses.policy_manager,
                    "getTotalPolicies",
                    vec![],
                    sol_type("(uint256)")?,
                ),
                ContractCall::new(
                    self.addresses.claim_manager,
                    "getTotalClaims",
                    vec![],
                    sol_type("(uint256)")?,
                ),
            ];
            let results = self.reader.multicall(calls).await?;
            if results.len() != 2 {
                return Err(ServiceError::Decode("counter multicall shape".to_string()));
            }
            let policies: u64 = decode::uint_from_value(&results[0])?
                .try_into()
                .unwrap_or(u64::MAX);
            let claims: u64 = decode::uint_from_value(&results[1])?
                .try_into()
                .unwrap_or(u64::MAX);
            Ok((policies, claims))
        };
        let (total_policies, total_claims) = match counters.await {
            Ok(pair) => pair,
            Err(e) => return self.degrade("contract stats", e, ContractStats::default()),
        };

        // Treasury balance is zero when no token is resolvable, not an error.
        let treasury_balance = match token.or(self.addresses.premium_token) {
            Some(token) => self.risk_pool_token_balance(Some(token)).await?,
            None => "0".to_string(),
        };

        Ok(ContractStats {
            total_policies,
            total_claims,
            treasury_balance,
        })
    }

    pub async fn paused(&self) -> Result<PausedFlags> {
        let returns = sol_type("(bool)")?;
        let calls = vec![
            ContractCall::new(self.addresses.policy_manager, "paused", vec![], returns.clone()),
            ContractCall::new(self.addresses.claim_manager, "paused", vec![], returns),
        ];
        match self.reader.multicall(calls).await {
            Ok(results) if results.len() == 2 => Ok(PausedFlags {
                policy_manager: decode::bool_from_value(&results[0])?,
                claim_manager: decode::bool_from_value(&results[1])?,
            }),
            Ok(_) => Err(ServiceError::Decode("paused multicall shape".to_string())),
            Err(e) => self.degrade("pause flags", e, PausedFlags::default()),
        }
    }

    /// Native-coin balance of the risk pool, formatted at 18 decimals.
    pub async fn risk_pool_native_balance(&self) -> Result<String> {
        match self.reader.native_balance(self.addresses.risk_pool).await {
            Ok(balance) => Ok(format_token_units(balance, 18)),
            Err(e) => self.degrade("risk pool native balance", e, "0".to_string()),
        }
    }

    pub async fn risk_pool_token_balance(&self, token: Option<Address>) -> Result<String> {
        let token = match token.or(self.addresses.premium_token) {
            Some(t) => t,
            None => return Ok("0".to_string()),
        };
        match self
            .reader
            .token_balance(token, self.addresses.risk_pool)
            .await
        {
            Ok(balance) => Ok(format_token_units(balance, self.decimals)),
            Err(e) => self.degrade("risk pool token balance", e, "0".to_string()),
        }
    }

    // ---- event-log view ----

    /// Current doctor authorizations, rebuilt from the event log.
    ///
    /// Folds DoctorAuthorized events to the last write per address, ordered
    /// by (block number, log index); same-block ties resolve to the higher
    /// log index. Output is sorted by address.
    pub async fn authorized_doctors(&self) -> Result<Vec<DoctorAuthorization>> {
        let logs = match self
            .reader
            .logs(self.addresses.claim_manager, DOCTOR_AUTHORIZED_EVENT, 0)
            .await
        {
            Ok(logs) => logs,
            Err(e) => return self.degrade("doctor authorizations", e, Vec::new()),
        };

        let mut latest: HashMap<Address, (u64, u64, DoctorAuthorization)> = HashMap::new();
        for log in logs {
            let Some(doctor) = log.topics.get(1).map(|t| Address::from_word(*t)) else {
                warn!(block = log.block_number, "authorization log missing doctor topic");
                continue;
            };
            let authorized = match DynSolType::Bool.abi_decode(&log.data) {
                Ok(DynSolValue::Bool(b)) => b,
                _ => {
                    warn!(block = log.block_number, "authorization log with bad payload");
                    continue;
                }
            };
            let entry = DoctorAuthorization {
                address: doctor.to_string(),
                authorized,
                block_number: log.block_number,
                tx_hash: format!("0x{}", hex::encode(log.tx_hash)),
            };
            let key = (log.block_number, log.log_index);
            match latest.get(&doctor) {
                Some((block, index, _)) if (*block, *index) > key => {}
                _ => {
                    latest.insert(doctor, (key.0, key.1, entry));
                }
            }
        }

        let mut doctors: Vec<DoctorAuthorization> =
            latest.into_values().map(|(_, _, d)| d).collect();
        doctors.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(doctors)
    }

    // ---- writes ----

    fn outcome(receipt: TxReceipt) -> TxOutcome {
        let hash = format!("0x{}", hex::encode(receipt.tx_hash));
        if receipt.success {
            TxOutcome::confirmed(hash)
        } else {
            TxOutcome::reverted(hash)
        }
    }

    /// Submit one transaction and fold non-fatal failures into the outcome.
    async fn write(
        &self,
        wallet: &dyn WalletClient,
        to: Address,
        method: &str,
        args: Vec<DynSolValue>,
    ) -> Result<TxOutcome> {
        match wallet.submit(to, method, args).await {
            Ok(receipt) => Ok(Self::outcome(receipt)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(%e, method, "transaction failed");
                Ok(TxOutcome::failed(e.to_string()))
            }
        }
    }

    /// Read the payer's allowance and, when it falls short, submit an
    /// approval and wait for it. A reverted or failed approval aborts the
    /// enclosing flow; the main transaction must never be sent after it.
    async fn ensure_allowance(
        &self,
        wallet: &dyn WalletClient,
        token: Address,
        required: U256,
    ) -> Result<Option<TxOutcome>> {
        let allowance = self
            .reader
            .call(
                token,
                "allowance",
                vec![
                    DynSolValue::Address(wallet.account()),
                    DynSolValue::Address(self.addresses.policy_manager),
                ],
                &sol_type("(uint256)")?,
            )
            .await
            .and_then(|v| decode::uint_from_value(&v));
        let allowance = match allowance {
            Ok(v) => v,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(%e, %token, "allowance read failed");
                return Ok(Some(TxOutcome::failed(e.to_string())));
            }
        };
        if allowance >= required {
            return Ok(None);
        }

        debug!(%token, %required, %allowance, "granting allowance");
        let approval = self
            .write(
                wallet,
                token,
                "approve",
                vec![
                    DynSolValue::Address(self.addresses.policy_manager),
                    DynSolValue::Uint(required, 256),
                ],
            )
            .await?;
        if approval.success {
            Ok(None)
        } else {
            Ok(Some(approval))
        }
    }

    /// Purchase a policy, granting the token allowance first when needed.
    pub async fn purchase_policy(
        &self,
        wallet: &dyn WalletClient,
        plan_type: u8,
        payment_type: PaymentType,
        token: Address,
        metadata_ref: &str,
    ) -> Result<TxOutcome> {
        let plan = match self.plan(plan_type).await {
            Ok(plan) => plan,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => return Ok(TxOutcome::failed(e.to_string())),
        };
        let price = match payment_type {
            PaymentType::OneTime => &plan.one_time_price,
            PaymentType::Monthly => &plan.monthly_price,
        };
        let required = parse_token_units(price, self.decimals)?;

        if let Some(aborted) = self.ensure_allowance(wallet, token, required).await? {
            return Ok(aborted);
        }

        self.write(
            wallet,
            self.addresses.policy_manager,
            "purchasePolicy",
            vec![
                uint8(plan_type),
                uint8(payment_type.as_u8()),
                DynSolValue::Address(token),
                DynSolValue::String(metadata_ref.to_string()),
            ],
        )
        .await
    }

    /// Pay one monthly premium, sized to the policy's plan.
    pub async fn pay_monthly_premium(
        &self,
        wallet: &dyn WalletClient,
        policy_id: u64,
    ) -> Result<TxOutcome> {
        let prelude = async {
            let policy = self.policy(policy_id).await?;
            let token: Address = policy.payment_token.parse().map_err(|e| {
                ServiceError::Decode(format!("policy {policy_id} payment token: {e}"))
            })?;
            let plan = self.plan(policy.plan_type).await?;
            let required = parse_token_units(&plan.monthly_price, self.decimals)?;
            Ok::<_, ServiceError>((token, required))
        };
        let (token, required) = match prelude.await {
            Ok(pair) => pair,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => return Ok(TxOutcome::failed(e.to_string())),
        };

        if let Some(aborted) = self.ensure_allowance(wallet, token, required).await? {
            return Ok(aborted);
        }

        self.write(
            wallet,
            self.addresses.policy_manager,
            "payMonthlyPremium",
            vec![uint(policy_id)],
        )
        .await
    }

    pub async fn cancel_policy(
        &self,
        wallet: &dyn WalletClient,
        policy_id: u64,
    ) -> Result<TxOutcome> {
        self.write(
            wallet,
            self.addresses.policy_manager,
            "cancelPolicy",
            vec![uint(policy_id)],
        )
        .await
    }

    /// Submit a claim. `amount` is a decimal string, converted to smallest
    /// units at this boundary.
    pub async fn submit_claim(
        &self,
        wallet: &dyn WalletClient,
        policy_id: u64,
        amount: &str,
        documents_ref: &str,
        description: &str,
    ) -> Result<TxOutcome> {
        let amount = parse_token_units(amount, self.decimals)?;
        self.write(
            wallet,
            self.addresses.claim_manager,
            "submitClaim",
            vec![
                uint(policy_id),
                DynSolValue::Uint(amount, 256),
                DynSolValue::String(documents_ref.to_string()),
                DynSolValue::String(description.to_string()),
            ],
        )
        .await
    }

    /// Process a claim. The approved amount only applies to an Approved
    /// status; any other status submits zero regardless of the argument.
    pub async fn process_claim(
        &self,
        wallet: &dyn WalletClient,
        claim_id: u64,
        status: ClaimStatus,
        approved_amount: &str,
    ) -> Result<TxOutcome> {
        let amount = if status == ClaimStatus::Approved {
            parse_token_units(approved_amount, self.decimals)?
        } else {
            U256::ZERO
        };
        self.write(
            wallet,
            self.addresses.claim_manager,
            "processClaim",
            vec![
                uint(claim_id),
                uint8(status.as_u8()),
                DynSolValue::Uint(amount, 256),
            ],
        )
        .await
    }

    // ---- admin writes ----

    pub async fn pm_pause(&self, wallet: &dyn WalletClient) -> Result<TxOutcome> {
        self.write(wallet, self.addresses.policy_manager, "pause", vec![])
            .await
    }

    pub async fn pm_unpause(&self, wallet: &dyn WalletClient) -> Result<TxOutcome> {
        self.write(wallet, self.addresses.policy_manager, "unpause", vec![])
            .await
    }

    pub async fn pm_whitelist_token(
        &self,
        wallet: &dyn WalletClient,
        token: Address,
        enabled: bool,
    ) -> Result<TxOutcome> {
        self.write(
            wallet,
            self.addresses.policy_manager,
            "whitelistToken",
            vec![DynSolValue::Address(token), DynSolValue::Bool(enabled)],
        )
        .await
    }

    pub async fn pm_update_insurance_plan(
        &self,
        wallet: &dyn WalletClient,
        plan_type: u8,
        one_time_price: &str,
        monthly_price: &str,
        coverage_amount: &str,
        deductible: &str,
    ) -> Result<TxOutcome> {
        self.write(
            wallet,
            self.addresses.policy_manager,
            "updateInsurancePlan",
            vec![
                uint8(plan_type),
                DynSolValue::Uint(parse_token_units(one_time_price, self.decimals)?, 256),
                DynSolValue::Uint(parse_token_units(monthly_price, self.decimals)?, 256),
                DynSolValue::Uint(parse_token_units(coverage_amount, self.decimals)?, 256),
                DynSolValue::Uint(parse_token_units(deductible, self.decimals)?, 256),
            ],
        )
        .await
    }

    pub async fn pm_update_plan_metadata(
        &self,
        wallet: &dyn WalletClient,
        plan_type: u8,
        metadata_ref: &str,
    ) -> Result<TxOutcome> {
        self.write(
            wallet,
            self.addresses.policy_manager,
            "updatePlanMetadata",
            vec![uint8(plan_type), DynSolValue::String(metadata_ref.to_string())],
        )
        .await
    }

    pub async fn pm_set_risk_pool(
        &self,
        wallet: &dyn WalletClient,
        risk_pool: Address,
    ) -> Result<TxOutcome> {
        self.write(
            wallet,
            self.addresses.policy_manager,
            "setRiskPool",
            vec![DynSolValue::Address(risk_pool)],
        )
        .await
    }

    pub async fn pm_set_claim_manager(
        &self,
        wallet: &dyn WalletClient,
        claim_manager: Address,
    ) -> Result<TxOutcome> {
        self.write(
            wallet,
            self.addresses.policy_manager,
            "setClaimManager",
            vec![DynSolValue::Address(claim_manager)],
        )
        .await
    }

    pub async fn cm_pause(&self, wallet: &dyn WalletClient) -> Result<TxOutcome> {
        self.write(wallet, self.addresses.claim_manager, "pause", vec![])
            .await
    }

    pub async fn cm_unpause(&self, wallet: &dyn WalletClient) -> Result<TxOutcome> {
        self.write(wallet, self.addresses.claim_manager, "unpause", vec![])
            .await
    }

    pub async fn cm_authorize_doctor(
        &self,
        wallet: &dyn WalletClient,
        doctor: Address,
        authorized: bool,
    ) -> Result<TxOutcome> {
        self.write(
            wallet,
            self.addresses.claim_manager,
            "authorizeDoctor",
            vec![DynSolValue::Address(doctor), DynSolValue::Bool(authorized)],
        )
        .await
    }

    pub async fn cm_set_managers(
        &self,
        wallet: &dyn WalletClient,
        policy_manager: Address,
        risk_pool: Address,
    ) -> Result<TxOutcome> {
        self.write(
            wallet,
            self.addresses.claim_manager,
            "setManagers",
            vec![
                DynSolValue::Address(policy_manager),
                DynSolValue::Address(risk_pool),
            ],
        )
        .await
    }

    pub async fn risk_pool_withdraw_token(
        &self,
        wallet: &dyn WalletClient,
        token: Address,
        to: Address,
        amount: &str,
    ) -> Result<TxOutcome> {
        let amount = parse_token_units(amount, self.decimals)?;
        self.write(
            wallet,
            self.addresses.risk_pool,
            "withdrawToken",
            vec![
                DynSolValue::Address(token),
                DynSolValue::Address(to),
                DynSolValue::Uint(amount, 256),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::traits::{MockChainReader, MockWalletClient};

    fn test_addresses() -> ContractAddresses {
        let mut pm = [0u8; 20];
        pm[19] = 1;
        let mut cm = [0u8; 20];
        cm[19] = 2;
        let mut rp = [0u8; 20];
        rp[19] = 3;
        ContractAddresses::new(Address::from(pm), Address::from(cm), Address::from(rp))
    }

    #[tokio::test]
    async fn transient_errors_degrade_boolean_reads_to_false() {
        let mut reader = MockChainReader::new();
        reader
            .expect_call()
            .returning(|_, _, _, _| Err(ServiceError::Rpc("node down".to_string())));
        let service = ContractService::new(Arc::new(reader), test_addresses());

        assert!(!service.is_owner(Address::ZERO).await.unwrap());
        assert!(!service.is_authorized_doctor(Address::ZERO).await.unwrap());
    }

    #[tokio::test]
    async fn fatal_errors_surface_from_degrading_reads() {
        let mut reader = MockChainReader::new();
        reader
            .expect_multicall()
            .returning(|_| Err(ServiceError::Configuration("no deployment".to_string())));
        let service = ContractService::new(Arc::new(reader), test_addresses());

        let err = service.plans(PLAN_COUNT).await.unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }

    #[tokio::test]
    async fn fatal_wallet_errors_propagate_from_writes() {
        let reader = MockChainReader::new();
        let service = ContractService::new(Arc::new(reader), test_addresses());

        let mut wallet = MockWalletClient::new();
        wallet
            .expect_submit()
            .returning(|_, _, _| Err(ServiceError::Wallet("no signer".to_string())));
        let err = service.cancel_policy(&wallet, 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::Wallet(_)));
    }

    #[tokio::test]
    async fn transient_write_errors_become_failed_outcomes() {
        let reader = MockChainReader::new();
        let service = ContractService::new(Arc::new(reader), test_addresses());

        let mut wallet = MockWalletClient::new();
        wallet
            .expect_submit()
            .returning(|_, _, _| Err(ServiceError::Rpc("mempool full".to_string())));
        let outcome = service.pm_pause(&wallet).await.unwrap();
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }
}
