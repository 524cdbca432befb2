//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

use bima_core::chain::{
    ChainLog, ChainReader, ContractCall, Result, ServiceError, TxReceipt, WalletClient,
};
use bima_core::domain::{Claim, Policy};
use bima_core::ContractAddresses;

pub const WEI: u64 = 1_000_000_000_000_000_000;

pub fn addr(last: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = last;
    Address::from(bytes)
}

pub fn test_addresses() -> ContractAddresses {
    ContractAddresses::new(addr(0x10), addr(0x20), addr(0x30))
}

pub fn uint(v: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(v), 256)
}

pub fn uint8(v: u8) -> DynSolValue {
    DynSolValue::Uint(U256::from(v), 8)
}

// ---- on-chain struct fixtures ----

/// One policy as the contract would return it.
#[derive(Clone)]
pub struct PolicyFixture {
    pub id: u64,
    pub holder: Address,
    pub plan_type: u8,
    pub payment_type: u8,
    pub token: Address,
    pub coverage: U256,
    pub deductible: U256,
    pub premium: U256,
    pub start_date: u64,
    pub end_date: u64,
    pub last_payment_date: u64,
    pub status: u8,
    pub metadata: String,
    pub total_paid: U256,
    pub claims_used: U256,
}

impl PolicyFixture {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            holder: addr(0xA0),
            plan_type: 0,
            payment_type: 1,
            token: addr(0xB0),
            coverage: U256::from(10u64) * U256::from(WEI),
            deductible: U256::from(WEI) / U256::from(10u64),
            premium: U256::from(WEI),
            start_date: 1_700_000_000,
            end_date: 1_731_536_000,
            last_payment_date: 1_700_000_000,
            status: 0,
            metadata: format!("QmPolicy{id}"),
            total_paid: U256::from(WEI),
            claims_used: U256::ZERO,
        }
    }

    pub fn into_value(self) -> DynSolValue {
        DynSolValue::Tuple(vec![
            uint(self.id),
            DynSolValue::Address(self.holder),
            uint8(self.plan_type),
            uint8(self.payment_type),
            DynSolValue::Address(self.token),
            DynSolValue::Uint(self.coverage, 256),
            DynSolValue::Uint(self.deductible, 256),
            DynSolValue::Uint(self.premium, 256),
            uint(self.start_date),
            uint(self.end_date),
            uint(self.last_payment_date),
            uint8(self.status),
            DynSolValue::String(self.metadata),
            DynSolValue::Uint(self.total_paid, 256),
            DynSolValue::Uint(self.claims_used, 256),
        ])
    }
}

/// One claim as the contract would return it.
#[derive(Clone)]
pub struct ClaimFixture {
    pub id: u64,
    pub policy_id: u64,
    pub claimant: Address,
    pub amount: U256,
    pub approved: U256,
    pub status: u8,
    pub submission_date: u64,
    pub processed_date: u64,
}

impl ClaimFixture {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            policy_id: 1,
            claimant: addr(0xC0),
            amount: U256::from(WEI),
            approved: U256::ZERO,
            status: 0,
            submission_date: 1_700_000_000,
            processed_date: 0,
        }
    }

    pub fn into_value(self) -> DynSolValue {
        DynSolValue::Tuple(vec![
            uint(self.id),
            uint(self.policy_id),
            DynSolValue::Address(self.claimant),
            DynSolValue::Uint(self.amount, 256),
            DynSolValue::Uint(self.approved, 256),
            uint8(self.status),
            uint(self.submission_date),
            uint(self.processed_date),
            DynSolValue::String(format!("QmDocs{}", self.id)),
            DynSolValue::String("test claim".to_string()),
        ])
    }
}

pub fn plan_value(one_time: U256, monthly: U256) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Uint(one_time, 256),
        DynSolValue::Uint(monthly, 256),
        DynSolValue::Uint(U256::from(10u64) * U256::from(WEI), 256),
        DynSolValue::Uint(U256::from(WEI) / U256::from(10u64), 256),
        DynSolValue::String("QmPlan".to_string()),
        DynSolValue::Bool(true),
    ])
}

pub fn authorization_log(
    contract: Address,
    doctor: Address,
    authorized: bool,
    block_number: u64,
    log_index: u64,
) -> ChainLog {
    let mut data = [0u8; 32];
    data[31] = authorized as u8;
    ChainLog {
        address: contract,
        block_number,
        log_index,
        tx_hash: B256::repeat_byte(block_number as u8),
        topics: vec![B256::ZERO, doctor.into_word()],
        data: Bytes::copy_from_slice(&data),
    }
}

// ---- domain record fixtures (for analytics tests) ----

pub fn mk_policy(id: u64, start_date: u64, status: u8, plan_type: u8, total_paid: &str) -> Policy {
    Policy {
        policy_id: id,
        policyholder: addr(0xA0).to_string(),
        plan_type,
        payment_type: 1,
        payment_token: addr(0xB0).to_string(),
        coverage_amount: "10".to_string(),
        deductible: "0.1".to_string(),
        premium: "1".to_string(),
        start_date,
        end_date: start_date + 365 * 86_400,
        last_payment_date: start_date,
        status,
        metadata_ref: format!("QmPolicy{id}"),
        total_paid: total_paid.to_string(),
        claims_used: "0".to_string(),
        remaining_coverage: "10".to_string(),
    }
}

pub fn mk_claim(id: u64, submission_date: u64, status: u8, amount: &str, approved: &str) -> Claim {
    Claim {
        claim_id: id,
        policy_id: 1,
        claimant: addr(0xC0).to_string(),
        claim_amount: amount.to_string(),
        approved_amount: approved.to_string(),
        status,
        submission_date,
        processed_date: 0,
        documents_ref: format!("QmDocs{id}"),
        description: "test claim".to_string(),
    }
}

// ---- scripted chain fakes ----

/// In-memory [`ChainReader`] backed by fixture tables. Records every
/// multicall batch size so tests can assert on round-trip counts.
#[derive(Default)]
pub struct FakeChain {
    pub policies: HashMap<u64, DynSolValue>,
    pub claims: HashMap<u64, DynSolValue>,
    pub plans: HashMap<u8, DynSolValue>,
    /// Scalar responses keyed by method name.
    pub scalars: HashMap<String, DynSolValue>,
    pub logs: Vec<ChainLog>,
    pub native_balance: U256,
    pub token_balances: HashMap<Address, U256>,
    /// Methods that fail with an RPC error.
    pub failing: HashSet<String>,
    pub batch_sizes: Mutex<Vec<usize>>,
    pub single_calls: Mutex<Vec<String>>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, fixture: PolicyFixture) -> Self {
        self.policies.insert(fixture.id, fixture.into_value());
        self
    }

    pub fn with_claim(mut self, fixture: ClaimFixture) -> Self {
        self.claims.insert(fixture.id, fixture.into_value());
        self
    }

    pub fn with_plan(mut self, plan_type: u8, value: DynSolValue) -> Self {
        self.plans.insert(plan_type, value);
        self
    }

    pub fn with_scalar(mut self, method: &str, value: DynSolValue) -> Self {
        self.scalars.insert(method.to_string(), value);
        self
    }

    pub fn with_logs(mut self, logs: Vec<ChainLog>) -> Self {
        self.logs = logs;
        self
    }

    pub fn with_failing(mut self, method: &str) -> Self {
        self.failing.insert(method.to_string());
        self
    }

    fn arg_id(args: &[DynSolValue]) -> u64 {
        args.first()
            .and_then(|v| v.as_uint())
            .map(|(v, _)| v.try_into().unwrap_or(u64::MAX))
            .unwrap_or(0)
    }

    fn respond(&self, method: &str, args: &[DynSolValue]) -> Result<DynSolValue> {
        if self.failing.contains(method) {
            return Err(ServiceError::Rpc(format!("{method} unavailable")));
        }
        match method {
            "policies" => self
                .policies
                .get(&Self::arg_id(args))
                .cloned()
                .ok_or_else(|| ServiceError::Rpc("unknown policy".to_string())),
            "claims" => self
                .claims
                .get(&Self::arg_id(args))
                .cloned()
                .ok_or_else(|| ServiceError::Rpc("unknown claim".to_string())),
            "insurancePlans" => self
                .plans
                .get(&(Self::arg_id(args) as u8))
                .cloned()
                .ok_or_else(|| ServiceError::Rpc("unknown plan".to_string())),
            other => self
                .scalars
                .get(other)
                .cloned()
                .ok_or_else(|| ServiceError::Rpc(format!("unscripted method {other}"))),
        }
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn call(
        &self,
        _to: Address,
        method: &str,
        args: Vec<DynSolValue>,
        _returns: &DynSolType,
    ) -> Result<DynSolValue> {
        self.single_calls.lock().unwrap().push(method.to_string());
        self.respond(method, &args)
    }

    async fn multicall(&self, calls: Vec<ContractCall>) -> Result<Vec<DynSolValue>> {
        self.batch_sizes.lock().unwrap().push(calls.len());
        calls
            .iter()
            .map(|c| self.respond(&c.method, &c.args))
            .collect()
    }

    async fn logs(
        &self,
        _address: Address,
        _event_signature: &str,
        _from_block: u64,
    ) -> Result<Vec<ChainLog>> {
        if self.failing.contains("logs") {
            return Err(ServiceError::Rpc("logs unavailable".to_string()));
        }
        Ok(self.logs.clone())
    }

    async fn native_balance(&self, _address: Address) -> Result<U256> {
        Ok(self.native_balance)
    }

    async fn token_balance(&self, token: Address, _holder: Address) -> Result<U256> {
        Ok(self.token_balances.get(&token).copied().unwrap_or_default())
    }
}

/// Scripted [`WalletClient`]. Every submission is recorded; named methods
/// can be made to revert or fail at the transport level.
pub struct FakeWallet {
    account: Address,
    pub submitted: Mutex<Vec<(Address, String, Vec<DynSolValue>)>>,
    pub reverting: HashSet<String>,
    pub erroring: HashSet<String>,
    next_hash: Mutex<VecDeque<B256>>,
}

impl FakeWallet {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            submitted: Mutex::new(Vec::new()),
            reverting: HashSet::new(),
            erroring: HashSet::new(),
            next_hash: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_reverting(mut self, method: &str) -> Self {
        self.reverting.insert(method.to_string());
        self
    }

    pub fn with_erroring(mut self, method: &str) -> Self {
        self.erroring.insert(method.to_string());
        self
    }

    pub fn submitted_methods(&self) -> Vec<String> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m, _)| m.clone())
            .collect()
    }
}

#[async_trait]
impl WalletClient for FakeWallet {
    fn account(&self) -> Address {
        self.account
    }

    async fn submit(
        &self,
        to: Address,
        method: &str,
        args: Vec<DynSolValue>,
    ) -> Result<TxReceipt> {
        self.submitted
            .lock()
            .unwrap()
            .push((to, method.to_string(), args));
        if self.erroring.contains(method) {
            return Err(ServiceError::Transaction(format!("{method} dropped")));
        }
        let tx_hash = self
            .next_hash
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| B256::repeat_byte(0x42));
        Ok(TxReceipt {
            tx_hash,
            success: !self.reverting.contains(method),
            block_number: Some(1),
        })
    }
}
