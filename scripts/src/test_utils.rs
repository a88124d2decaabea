//! An in-memory chain emulating the contracts touched by the scripts

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use alloy::primitives::{keccak256, Address, Bytes, Log, TxHash, B256, U256};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use async_trait::async_trait;

use crate::{
    chain::{ChainReader, TransactionSubmitter},
    constants::{PROXY_ADMIN_STORAGE_SLOT, PROXY_IMPLEMENTATION_STORAGE_SLOT},
    errors::ScriptError,
    solidity::{
        IGhoAToken, IGhoToken, IGhoVariableDebtToken, IPoolDataProvider, IStakedToken,
        IUpgradeabilityProxy,
    },
    types::{ContractCall, FacilitatorInfo, ReserveTokens, StakedTokenImmutables, TxReceipt},
};

pub const DEPLOYER: Address = Address::repeat_byte(0x01);
pub const ADMIN: Address = Address::repeat_byte(0x02);
pub const EXECUTOR: Address = Address::repeat_byte(0x03);
pub const OUTSIDER: Address = Address::repeat_byte(0x04);
pub const STAKED_PROXY: Address = Address::repeat_byte(0x10);
pub const OLD_IMPL: Address = Address::repeat_byte(0x11);
pub const NEW_IMPL: Address = Address::repeat_byte(0x12);
pub const GHO: Address = Address::repeat_byte(0x20);
pub const A_TOKEN: Address = Address::repeat_byte(0x21);
pub const STABLE_DEBT_TOKEN: Address = Address::repeat_byte(0x22);
pub const VARIABLE_DEBT_TOKEN: Address = Address::repeat_byte(0x23);
pub const TREASURY: Address = Address::repeat_byte(0x30);
pub const DISCOUNT_STRATEGY: Address = Address::repeat_byte(0x31);
pub const DATA_PROVIDER: Address = Address::repeat_byte(0x40);

/// The cooldown configured in the outgoing staked token implementation
pub const COOLDOWN: u64 = 864_000;

/// Something observable the mock chain was asked to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainEvent {
    /// A transaction was submitted
    Submitted { description: String, from: Address },
    /// A contract creation was submitted
    Deployed { from: Address },
    /// A transaction's confirmation was observed
    Confirmed(TxHash),
}

/// The emulated state of the staked token behind its proxy
#[derive(Clone, Debug)]
pub struct MockStakedToken {
    pub cooldown_seconds: U256,
    pub immutables: StakedTokenImmutables,
    pub gho_debt_token: Address,
    pub operator: Address,
    pub initialized_by: Option<Address>,
}

#[derive(Default)]
pub struct MockState {
    pub storage: HashMap<(Address, B256), B256>,
    pub code: HashSet<Address>,
    pub staked_tokens: HashMap<Address, MockStakedToken>,
    pub facilitators: HashMap<(Address, Address), FacilitatorInfo>,
    pub reserves: HashMap<(Address, Address), ReserveTokens>,
    /// Cross references keyed by contract and getter selector
    pub cross_refs: HashMap<(Address, [u8; 4]), Address>,
    pub receipts: HashMap<TxHash, TxReceipt>,
    pub events: Vec<ChainEvent>,
    /// Selectors whose transactions revert
    pub reverting: HashSet<[u8; 4]>,
    /// Drop the logs of every transaction
    pub suppress_logs: bool,
    /// Replace the facilitator address reported in emitted events
    pub forged_facilitator: Option<Address>,
    /// Replace the facilitator label hashed into emitted events
    pub forged_label: Option<String>,
    /// Replace the bucket capacity reported in emitted events
    pub forged_capacity: Option<u128>,
    /// Let upgrades succeed without writing the implementation slot
    pub skip_implementation_write: bool,
    /// Replace the cooldown written by the initializer
    pub forged_cooldown: Option<U256>,
    /// Lose every receipt, as a node dropping its transactions would
    pub drop_receipts: bool,
    pub tx_count: u64,
}

/// The in-memory chain, usable as both reader and submitter
pub struct MockChain {
    pub state: Mutex<MockState>,
    pub signers: Vec<Address>,
}

/// Whether `data` is a call to `C`
fn is<C: SolCall>(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == C::SELECTOR
}

/// Decode `data` as a call to `C`
fn decode<C: SolCall>(data: &[u8]) -> C {
    C::abi_decode(data).expect("malformed calldata")
}

impl MockChain {
    /// A chain with the GHO reserve listed and the staked token behind its proxy
    pub fn new() -> Self {
        let mut state = MockState::default();
        state
            .storage
            .insert((STAKED_PROXY, PROXY_ADMIN_STORAGE_SLOT), ADMIN.into_word());
        state
            .storage
            .insert((STAKED_PROXY, PROXY_IMPLEMENTATION_STORAGE_SLOT), OLD_IMPL.into_word());
        state.code.extend([STAKED_PROXY, OLD_IMPL, NEW_IMPL, GHO, DATA_PROVIDER]);
        state.staked_tokens.insert(
            STAKED_PROXY,
            MockStakedToken {
                cooldown_seconds: U256::from(COOLDOWN),
                immutables: StakedTokenImmutables {
                    staked_token: Address::repeat_byte(0x50),
                    reward_token: Address::repeat_byte(0x50),
                    unstake_window: U256::from(172_800),
                    rewards_vault: Address::repeat_byte(0x51),
                    emission_manager: Address::repeat_byte(0x52),
                },
                gho_debt_token: Address::ZERO,
                operator: EXECUTOR,
                initialized_by: None,
            },
        );
        state.reserves.insert(
            (DATA_PROVIDER, GHO),
            ReserveTokens {
                a_token: A_TOKEN,
                stable_debt_token: STABLE_DEBT_TOKEN,
                variable_debt_token: VARIABLE_DEBT_TOKEN,
            },
        );

        Self {
            state: Mutex::new(state),
            signers: vec![DEPLOYER, ADMIN, EXECUTOR],
        }
    }

    /// Make every transaction calling `C` revert
    pub fn revert_on<C: SolCall>(&self) {
        self.state.lock().unwrap().reverting.insert(C::SELECTOR);
    }

    /// The events recorded so far
    pub fn events(&self) -> Vec<ChainEvent> {
        self.state.lock().unwrap().events.clone()
    }

    /// The number of transactions submitted so far
    pub fn submissions(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ChainEvent::Submitted { .. } | ChainEvent::Deployed { .. }))
            .count()
    }

    /// The proxy's current implementation
    pub fn implementation(&self, proxy: Address) -> Address {
        let state = self.state.lock().unwrap();
        Address::from_word(state.storage[&(proxy, PROXY_IMPLEMENTATION_STORAGE_SLOT)])
    }

    /// The staked token behind `proxy`
    pub fn staked_token(&self, proxy: Address) -> MockStakedToken {
        self.state.lock().unwrap().staked_tokens[&proxy].clone()
    }

    /// A cross reference, read through the getter `C`
    pub fn cross_ref<C: SolCall>(&self, contract: Address) -> Address {
        let state = self.state.lock().unwrap();
        state
            .cross_refs
            .get(&(contract, C::SELECTOR))
            .copied()
            .unwrap_or_default()
    }

    /// A registered facilitator
    pub fn facilitator(&self, token: Address, facilitator: Address) -> Option<FacilitatorInfo> {
        let state = self.state.lock().unwrap();
        state.facilitators.get(&(token, facilitator)).cloned()
    }
}

impl MockState {
    /// Apply a transaction, returning whether it succeeded and the logs it emitted
    fn execute(&mut self, to: Address, data: &[u8], from: Address) -> (bool, Vec<Log>) {
        if data.len() >= 4 && self.reverting.contains(&data[..4]) {
            return (false, vec![]);
        }

        if is::<IUpgradeabilityProxy::upgradeToAndCallCall>(data) {
            let call = decode::<IUpgradeabilityProxy::upgradeToAndCallCall>(data);
            let admin = Address::from_word(self.storage[&(to, PROXY_ADMIN_STORAGE_SLOT)]);
            if from != admin || !self.code.contains(&call.newImplementation) {
                return (false, vec![]);
            }
            let Ok(init) = IStakedToken::initializeCall::abi_decode(&call.data) else {
                return (false, vec![]);
            };

            if !self.skip_implementation_write {
                self.storage.insert(
                    (to, PROXY_IMPLEMENTATION_STORAGE_SLOT),
                    call.newImplementation.into_word(),
                );
            }
            let token = self.staked_tokens.get_mut(&to).expect("not a staked token");
            token.cooldown_seconds = self.forged_cooldown.unwrap_or(init.cooldownSeconds);
            token.initialized_by = Some(init.slashingAdmin);
            return (true, vec![]);
        }

        if is::<IStakedToken::setGHODebtTokenCall>(data) {
            let call = decode::<IStakedToken::setGHODebtTokenCall>(data);
            let token = self.staked_tokens.get_mut(&to).expect("not a staked token");
            if from != token.operator {
                return (false, vec![]);
            }
            token.gho_debt_token = call.newGHODebtToken;
            return (true, vec![]);
        }

        if is::<IGhoToken::addFacilitatorCall>(data) {
            let call = decode::<IGhoToken::addFacilitatorCall>(data);
            let key = (to, call.facilitatorAddress);
            if self.facilitators.contains_key(&key) {
                return (false, vec![]);
            }
            self.facilitators.insert(
                key,
                FacilitatorInfo {
                    label: call.facilitatorLabel.clone(),
                    bucket_capacity: call.bucketCapacity,
                    bucket_level: 0,
                },
            );

            let event = IGhoToken::FacilitatorAdded {
                facilitatorAddress: self.forged_facilitator.unwrap_or(call.facilitatorAddress),
                label: keccak256(
                    self.forged_label
                        .as_deref()
                        .unwrap_or(&call.facilitatorLabel)
                        .as_bytes(),
                ),
                bucketCapacity: U256::from(self.forged_capacity.unwrap_or(call.bucketCapacity)),
            };
            let log = Log {
                address: to,
                data: event.encode_log_data(),
            };
            return (true, vec![log]);
        }

        self.execute_wiring(to, data)
    }

    /// Apply one of the cross reference setters
    fn execute_wiring(&mut self, to: Address, data: &[u8]) -> (bool, Vec<Log>) {
        // Setter selector, getter selector, whether the value may only be set once
        let setters: [([u8; 4], [u8; 4], bool); 5] = [
            (
                IGhoAToken::updateGhoTreasuryCall::SELECTOR,
                IGhoAToken::getGhoTreasuryCall::SELECTOR,
                false,
            ),
            (
                IGhoAToken::setVariableDebtTokenCall::SELECTOR,
                IGhoAToken::getVariableDebtTokenCall::SELECTOR,
                true,
            ),
            (
                IGhoVariableDebtToken::setATokenCall::SELECTOR,
                IGhoVariableDebtToken::getATokenCall::SELECTOR,
                true,
            ),
            (
                IGhoVariableDebtToken::updateDiscountRateStrategyCall::SELECTOR,
                IGhoVariableDebtToken::getDiscountRateStrategyCall::SELECTOR,
                false,
            ),
            (
                IGhoVariableDebtToken::updateDiscountTokenCall::SELECTOR,
                IGhoVariableDebtToken::getDiscountTokenCall::SELECTOR,
                false,
            ),
        ];

        let Some((_, getter, once)) = setters.iter().find(|(setter, ..)| data[..4] == *setter)
        else {
            return (false, vec![]);
        };
        let value = Address::abi_decode(&data[4..]).expect("malformed calldata");
        let current = self.cross_refs.entry((to, *getter)).or_default();
        if *once && *current != Address::ZERO {
            return (false, vec![]);
        }

        *current = value;
        (true, vec![])
    }

    /// Answer a view call
    fn view(&self, to: Address, data: &[u8]) -> Option<Vec<u8>> {
        if let Some(token) = self.staked_tokens.get(&to) {
            let immutables = token.immutables;
            if is::<IStakedToken::COOLDOWN_SECONDSCall>(data) {
                return Some(token.cooldown_seconds.abi_encode());
            }
            if is::<IStakedToken::STAKED_TOKENCall>(data) {
                return Some(immutables.staked_token.abi_encode());
            }
            if is::<IStakedToken::REWARD_TOKENCall>(data) {
                return Some(immutables.reward_token.abi_encode());
            }
            if is::<IStakedToken::UNSTAKE_WINDOWCall>(data) {
                return Some(immutables.unstake_window.abi_encode());
            }
            if is::<IStakedToken::REWARDS_VAULTCall>(data) {
                return Some(immutables.rewards_vault.abi_encode());
            }
            if is::<IStakedToken::EMISSION_MANAGERCall>(data) {
                return Some(immutables.emission_manager.abi_encode());
            }
        }

        if is::<IGhoToken::getFacilitatorCall>(data) {
            let call = decode::<IGhoToken::getFacilitatorCall>(data);
            let entry = self
                .facilitators
                .get(&(to, call.facilitator))
                .map(|info| IGhoToken::Facilitator {
                    bucketCapacity: info.bucket_capacity,
                    bucketLevel: info.bucket_level,
                    label: info.label.clone(),
                })
                .unwrap_or(IGhoToken::Facilitator {
                    bucketCapacity: 0,
                    bucketLevel: 0,
                    label: String::new(),
                });
            return Some(entry.abi_encode());
        }

        if is::<IPoolDataProvider::getReserveTokensAddressesCall>(data) {
            let call = decode::<IPoolDataProvider::getReserveTokensAddressesCall>(data);
            let tokens = self.reserves.get(&(to, call.asset)).copied().unwrap_or(ReserveTokens {
                a_token: Address::ZERO,
                stable_debt_token: Address::ZERO,
                variable_debt_token: Address::ZERO,
            });
            return Some(
                (tokens.a_token, tokens.stable_debt_token, tokens.variable_debt_token)
                    .abi_encode_params(),
            );
        }

        if data.len() >= 4 {
            let selector: [u8; 4] = data[..4].try_into().ok()?;
            if let Some(value) = self.cross_refs.get(&(to, selector)) {
                return Some(value.abi_encode());
            }
            // Unset cross references read as the zero address
            return Some(Address::ZERO.abi_encode());
        }

        None
    }

    /// Store the receipt of a new transaction and return its hash
    fn record_receipt(
        &mut self,
        success: bool,
        contract_address: Option<Address>,
        logs: Vec<Log>,
    ) -> TxHash {
        self.tx_count += 1;
        let tx_hash = keccak256(self.tx_count.to_be_bytes());
        let logs = if self.suppress_logs { vec![] } else { logs };
        self.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                success,
                contract_address,
                logs,
            },
        );
        tx_hash
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ScriptError> {
        let state = self.state.lock().unwrap();
        state
            .view(to, &data)
            .map(Bytes::from)
            .ok_or_else(|| ScriptError::ContractInteraction("execution reverted".to_string()))
    }

    async fn storage_at(&self, contract: Address, slot: B256) -> Result<B256, ScriptError> {
        let state = self.state.lock().unwrap();
        Ok(state.storage.get(&(contract, slot)).copied().unwrap_or_default())
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ScriptError> {
        let state = self.state.lock().unwrap();
        if state.code.contains(&address) {
            Ok(Bytes::from_static(&[0x60, 0x80]))
        } else {
            Ok(Bytes::new())
        }
    }
}

#[async_trait]
impl TransactionSubmitter for MockChain {
    fn signers(&self) -> Vec<Address> {
        self.signers.clone()
    }

    async fn submit(&self, call: &ContractCall, from: Address) -> Result<TxHash, ScriptError> {
        let mut state = self.state.lock().unwrap();
        state.events.push(ChainEvent::Submitted {
            description: call.description.clone(),
            from,
        });
        let (success, logs) = state.execute(call.to, &call.data, from);
        Ok(state.record_receipt(success, None, logs))
    }

    async fn deploy(&self, _init_code: Bytes, from: Address) -> Result<TxHash, ScriptError> {
        let mut state = self.state.lock().unwrap();
        state.events.push(ChainEvent::Deployed { from });
        let address = from.create(state.tx_count);
        state.code.insert(address);
        Ok(state.record_receipt(true, Some(address), vec![]))
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt, ScriptError> {
        let mut state = self.state.lock().unwrap();
        state.events.push(ChainEvent::Confirmed(tx_hash));
        let receipt = if state.drop_receipts {
            None
        } else {
            state.receipts.get(&tx_hash).cloned()
        };
        receipt.ok_or_else(|| ScriptError::TransactionUnconfirmed {
            tx_hash,
            reason: "transaction not found".to_string(),
        })
    }
}
