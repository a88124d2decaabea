//! Wiring of the cross references between the GHO companion contracts
//!
//! Each step sets a single reference on a single contract. Steps are
//! independent, and a step whose reference already holds the target value is
//! skipped, so the sequence can be re-run after a partial failure.

use alloy::primitives::{Address, Bytes, TxHash};
use alloy_sol_types::{SolCall, SolValue};
use tracing::info;

use crate::{
    chain::{send_and_confirm, ChainReader, TransactionSubmitter},
    errors::ScriptError,
    solidity::{IGhoAToken, IGhoVariableDebtToken},
    types::ContractCall,
};

/// The contracts whose references are wired together
#[derive(Clone, Copy, Debug)]
pub struct CompanionContracts {
    /// The GHO aToken
    pub gho_a_token: Address,
    /// The GHO variable debt token
    pub gho_variable_debt_token: Address,
    /// The treasury receiving GHO interest
    pub treasury: Address,
    /// The strategy computing the borrow rate discount
    pub discount_rate_strategy: Address,
    /// The token whose balance grants the discount
    pub staked_token: Address,
}

/// A single reference to set
#[derive(Clone, Debug)]
pub struct WiringStep {
    /// The name of the step
    pub name: &'static str,
    /// The contract holding the reference
    pub target: Address,
    /// The value to set the reference to
    pub value: Address,
    /// The encoded getter of the reference
    getter: Bytes,
    /// The encoded setter of the reference
    setter: ContractCall,
}

impl WiringStep {
    /// Build a step reading the reference through `getter` and writing it through `setter`
    fn new<G: SolCall, S: SolCall>(
        name: &'static str,
        target: Address,
        value: Address,
        getter: G,
        setter: S,
    ) -> Self {
        Self {
            name,
            target,
            value,
            getter: getter.abi_encode().into(),
            setter: ContractCall::new(target, setter, name),
        }
    }
}

/// What happened to a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The reference was set in the given transaction
    Submitted(TxHash),
    /// The reference already held the target value
    AlreadySet,
}

/// The fixed sequence of steps wiring the companion contracts
pub fn wiring_plan(contracts: &CompanionContracts) -> Vec<WiringStep> {
    let a_token = contracts.gho_a_token;
    let debt_token = contracts.gho_variable_debt_token;
    vec![
        WiringStep::new(
            "GhoAToken.updateGhoTreasury",
            a_token,
            contracts.treasury,
            IGhoAToken::getGhoTreasuryCall {},
            IGhoAToken::updateGhoTreasuryCall::new((contracts.treasury,)),
        ),
        WiringStep::new(
            "GhoAToken.setVariableDebtToken",
            a_token,
            debt_token,
            IGhoAToken::getVariableDebtTokenCall {},
            IGhoAToken::setVariableDebtTokenCall::new((debt_token,)),
        ),
        WiringStep::new(
            "GhoVariableDebtToken.setAToken",
            debt_token,
            a_token,
            IGhoVariableDebtToken::getATokenCall {},
            IGhoVariableDebtToken::setATokenCall::new((a_token,)),
        ),
        WiringStep::new(
            "GhoVariableDebtToken.updateDiscountRateStrategy",
            debt_token,
            contracts.discount_rate_strategy,
            IGhoVariableDebtToken::getDiscountRateStrategyCall {},
            IGhoVariableDebtToken::updateDiscountRateStrategyCall::new((
                contracts.discount_rate_strategy,
            )),
        ),
        WiringStep::new(
            "GhoVariableDebtToken.updateDiscountToken",
            debt_token,
            contracts.staked_token,
            IGhoVariableDebtToken::getDiscountTokenCall {},
            IGhoVariableDebtToken::updateDiscountTokenCall::new((contracts.staked_token,)),
        ),
    ]
}

/// Run a single step
async fn run_step<R: ChainReader, S: TransactionSubmitter>(
    reader: &R,
    submitter: &S,
    step: &WiringStep,
    from: Address,
) -> Result<StepOutcome, ScriptError> {
    let output = reader.call(step.target, step.getter.clone()).await?;
    let current = Address::abi_decode(&output)
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if current == step.value {
        info!("{} already set to {:#x}, skipping", step.name, step.value);
        return Ok(StepOutcome::AlreadySet);
    }

    let receipt = send_and_confirm(submitter, &step.setter, from).await?;
    info!(
        "{} set to: {:#x} in tx: {:#x}",
        step.name, step.value, receipt.tx_hash
    );
    Ok(StepOutcome::Submitted(receipt.tx_hash))
}

/// Run the wiring plan in order, halting at the first failing step
pub async fn wire_addresses<R: ChainReader, S: TransactionSubmitter>(
    reader: &R,
    submitter: &S,
    contracts: &CompanionContracts,
    from: Address,
) -> Result<Vec<(WiringStep, StepOutcome)>, ScriptError> {
    let mut completed = Vec::new();
    for step in wiring_plan(contracts) {
        match run_step(reader, submitter, &step, from).await {
            Ok(outcome) => completed.push((step, outcome)),
            Err(e) => {
                return Err(ScriptError::WiringStepFailed {
                    step: step.name,
                    completed: completed.iter().map(|(s, _)| s.name).collect(),
                    source: Box::new(e),
                })
            }
        }
    }

    Ok(completed)
}
