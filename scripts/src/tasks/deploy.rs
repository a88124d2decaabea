//! Deployment of a new staked token implementation
//!
//! The implementation keeps the immutables of the one currently behind the proxy.

use std::{fs, path::Path};

use alloy::primitives::{Address, Bytes, TxHash};
use alloy_sol_types::SolValue;
use serde_json::Value;
use tracing::info;

use crate::{
    chain::{ensure_signer, ChainReader, TransactionSubmitter},
    constants::ARTIFACT_BYTECODE_KEY,
    contracts::StakedToken,
    errors::ScriptError,
    types::StakedTokenImmutables,
};

/// A deployed staked token implementation
#[derive(Clone, Copy, Debug)]
pub struct DeployedImplementation {
    /// The address of the implementation
    pub address: Address,
    /// The deployment transaction
    pub tx_hash: TxHash,
    /// The immutables it was constructed with
    pub immutables: StakedTokenImmutables,
}

/// Read the creation bytecode from a compilation artifact
pub fn read_artifact_bytecode(path: &Path) -> Result<Bytes, ScriptError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
    let artifact: Value =
        serde_json::from_str(&content).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode = artifact
        .get(ARTIFACT_BYTECODE_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ScriptError::ArtifactParsing(format!(
                "no `{ARTIFACT_BYTECODE_KEY}` in {}",
                path.display()
            ))
        })?;

    let bytecode: Bytes = bytecode
        .parse()
        .map_err(|e| ScriptError::ArtifactParsing(format!("invalid bytecode: {e}")))?;
    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "empty bytecode in {}, is the contract abstract?",
            path.display()
        )));
    }

    Ok(bytecode)
}

/// Append the ABI-encoded constructor arguments to the creation bytecode
pub fn staked_token_init_code(
    bytecode: &Bytes,
    immutables: &StakedTokenImmutables,
    distribution_duration: u128,
) -> Bytes {
    let args = (
        immutables.staked_token,
        immutables.reward_token,
        immutables.unstake_window,
        immutables.rewards_vault,
        immutables.emission_manager,
        distribution_duration,
    )
        .abi_encode_params();

    [bytecode.as_ref(), args.as_slice()].concat().into()
}

/// Deploy a new staked token implementation for the proxy at `proxy`
pub async fn deploy_staked_token_impl<R: ChainReader, S: TransactionSubmitter>(
    reader: &R,
    submitter: &S,
    proxy: Address,
    bytecode: &Bytes,
    distribution_duration: u128,
    from: Address,
) -> Result<DeployedImplementation, ScriptError> {
    ensure_signer(submitter, from)?;

    let immutables = StakedToken::new(proxy, reader).immutables().await?;
    let init_code = staked_token_init_code(bytecode, &immutables, distribution_duration);

    info!("Deploying staked token implementation from {from:#x}");
    let tx_hash = submitter.deploy(init_code, from).await?;
    let receipt = submitter.wait_for_confirmation(tx_hash).await?;
    if !receipt.success {
        return Err(ScriptError::TransactionReverted {
            description: "deploy staked token implementation".to_string(),
            tx_hash,
        });
    }

    let address = receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!("no contract address in receipt of {tx_hash:#x}"))
    })?;

    Ok(DeployedImplementation {
        address,
        tx_hash,
        immutables,
    })
}
