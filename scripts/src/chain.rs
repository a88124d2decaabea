//! The collaborators through which the scripts read and mutate chain state

use alloy::primitives::{Address, Bytes, TxHash, B256};
use async_trait::async_trait;
use tracing::info;

use crate::{
    errors::ScriptError,
    types::{ContractCall, TxReceipt},
};

/// Non-mutating reads of on-chain state.
///
/// Reads are advisory: they are used to build correct calldata and to check
/// preconditions, never to change state.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Execute `data` against the contract at `to` without submitting a transaction
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ScriptError>;

    /// Read a raw storage slot of a contract
    async fn storage_at(&self, contract: Address, slot: B256) -> Result<B256, ScriptError>;

    /// Read the code deployed at an address
    async fn code_at(&self, address: Address) -> Result<Bytes, ScriptError>;
}

/// Signing and broadcasting of transactions
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// The addresses this submitter can send transactions from
    fn signers(&self) -> Vec<Address>;

    /// Sign and broadcast `call` from `from`, returning the transaction hash
    async fn submit(&self, call: &ContractCall, from: Address) -> Result<TxHash, ScriptError>;

    /// Sign and broadcast a contract creation transaction from `from`
    async fn deploy(&self, init_code: Bytes, from: Address) -> Result<TxHash, ScriptError>;

    /// Block until the transaction is included, returning its receipt
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt, ScriptError>;
}

/// Ensure that the submitter can sign for `address`
pub fn ensure_signer(
    submitter: &impl TransactionSubmitter,
    address: Address,
) -> Result<(), ScriptError> {
    if submitter.signers().contains(&address) {
        Ok(())
    } else {
        Err(ScriptError::MissingSigner(address))
    }
}

/// Submit a call, wait for its receipt and ensure it was successful
pub async fn send_and_confirm(
    submitter: &impl TransactionSubmitter,
    call: &ContractCall,
    from: Address,
) -> Result<TxReceipt, ScriptError> {
    info!("Sending `{}` from {from:#x}", call.description);
    let tx_hash = submitter.submit(call, from).await?;
    let receipt = submitter.wait_for_confirmation(tx_hash).await?;
    if !receipt.success {
        return Err(ScriptError::TransactionReverted {
            description: call.description.clone(),
            tx_hash,
        });
    }

    info!("`{}` confirmed in tx {tx_hash:#x}", call.description);
    Ok(receipt)
}
