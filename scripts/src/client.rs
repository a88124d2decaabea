//! The RPC-backed implementation of the chain collaborators

use std::str::FromStr;

use alloy::{
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, B256, U256},
    providers::{
        ext::AnvilApi,
        fillers::{ChainIdFiller, GasFiller, JoinFill, NonceFiller, SimpleNonceManager},
        DynProvider, Identity, PendingTransactionBuilder, Provider, ProviderBuilder,
    },
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    chain::{ChainReader, TransactionSubmitter},
    errors::ScriptError,
    types::{ContractCall, TxReceipt},
};

/// The fillers of every provider talking to the node
pub type NodeFillers =
    JoinFill<JoinFill<JoinFill<Identity, GasFiller>, NonceFiller<SimpleNonceManager>>, ChainIdFiller>;

/// A provider builder fetching the pending nonce from the node for every transaction.
///
/// A cached nonce is never rolled back, so it goes stale once a devnet node
/// reverts to a snapshot.
pub fn node_provider_builder() -> ProviderBuilder<Identity, NodeFillers, Ethereum> {
    ProviderBuilder::default()
        .with_gas_estimation()
        .with_simple_nonce_management()
        .fetch_chain_id()
}

/// A client sending transactions through a JSON-RPC node.
///
/// Transactions from a local key are signed by the client, transactions from an
/// impersonated account are sent unsigned and signed by the node.
#[derive(Clone)]
pub struct RpcClient {
    /// The provider signing with the local keys
    wallet_provider: DynProvider,
    /// The provider sending unsigned transactions
    node_provider: DynProvider,
    /// The addresses of the local keys, the first one being the deployer
    local_signers: Vec<Address>,
    /// The accounts unlocked on the node
    impersonated: Vec<Address>,
}

impl RpcClient {
    /// Connect to the node at `rpc_url`, signing with the given private keys
    pub async fn connect(rpc_url: &str, priv_keys: &[String]) -> Result<Self, ScriptError> {
        let url =
            Url::from_str(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        let mut keys = priv_keys.iter();
        let deployer = keys
            .next()
            .ok_or_else(|| ScriptError::ClientInitialization("no private key given".to_string()))
            .and_then(|key| parse_signer(key))?;

        let mut local_signers = vec![deployer.address()];
        let mut wallet = EthereumWallet::new(deployer);
        for key in keys {
            let signer = parse_signer(key)?;
            local_signers.push(signer.address());
            wallet.register_signer(signer);
        }

        let wallet_provider = node_provider_builder()
            .wallet(wallet)
            .connect_http(url.clone())
            .erased();
        let node_provider = node_provider_builder().connect_http(url).erased();

        // Fail early on an unreachable node
        let chain_id = wallet_provider
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        debug!("Connected to chain {chain_id}");

        Ok(Self {
            wallet_provider,
            node_provider,
            local_signers,
            impersonated: Vec::new(),
        })
    }

    /// The address of the first local key
    pub fn deployer(&self) -> Address {
        self.local_signers[0]
    }

    /// Unlock `address` on a devnet node, letting the client send transactions from it
    pub async fn impersonate(&mut self, address: Address) -> Result<(), ScriptError> {
        self.node_provider
            .anvil_impersonate_account(address)
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        warn!("Impersonating {address:#x}, this only works against a devnet node");
        self.impersonated.push(address);
        Ok(())
    }

    /// The provider able to send a transaction from `from`
    fn provider_for(&self, from: Address) -> &DynProvider {
        if self.impersonated.contains(&from) {
            &self.node_provider
        } else {
            &self.wallet_provider
        }
    }
}

/// Parse a hex-encoded private key
fn parse_signer(key: &str) -> Result<PrivateKeySigner, ScriptError> {
    PrivateKeySigner::from_str(key).map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

/// Convert an RPC receipt into the receipt seen by the procedures
fn convert_receipt(receipt: TransactionReceipt) -> TxReceipt {
    TxReceipt {
        tx_hash: receipt.transaction_hash,
        success: receipt.status(),
        contract_address: receipt.contract_address,
        logs: receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect(),
    }
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ScriptError> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        self.node_provider
            .call(tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    async fn storage_at(&self, contract: Address, slot: B256) -> Result<B256, ScriptError> {
        let value = self
            .node_provider
            .get_storage_at(contract, U256::from_be_bytes(slot.0))
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        Ok(B256::from(value))
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ScriptError> {
        self.node_provider
            .get_code_at(address)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }
}

#[async_trait]
impl TransactionSubmitter for RpcClient {
    fn signers(&self) -> Vec<Address> {
        self.local_signers
            .iter()
            .chain(self.impersonated.iter())
            .copied()
            .collect()
    }

    async fn submit(&self, call: &ContractCall, from: Address) -> Result<TxHash, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(call.to)
            .with_input(call.data.clone());

        let pending = self
            .provider_for(from)
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::TransactionRejected {
                description: call.description.clone(),
                reason: e.to_string(),
            })?;

        Ok(*pending.tx_hash())
    }

    async fn deploy(&self, init_code: Bytes, from: Address) -> Result<TxHash, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(init_code);

        let pending = self
            .provider_for(from)
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt, ScriptError> {
        let receipt = PendingTransactionBuilder::new(self.node_provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::TransactionUnconfirmed {
                tx_hash,
                reason: e.to_string(),
            })?;

        Ok(convert_receipt(receipt))
    }
}
