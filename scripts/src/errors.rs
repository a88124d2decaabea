//! Definitions of errors that can occur during the execution of the contract management scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy::primitives::{Address, TxHash};
use itertools::Itertools;

/// Errors that can occur during the execution of the contract management scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading the `deployments.json` file
    ReadDeployments(String),
    /// Error writing the `deployments.json` file
    WriteDeployments(String),
    /// A logical contract name has no entry in the deployments file,
    /// or the entry points at an address without code
    DeploymentNotFound(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error reading from a contract
    ContractInteraction(String),
    /// The signer chosen for an upgrade is not the proxy's registered admin
    AdminMismatch {
        /// The admin registered in the proxy
        expected: Address,
        /// The signer that was about to submit the upgrade
        actual: Address,
    },
    /// The submitter cannot sign for an address that a procedure needs
    MissingSigner(Address),
    /// Two roles that must be held by distinct addresses share one
    PrivilegeConflict(String),
    /// The proxy already points at the requested implementation
    AlreadyUpgraded {
        /// The proxy contract
        proxy: Address,
        /// Its current implementation
        implementation: Address,
    },
    /// A facilitator is already registered with a different configuration
    FacilitatorAlreadyRegistered {
        /// The facilitator address
        facilitator: Address,
        /// The label it is registered under
        label: String,
        /// Its registered bucket capacity
        capacity: u128,
    },
    /// The node refused a transaction before it was broadcast
    TransactionRejected {
        /// What the transaction was meant to do
        description: String,
        /// The error reported by the node
        reason: String,
    },
    /// A transaction was included but reverted
    TransactionReverted {
        /// What the transaction was meant to do
        description: String,
        /// The hash of the reverted transaction
        tx_hash: TxHash,
    },
    /// A broadcast transaction whose receipt could not be obtained
    TransactionUnconfirmed {
        /// The hash of the broadcast transaction
        tx_hash: TxHash,
        /// The error raised while waiting for the receipt
        reason: String,
    },
    /// A transaction succeeded without emitting the event confirming its effect
    MissingEvent {
        /// The name of the expected event
        event: &'static str,
        /// The hash of the transaction
        tx_hash: TxHash,
    },
    /// The confirming event was emitted with values other than the requested ones
    EventMismatch {
        /// The name of the event
        event: &'static str,
        /// The hash of the transaction
        tx_hash: TxHash,
        /// Details of the mismatching field
        details: String,
    },
    /// A confirmed transaction did not leave the chain in the expected state
    MissingEffect(String),
    /// A step in a sequence of independent transactions failed
    WiringStepFailed {
        /// The step that failed
        step: &'static str,
        /// The steps which completed before the failure
        completed: Vec<&'static str>,
        /// The underlying failure
        source: Box<ScriptError>,
    },
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::DeploymentNotFound(s) => write!(f, "deployment not found: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::AdminMismatch { expected, actual } => write!(
                f,
                "signer is not the proxy admin\n\texpected admin: {expected:#x}\n\tsigner: {actual:#x}"
            ),
            ScriptError::MissingSigner(address) => {
                write!(f, "no signer available for {address:#x}")
            }
            ScriptError::PrivilegeConflict(s) => write!(f, "privilege conflict: {}", s),
            ScriptError::AlreadyUpgraded {
                proxy,
                implementation,
            } => write!(
                f,
                "proxy {proxy:#x} already points at implementation {implementation:#x}"
            ),
            ScriptError::FacilitatorAlreadyRegistered {
                facilitator,
                label,
                capacity,
            } => write!(
                f,
                "facilitator {facilitator:#x} already registered as \"{label}\" with capacity {capacity}"
            ),
            ScriptError::TransactionRejected {
                description,
                reason,
            } => write!(f, "transaction `{description}` rejected: {reason}"),
            ScriptError::TransactionReverted {
                description,
                tx_hash,
            } => write!(
                f,
                "transaction `{description}` reverted. Check tx {tx_hash:#x}"
            ),
            ScriptError::TransactionUnconfirmed { tx_hash, reason } => write!(
                f,
                "transaction {tx_hash:#x} broadcast but not confirmed: {reason}"
            ),
            ScriptError::MissingEvent { event, tx_hash } => write!(
                f,
                "expected event `{event}` not emitted. Check tx {tx_hash:#x}"
            ),
            ScriptError::EventMismatch {
                event,
                tx_hash,
                details,
            } => write!(
                f,
                "event `{event}` does not match the request ({details}). Check tx {tx_hash:#x}"
            ),
            ScriptError::MissingEffect(s) => write!(f, "transaction had no effect: {}", s),
            ScriptError::WiringStepFailed {
                step,
                completed,
                source,
            } => write!(
                f,
                "step `{step}` failed after completing [{}]: {source}",
                completed.iter().join(", ")
            ),
        }
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScriptError::WiringStepFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
