//! Registration of a GHO facilitator

use alloy::primitives::{keccak256, Address, TxHash, U256};
use alloy_sol_types::{SolCall, SolEvent};
use tracing::{info, warn};

use crate::{
    chain::{send_and_confirm, ChainReader, TransactionSubmitter},
    contracts::GhoToken,
    errors::ScriptError,
    solidity::IGhoToken::{self, FacilitatorAdded},
    types::{ContractCall, FacilitatorConfig, FacilitatorInfo, TxReceipt},
};

/// The name of the event confirming a registration
const FACILITATOR_ADDED_EVENT: &str = "FacilitatorAdded";

/// A request to grant bounded minting rights
#[derive(Clone, Debug)]
pub struct FacilitatorRequest {
    /// The GHO token
    pub token: Address,
    /// The address receiving minting rights
    pub facilitator: Address,
    /// The label and ceiling of the facilitator
    pub config: FacilitatorConfig,
    /// The account submitting the registration
    pub from: Address,
}

/// The result of a registration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The facilitator was registered in the given transaction
    Registered {
        /// The registration transaction
        tx_hash: TxHash,
        /// The facilitator reported by the confirming event
        facilitator: Address,
    },
    /// The facilitator was already registered with the requested configuration
    AlreadyRegistered(FacilitatorInfo),
}

/// Register `req.facilitator` in the GHO token
pub async fn register_facilitator<R: ChainReader, S: TransactionSubmitter>(
    reader: &R,
    submitter: &S,
    req: FacilitatorRequest,
) -> Result<RegistrationOutcome, ScriptError> {
    let token = GhoToken::new(req.token, reader);
    if let Some(existing) = token.facilitator(req.facilitator).await? {
        if existing.label == req.config.label && existing.bucket_capacity == req.config.ceiling {
            warn!(
                "{:#x} is already registered as \"{}\", skipping",
                req.facilitator, existing.label
            );
            return Ok(RegistrationOutcome::AlreadyRegistered(existing));
        }

        return Err(ScriptError::FacilitatorAlreadyRegistered {
            facilitator: req.facilitator,
            label: existing.label,
            capacity: existing.bucket_capacity,
        });
    }

    let call = ContractCall::new(
        req.token,
        IGhoToken::addFacilitatorCall::new((
            req.facilitator,
            req.config.label.clone(),
            req.config.ceiling,
        )),
        "addFacilitator",
    );
    let receipt = send_and_confirm(submitter, &call, req.from).await?;

    let facilitator = confirm_registration(&receipt, &req)?;
    info!("Address added as a facilitator: {facilitator:#x}");

    Ok(RegistrationOutcome::Registered {
        tx_hash: receipt.tx_hash,
        facilitator,
    })
}

/// Find the `FacilitatorAdded` event in `receipt` and check it against the request
fn confirm_registration(
    receipt: &TxReceipt,
    req: &FacilitatorRequest,
) -> Result<Address, ScriptError> {
    let event = receipt
        .logs
        .iter()
        .filter(|log| log.address == req.token)
        .filter(|log| log.topics().first() == Some(&FacilitatorAdded::SIGNATURE_HASH))
        .find_map(|log| FacilitatorAdded::decode_log_data(&log.data).ok())
        .ok_or(ScriptError::MissingEvent {
            event: FACILITATOR_ADDED_EVENT,
            tx_hash: receipt.tx_hash,
        })?;

    let mismatch = |details: String| ScriptError::EventMismatch {
        event: FACILITATOR_ADDED_EVENT,
        tx_hash: receipt.tx_hash,
        details,
    };
    if event.facilitatorAddress != req.facilitator {
        return Err(mismatch(format!(
            "facilitator {:#x}, expected {:#x}",
            event.facilitatorAddress, req.facilitator
        )));
    }
    if event.label != keccak256(req.config.label.as_bytes()) {
        return Err(mismatch(format!(
            "label hash {}, expected hash of \"{}\"",
            event.label, req.config.label
        )));
    }
    if event.bucketCapacity != U256::from(req.config.ceiling) {
        return Err(mismatch(format!(
            "capacity {}, expected {}",
            event.bucketCapacity, req.config.ceiling
        )));
    }

    Ok(event.facilitatorAddress)
}
