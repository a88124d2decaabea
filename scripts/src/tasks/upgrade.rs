//! Upgrade of the staked token proxy to a new implementation
//!
//! The upgrade swaps the implementation and initializes it in one transaction
//! signed by the proxy admin, then configures the GHO debt token on the new
//! implementation from the operational executor.

use alloy::primitives::{Address, TxHash, U256};
use alloy_sol_types::SolCall;
use tracing::info;

use crate::{
    chain::{ensure_signer, send_and_confirm, ChainReader, TransactionSubmitter},
    contracts::{ensure_deployed, Proxy, StakedToken},
    errors::ScriptError,
    solidity::{IStakedToken, IUpgradeabilityProxy},
    types::{ContractCall, ProxyState, UpgradeInitArgs},
};

/// The addresses holding the privileges involved in an upgrade
#[derive(Clone, Copy, Debug)]
pub struct SignerRoles {
    /// The account which deployed the protocol
    pub deployer: Address,
    /// The account holding upgrade authority over the proxy
    pub admin: Address,
    /// The account holding operational authority over the staked token
    pub executor: Address,
}

/// A request to upgrade the staked token
#[derive(Clone, Copy, Debug)]
pub struct UpgradeRequest {
    /// The staked token proxy
    pub proxy: Address,
    /// The implementation to upgrade to
    pub new_implementation: Address,
    /// The GHO variable debt token to configure after the upgrade
    pub gho_debt_token: Address,
    /// The signers of the upgrade and of the configuration
    pub roles: SignerRoles,
}

/// The result of a completed upgrade
#[derive(Clone, Copy, Debug)]
pub struct UpgradeReport {
    /// The proxy state before the upgrade
    pub previous: ProxyState,
    /// The implementation the proxy now delegates to
    pub new_implementation: Address,
    /// The cooldown carried over from the previous implementation
    pub cooldown_seconds: U256,
    /// The `upgradeToAndCall` transaction
    pub upgrade_tx: TxHash,
    /// The `setGHODebtToken` transaction
    pub configure_tx: TxHash,
}

/// Pick the signer holding upgrade authority over the proxy.
///
/// Falls back to `default` when no signer matches, leaving the mismatch to be
/// reported by [`upgrade_staked_token`].
pub async fn select_admin(
    reader: &impl ChainReader,
    submitter: &impl TransactionSubmitter,
    proxy: Address,
    default: Address,
) -> Result<Address, ScriptError> {
    let admin = Proxy::new(proxy, reader).admin().await?;
    Ok(submitter
        .signers()
        .into_iter()
        .find(|signer| *signer == admin)
        .unwrap_or(default))
}

/// Check every precondition of the upgrade, before anything is submitted
async fn check_preconditions<R: ChainReader, S: TransactionSubmitter>(
    reader: &R,
    submitter: &S,
    req: &UpgradeRequest,
) -> Result<ProxyState, ScriptError> {
    let roles = req.roles;
    ensure_deployed(reader, "staked token implementation", req.new_implementation).await?;

    let state = Proxy::new(req.proxy, reader).state().await?;
    if roles.admin != state.admin {
        return Err(ScriptError::AdminMismatch {
            expected: state.admin,
            actual: roles.admin,
        });
    }

    if roles.executor == roles.admin {
        return Err(ScriptError::PrivilegeConflict(format!(
            "executor {:#x} is also the proxy admin",
            roles.executor
        )));
    }
    if roles.executor == roles.deployer {
        return Err(ScriptError::PrivilegeConflict(format!(
            "executor {:#x} is also the deployer",
            roles.executor
        )));
    }

    ensure_signer(submitter, roles.admin)?;
    ensure_signer(submitter, roles.executor)?;

    if state.implementation == req.new_implementation {
        return Err(ScriptError::AlreadyUpgraded {
            proxy: state.proxy,
            implementation: state.implementation,
        });
    }

    Ok(state)
}

/// Upgrade the staked token proxy and configure the new implementation
pub async fn upgrade_staked_token<R: ChainReader, S: TransactionSubmitter>(
    reader: &R,
    submitter: &S,
    req: UpgradeRequest,
) -> Result<UpgradeReport, ScriptError> {
    let previous = check_preconditions(reader, submitter, &req).await?;
    info!(
        "Upgrading {:#x} from {:#x} to {:#x}",
        previous.proxy, previous.implementation, req.new_implementation
    );

    // Read through the proxy, i.e. from the outgoing implementation
    let staked_token = StakedToken::new(req.proxy, reader);
    let cooldown_seconds = staked_token.cooldown_seconds().await?;
    let init_args = UpgradeInitArgs::new(req.roles.admin, cooldown_seconds);

    let upgrade_call = ContractCall::new(
        req.proxy,
        IUpgradeabilityProxy::upgradeToAndCallCall::new((
            req.new_implementation,
            init_args.calldata(),
        )),
        "upgradeToAndCall",
    );
    let upgrade_receipt = send_and_confirm(submitter, &upgrade_call, req.roles.admin).await?;

    let proxy = Proxy::new(req.proxy, reader);
    let implementation = proxy.implementation().await?;
    if implementation != req.new_implementation {
        return Err(ScriptError::MissingEffect(format!(
            "proxy {:#x} still points at {implementation:#x} after tx {:#x}",
            req.proxy, upgrade_receipt.tx_hash
        )));
    }
    let new_cooldown = staked_token.cooldown_seconds().await?;
    if new_cooldown != cooldown_seconds {
        return Err(ScriptError::MissingEffect(format!(
            "cooldown changed from {cooldown_seconds} to {new_cooldown} in tx {:#x}",
            upgrade_receipt.tx_hash
        )));
    }

    let configure_call = ContractCall::new(
        req.proxy,
        IStakedToken::setGHODebtTokenCall::new((req.gho_debt_token,)),
        "setGHODebtToken",
    );
    let configure_receipt =
        send_and_confirm(submitter, &configure_call, req.roles.executor).await?;

    Ok(UpgradeReport {
        previous,
        new_implementation: req.new_implementation,
        cooldown_seconds,
        upgrade_tx: upgrade_receipt.tx_hash,
        configure_tx: configure_receipt.tx_hash,
    })
}
