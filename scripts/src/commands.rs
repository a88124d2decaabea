//! Implementations of the CLI commands
//!
//! Each command resolves its addresses from the deployments file and runs the
//! matching procedure against the RPC client.

use alloy::primitives::Address;

use crate::{
    chain::ChainReader,
    cli::{DeployStakedTokenImplArgs, RegisterFacilitatorArgs, UpgradeStakedTokenArgs},
    client::RpcClient,
    constants::{
        DEFAULT_DISTRIBUTION_DURATION, DISCOUNT_RATE_STRATEGY_KEY, GHO_TOKEN_KEY,
        POOL_DATA_PROVIDER_KEY, STAKED_TOKEN_IMPL_KEY, STAKED_TOKEN_PROXY_KEY,
        TREASURY_PROXY_KEY,
    },
    contracts::{ensure_deployed, PoolDataProvider},
    deployments::{AddressResolver, Deployments},
    errors::ScriptError,
    tasks::{
        deploy::{self, read_artifact_bytecode},
        facilitator::{self, FacilitatorRequest, RegistrationOutcome},
        upgrade::{self, select_admin, SignerRoles, UpgradeRequest},
        wiring::{self, CompanionContracts, StepOutcome},
    },
    types::{FacilitatorConfig, ReserveTokens},
    utils::whole_tokens_to_base_units,
};

/// Resolve a deployment and ensure it has code
async fn resolve_deployed(
    reader: &impl ChainReader,
    deployments: &impl AddressResolver,
    name: &str,
) -> Result<Address, ScriptError> {
    let address = deployments.resolve(name)?;
    ensure_deployed(reader, name, address).await?;
    Ok(address)
}

/// Resolve the GHO reserve tokens through the data provider
async fn gho_reserve_tokens(
    reader: &impl ChainReader,
    deployments: &impl AddressResolver,
) -> Result<(Address, ReserveTokens), ScriptError> {
    let gho = resolve_deployed(reader, deployments, GHO_TOKEN_KEY).await?;
    let data_provider = resolve_deployed(reader, deployments, POOL_DATA_PROVIDER_KEY).await?;
    let tokens = PoolDataProvider::new(data_provider, reader)
        .reserve_tokens(gho)
        .await?;

    Ok((gho, tokens))
}

/// Register the GHO aToken, or the given address, as a GHO facilitator
pub async fn register_facilitator(
    args: RegisterFacilitatorArgs,
    client: &RpcClient,
    deployments: &Deployments,
) -> Result<(), ScriptError> {
    let (gho, tokens) = gho_reserve_tokens(client, deployments).await?;
    let facilitator = args.facilitator.unwrap_or(tokens.a_token);

    let req = FacilitatorRequest {
        token: gho,
        facilitator,
        config: FacilitatorConfig {
            label: args.label,
            ceiling: whole_tokens_to_base_units(args.ceiling)?,
        },
        from: client.deployer(),
    };

    match facilitator::register_facilitator(client, client, req).await? {
        RegistrationOutcome::Registered {
            tx_hash,
            facilitator,
        } => {
            println!("Facilitator registered: {facilitator:#x}");
            println!("Registration tx: {tx_hash:#x}");
        }
        RegistrationOutcome::AlreadyRegistered(info) => {
            println!(
                "{facilitator:#x} already registered as \"{}\" with capacity {}",
                info.label, info.bucket_capacity
            );
        }
    }

    Ok(())
}

/// Resolve the contracts wired by `wire-addresses`, each of which must have code
async fn companion_contracts(
    reader: &impl ChainReader,
    deployments: &impl AddressResolver,
) -> Result<CompanionContracts, ScriptError> {
    let (_, tokens) = gho_reserve_tokens(reader, deployments).await?;
    Ok(CompanionContracts {
        gho_a_token: tokens.a_token,
        gho_variable_debt_token: tokens.variable_debt_token,
        treasury: resolve_deployed(reader, deployments, TREASURY_PROXY_KEY).await?,
        discount_rate_strategy: resolve_deployed(reader, deployments, DISCOUNT_RATE_STRATEGY_KEY)
            .await?,
        staked_token: resolve_deployed(reader, deployments, STAKED_TOKEN_PROXY_KEY).await?,
    })
}

/// Wire the GHO companion contracts together
pub async fn wire_addresses(
    client: &RpcClient,
    deployments: &Deployments,
) -> Result<(), ScriptError> {
    let contracts = companion_contracts(client, deployments).await?;
    let steps = wiring::wire_addresses(client, client, &contracts, client.deployer()).await?;
    for (step, outcome) in steps {
        match outcome {
            StepOutcome::Submitted(tx_hash) => {
                println!("{} set to {:#x} in tx {tx_hash:#x}", step.name, step.value)
            }
            StepOutcome::AlreadySet => println!("{} already set to {:#x}", step.name, step.value),
        }
    }

    Ok(())
}

/// Deploy a new staked token implementation and record it in the deployments file
pub async fn deploy_staked_token_impl(
    args: DeployStakedTokenImplArgs,
    client: &RpcClient,
    mut deployments: Deployments,
) -> Result<(), ScriptError> {
    let proxy = resolve_deployed(client, &deployments, STAKED_TOKEN_PROXY_KEY).await?;
    let bytecode = read_artifact_bytecode(&args.artifact)?;
    let duration = args
        .distribution_duration
        .unwrap_or(DEFAULT_DISTRIBUTION_DURATION);

    let deployed = deploy::deploy_staked_token_impl(
        client,
        client,
        proxy,
        &bytecode,
        duration,
        client.deployer(),
    )
    .await?;
    deployments.record(STAKED_TOKEN_IMPL_KEY, deployed.address)?;

    println!("Staked token implementation deployed at {:#x}", deployed.address);
    println!("Deployment tx: {:#x}", deployed.tx_hash);
    Ok(())
}

/// Upgrade the staked token proxy and set its GHO debt token
pub async fn upgrade_staked_token(
    args: UpgradeStakedTokenArgs,
    client: &RpcClient,
    deployments: &Deployments,
) -> Result<(), ScriptError> {
    let proxy = resolve_deployed(client, deployments, STAKED_TOKEN_PROXY_KEY).await?;
    let new_implementation = match args.implementation {
        Some(implementation) => implementation,
        None => deployments.resolve(STAKED_TOKEN_IMPL_KEY)?,
    };
    let (_, tokens) = gho_reserve_tokens(client, deployments).await?;

    let deployer = client.deployer();
    let admin = select_admin(client, client, proxy, deployer).await?;
    let req = UpgradeRequest {
        proxy,
        new_implementation,
        gho_debt_token: tokens.variable_debt_token,
        roles: SignerRoles {
            deployer,
            admin,
            executor: args.executor,
        },
    };

    let report = upgrade::upgrade_staked_token(client, client, req).await?;
    println!("Staked token upgrade tx: {:#x}", report.upgrade_tx);
    println!(
        "Staked token implementation set to: {:#x} (was {:#x})",
        report.new_implementation, report.previous.implementation
    );
    println!("Cooldown kept at {} seconds", report.cooldown_seconds);
    println!("GHO debt token set in tx: {:#x}", report.configure_tx);
    Ok(())
}
