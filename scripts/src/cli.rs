//! Definitions of CLI arguments and commands for the GHO scripts

use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::{
    client::RpcClient,
    commands::{deploy_staked_token_impl, register_facilitator, upgrade_staked_token, wire_addresses},
    constants::{
        DEFAULT_DEPLOYMENTS_PATH, DEFAULT_FACILITATOR_CEILING, DEFAULT_FACILITATOR_LABEL,
        DEFAULT_RPC_URL, DEFAULT_STAKED_TOKEN_ARTIFACT, SHORT_EXECUTOR,
    },
    deployments::Deployments,
    errors::ScriptError,
};

/// Deployment and administration scripts for the GHO stablecoin
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Path to the file in which deployed addresses are stored
    #[arg(short, long = "deployments", env = "DEPLOYMENTS_PATH", default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Additional private keys, e.g. that of the staked token's proxy admin
    #[arg(long, value_delimiter = ',')]
    pub signer_keys: Vec<String>,

    /// Accounts to unlock on a devnet node and send transactions from
    #[arg(long, value_delimiter = ',')]
    pub impersonate: Vec<Address>,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// All private keys given, the deployer's first
    pub fn priv_keys(&self) -> Vec<String> {
        let mut keys = vec![self.priv_key.clone()];
        keys.extend(self.signer_keys.iter().cloned());
        keys
    }
}

/// The scripts
#[derive(Subcommand)]
pub enum Command {
    /// Register the GHO aToken as a facilitator of the GHO token
    RegisterFacilitator(RegisterFacilitatorArgs),
    /// Set the cross references between the GHO companion contracts
    WireAddresses,
    /// Deploy a new staked token implementation, keeping the current immutables
    DeployStakedTokenImpl(DeployStakedTokenImplArgs),
    /// Upgrade the staked token proxy to the recorded implementation
    UpgradeStakedToken(UpgradeStakedTokenArgs),
}

impl Command {
    /// Run the command
    pub async fn run(
        self,
        client: RpcClient,
        deployments: Deployments,
    ) -> Result<(), ScriptError> {
        match self {
            Command::RegisterFacilitator(args) => {
                register_facilitator(args, &client, &deployments).await
            }
            Command::WireAddresses => wire_addresses(&client, &deployments).await,
            Command::DeployStakedTokenImpl(args) => {
                deploy_staked_token_impl(args, &client, deployments).await
            }
            Command::UpgradeStakedToken(args) => {
                upgrade_staked_token(args, &client, &deployments).await
            }
        }
    }
}

/// Grant minting rights over GHO to a facilitator
#[derive(Args)]
pub struct RegisterFacilitatorArgs {
    /// The label of the facilitator
    #[arg(short, long, default_value = DEFAULT_FACILITATOR_LABEL)]
    pub label: String,

    /// The bucket capacity of the facilitator, in whole GHO
    #[arg(short, long, default_value = DEFAULT_FACILITATOR_CEILING)]
    pub ceiling: u128,

    /// The facilitator address, defaults to the GHO aToken
    #[arg(short, long)]
    pub facilitator: Option<Address>,
}

/// Deploy a staked token implementation
#[derive(Args)]
pub struct DeployStakedTokenImplArgs {
    /// Path to the compilation artifact of the implementation
    #[arg(short, long, default_value = DEFAULT_STAKED_TOKEN_ARTIFACT)]
    pub artifact: PathBuf,

    /// Duration of the reward distribution, in seconds
    #[arg(long)]
    pub distribution_duration: Option<u128>,
}

/// Upgrade the staked token
#[derive(Args)]
pub struct UpgradeStakedTokenArgs {
    /// The new implementation, defaults to the one in the deployments file
    #[arg(short, long)]
    pub implementation: Option<Address>,

    /// The account configuring the upgraded staked token
    #[arg(short, long, default_value_t = SHORT_EXECUTOR)]
    pub executor: Address,
}

#[cfg(test)]
mod tests {
    use alloy::primitives::Address;
    use clap::Parser;

    use crate::constants::{DEFAULT_FACILITATOR_LABEL, SHORT_EXECUTOR};

    use super::{Cli, Command};

    #[test]
    fn test_subcommands_run_without_arguments() {
        let cli = Cli::try_parse_from(["gho-scripts", "-p", "0x01", "register-facilitator"])
            .unwrap();
        let Command::RegisterFacilitator(args) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.label, DEFAULT_FACILITATOR_LABEL);
        assert_eq!(args.ceiling, 1_000_000_000);
        assert!(args.facilitator.is_none());

        let cli =
            Cli::try_parse_from(["gho-scripts", "-p", "0x01", "upgrade-staked-token"]).unwrap();
        let Command::UpgradeStakedToken(args) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.executor, SHORT_EXECUTOR);
    }

    #[test]
    fn test_extra_signers_follow_deployer() {
        let admin = Address::repeat_byte(0x02);
        let cli = Cli::try_parse_from([
            "gho-scripts",
            "-p",
            "0x01",
            "--signer-keys",
            "0x02,0x03",
            "--impersonate",
            &admin.to_string(),
            "wire-addresses",
        ])
        .unwrap();

        assert_eq!(cli.priv_keys(), vec!["0x01", "0x02", "0x03"]);
        assert_eq!(cli.impersonate, vec![admin]);
    }
}
