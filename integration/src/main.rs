//! Integration tests for the GHO deploy scripts. These assume that a devnet with
//! the GHO system deployed is already running locally.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]

mod abis;
mod env;
mod funding;
mod snapshot;
mod test_inventory;
mod tests;

use std::{path::PathBuf, process::exit};

use alloy::primitives::U256;
use clap::Parser;
use colored::Colorize;
use env::{TestEnv, TestEnvBuilder};
use eyre::{eyre, Result};
use funding::fund_users;
use snapshot::run_isolated;
use test_inventory::{grouped_tests, IntegrationTest};

/// The default private key for the tests, the first default account in an Anvil node
const DEFAULT_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The CLI arguments for the integration tests
#[derive(Debug, Clone, Parser)]
struct CliArgs {
    /// The path to the deployments.json file
    #[clap(long, default_value = "../deployments.devnet.json")]
    deployments: PathBuf,
    /// The private key to use for testing
    #[clap(short = 'p', long, env = "PKEY", default_value = DEFAULT_PKEY)]
    pkey: String,
    /// The RPC url to run the tests against
    #[clap(short = 'r', long, env = "RPC_URL", default_value = "http://127.0.0.1:8545")]
    rpc_url: String,
    /// The number of users to fund
    #[clap(short = 'u', long, default_value = "5")]
    users: usize,

    // --- Test Harness Args --- //
    /// The test or test group to run
    #[arg(short, long, value_parser)]
    test: Option<String>,
}

/// The balances of every user in every token they can hold
async fn user_balances(env: &TestEnv) -> Result<Vec<U256>> {
    let mut balances = Vec::new();
    for token in env.funded_tokens().into_iter().chain([env.gho]) {
        let erc20 = env.erc20(token);
        for user in &env.users {
            balances.push(erc20.balanceOf(*user).call().await?);
        }
    }

    Ok(balances)
}

/// Run the tests of a group, returning the name and result of each
async fn run_group(
    env: &TestEnv,
    tests: &[&'static IntegrationTest],
) -> Result<Vec<(&'static str, Result<()>)>> {
    let mut results = Vec::with_capacity(tests.len());
    for test in tests {
        let res = (test.test_fn)(env.clone()).await;
        results.push((test.name, res));
    }

    Ok(results)
}

/// Run every group in its own snapshot, returning whether all tests passed
async fn run_all(env: &TestEnv, filter: Option<&str>) -> Result<bool> {
    let groups = grouped_tests(filter);
    if groups.is_empty() {
        return Err(eyre!("no test matches {filter:?}"));
    }

    let mut all_passed = true;
    for (group, tests) in groups {
        println!("\n{}", format!("Running group {group}").bold());
        let before = user_balances(env).await?;
        let results = run_isolated(&env.provider, run_group(env, &tests)).await?;

        for (name, res) in results {
            match res {
                Ok(()) => println!("  {} {}", "✔".green(), name),
                Err(e) => {
                    all_passed = false;
                    println!("  {} {}: {}", "✘".red(), name, format!("{e:?}").red());
                }
            }
        }

        let after = user_balances(env).await?;
        if before != after {
            all_passed = false;
            println!("  {} balances not restored after {group}", "✘".red());
        }
    }

    Ok(all_passed)
}

#[tokio::main]
async fn main() -> Result<()> {
    let CliArgs {
        deployments,
        pkey,
        rpc_url,
        users,
        test,
    } = CliArgs::parse();

    tracing_subscriber::fmt().pretty().init();

    let env = TestEnvBuilder::new(rpc_url, deployments)
        .priv_key(pkey)
        .num_users(users)
        .build()
        .await?;
    fund_users(&env).await?;

    if run_all(&env, test.as_deref()).await? {
        println!("\n{}", "All tests passed".green().bold());
        Ok(())
    } else {
        println!("\n{}", "Some tests failed".red().bold());
        exit(1)
    }
}
