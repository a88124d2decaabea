//! Funding of the test users through the testnet faucet

use alloy::primitives::{utils::parse_units, Address, U256};
use eyre::Result;
use itertools::Itertools;
use scripts::{chain::send_and_confirm, constants::TOKEN_DECIMALS, types::ContractCall};
use tracing::info;

use crate::{abis::Faucet, env::TestEnv};

/// The amount of WETH each user is funded with, in whole tokens
const WETH_FUNDING: &str = "1000";
/// The amount of USDC each user is funded with
const USDC_FUNDING: &str = "100000";
/// The amount of REX each user is funded with
const REX_FUNDING: &str = "10";

/// Convert an amount of whole tokens into base units
fn base_units(amount: &str) -> Result<U256> {
    Ok(parse_units(amount, TOKEN_DECIMALS)?.get_absolute())
}

/// Mint `amount` of `token` to each of `users`, sending from the faucet owner
async fn mint_to_all(
    env: &TestEnv,
    owner: Address,
    token: Address,
    users: &[Address],
    amount: U256,
) -> Result<()> {
    for user in users {
        let mint = Faucet::mintCall {
            token,
            to: *user,
            amount,
        };
        let call = ContractCall::new(env.faucet, mint, format!("mint {token:#x} to {user:#x}"));
        send_and_confirm(&env.client, &call, owner).await?;
    }

    Ok(())
}

/// Fund every user of the environment with the reserve tokens.
///
/// The deployer owns the faucet. Mints go through the scripts client so the
/// deployer's nonces come from a single submitter.
pub async fn fund_users(env: &TestEnv) -> Result<()> {
    let amounts = [WETH_FUNDING, USDC_FUNDING, REX_FUNDING]
        .into_iter()
        .map(base_units)
        .collect::<Result<Vec<_>>>()?;

    for (token, amount) in env.funded_tokens().into_iter().zip_eq(amounts) {
        mint_to_all(env, env.deployer, token, &env.users, amount).await?;
    }

    info!("Funded {} users", env.users.len());
    Ok(())
}
