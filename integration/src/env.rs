//! The fixture handed to each integration test

use std::path::PathBuf;

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider},
    transports::http::reqwest::Url,
};
use eyre::{eyre, Result};
use scripts::{
    client::{node_provider_builder, RpcClient},
    constants::{
        DISCOUNT_RATE_STRATEGY_KEY, FAUCET_KEY, GHO_TOKEN_KEY, POOL_DATA_PROVIDER_KEY, REX_KEY,
        STAKED_TOKEN_IMPL_KEY, STAKED_TOKEN_PROXY_KEY, TREASURY_PROXY_KEY, USDC_KEY, WETH_KEY,
    },
    contracts::PoolDataProvider,
    deployments::{AddressResolver, Deployments},
    types::ReserveTokens,
};

use crate::abis::ERC20::ERC20Instance;

/// The GHO system under test, with the accounts taking part in the tests
#[derive(Clone)]
pub struct TestEnv {
    /// The scripts client, signing as the deployer
    pub client: RpcClient,
    /// A provider for devnet calls and read-only contract instances
    pub provider: DynProvider,
    /// The deployer, which also owns the GHO token and the faucet
    pub deployer: Address,
    /// The funded test users
    pub users: Vec<Address>,
    /// The GHO token
    pub gho: Address,
    /// The tokens of the GHO reserve
    pub reserve: ReserveTokens,
    /// The treasury receiving GHO interest
    pub treasury: Address,
    /// The GHO discount rate strategy
    pub discount_rate_strategy: Address,
    /// The staked token proxy
    pub staked_token: Address,
    /// The staked token implementation deployed for the upgrade, if any
    pub staked_token_impl: Option<Address>,
    /// The testnet faucet
    pub faucet: Address,
    /// The testnet WETH reserve token
    pub weth: Address,
    /// The testnet USDC reserve token
    pub usdc: Address,
    /// The REX token
    pub rex: Address,
}

impl TestEnv {
    /// The reserve tokens users are funded with
    pub fn funded_tokens(&self) -> [Address; 3] {
        [self.weth, self.usdc, self.rex]
    }

    /// A read-only ERC20 instance
    pub fn erc20(&self, token: Address) -> ERC20Instance<DynProvider> {
        ERC20Instance::new(token, self.provider.clone())
    }
}

/// Builds a [`TestEnv`] from the deployments of a devnet
pub struct TestEnvBuilder {
    /// The RPC url of the devnet
    rpc_url: String,
    /// The private key of the deployer
    priv_key: String,
    /// The path of the deployments file
    deployments_path: PathBuf,
    /// The maximum number of users to fund
    num_users: usize,
}

impl TestEnvBuilder {
    /// A builder for the devnet at `rpc_url`, resolving addresses from `deployments_path`
    pub fn new(rpc_url: impl Into<String>, deployments_path: impl Into<PathBuf>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            priv_key: String::new(),
            deployments_path: deployments_path.into(),
            num_users: usize::MAX,
        }
    }

    /// Set the private key of the deployer
    pub fn priv_key(mut self, priv_key: impl Into<String>) -> Self {
        self.priv_key = priv_key.into();
        self
    }

    /// Limit the number of funded users
    pub fn num_users(mut self, num_users: usize) -> Self {
        self.num_users = num_users;
        self
    }

    /// Connect to the devnet and resolve every contract of the system
    pub async fn build(self) -> Result<TestEnv> {
        let client = RpcClient::connect(&self.rpc_url, &[self.priv_key]).await?;
        let url: Url = self.rpc_url.parse()?;
        let provider = node_provider_builder().connect_http(url).erased();

        let deployer = client.deployer();
        let users = provider
            .get_accounts()
            .await?
            .into_iter()
            .filter(|account| *account != deployer)
            .take(self.num_users)
            .collect::<Vec<_>>();
        if users.is_empty() {
            return Err(eyre!("the devnet exposes no accounts besides the deployer"));
        }

        let deployments = Deployments::load(&self.deployments_path)?;
        let gho = deployments.resolve(GHO_TOKEN_KEY)?;
        let data_provider = deployments.resolve(POOL_DATA_PROVIDER_KEY)?;
        let reserve = PoolDataProvider::new(data_provider, &client)
            .reserve_tokens(gho)
            .await?;

        Ok(TestEnv {
            client,
            provider,
            deployer,
            users,
            gho,
            reserve,
            treasury: deployments.resolve(TREASURY_PROXY_KEY)?,
            discount_rate_strategy: deployments.resolve(DISCOUNT_RATE_STRATEGY_KEY)?,
            staked_token: deployments.resolve(STAKED_TOKEN_PROXY_KEY)?,
            staked_token_impl: deployments.resolve(STAKED_TOKEN_IMPL_KEY).ok(),
            faucet: deployments.resolve(FAUCET_KEY)?,
            weth: deployments.resolve(WETH_KEY)?,
            usdc: deployments.resolve(USDC_KEY)?,
            rex: deployments.resolve(REX_KEY)?,
        })
    }
}
