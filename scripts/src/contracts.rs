//! Typed handles over the contracts the scripts read from
//!
//! Each handle is bound to an address and decodes return values through a [`ChainReader`].

use alloy::primitives::{Address, U256};
use alloy_sol_types::SolCall;

use crate::{
    chain::ChainReader,
    constants::{PROXY_ADMIN_STORAGE_SLOT, PROXY_IMPLEMENTATION_STORAGE_SLOT},
    errors::ScriptError,
    solidity::{IGhoToken, IPoolDataProvider, IStakedToken},
    types::{FacilitatorInfo, ProxyState, ReserveTokens, StakedTokenImmutables},
};

/// Execute a view call and decode its return value
pub async fn read<C: SolCall>(
    reader: &impl ChainReader,
    to: Address,
    call: C,
) -> Result<C::Return, ScriptError> {
    let output = reader.call(to, call.abi_encode().into()).await?;
    C::abi_decode_returns(&output).map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

/// Ensure that a contract is deployed at `address`
pub async fn ensure_deployed(
    reader: &impl ChainReader,
    name: &str,
    address: Address,
) -> Result<(), ScriptError> {
    if reader.code_at(address).await?.is_empty() {
        return Err(ScriptError::DeploymentNotFound(format!(
            "no code for {name} at {address:#x}"
        )));
    }

    Ok(())
}

/// An EIP1967 upgradeable proxy
pub struct Proxy<'a, R> {
    /// The proxy address
    address: Address,
    /// The reader used to query the proxy
    reader: &'a R,
}

impl<'a, R: ChainReader> Proxy<'a, R> {
    /// Bind a handle to the proxy at `address`
    pub fn new(address: Address, reader: &'a R) -> Self {
        Self { address, reader }
    }

    /// Read the implementation the proxy delegates to
    pub async fn implementation(&self) -> Result<Address, ScriptError> {
        let word = self
            .reader
            .storage_at(self.address, PROXY_IMPLEMENTATION_STORAGE_SLOT)
            .await?;
        Ok(Address::from_word(word))
    }

    /// Read the address allowed to upgrade the proxy.
    ///
    /// The admin is read from its storage slot, calls to `admin()` from a
    /// non-admin address are forwarded to the implementation.
    pub async fn admin(&self) -> Result<Address, ScriptError> {
        let word = self
            .reader
            .storage_at(self.address, PROXY_ADMIN_STORAGE_SLOT)
            .await?;
        Ok(Address::from_word(word))
    }

    /// Read the full proxy state
    pub async fn state(&self) -> Result<ProxyState, ScriptError> {
        Ok(ProxyState {
            proxy: self.address,
            implementation: self.implementation().await?,
            admin: self.admin().await?,
        })
    }
}

/// The staked token, read through its proxy
pub struct StakedToken<'a, R> {
    /// The staked token address
    address: Address,
    /// The reader used to query the token
    reader: &'a R,
}

impl<'a, R: ChainReader> StakedToken<'a, R> {
    /// Bind a handle to the staked token at `address`
    pub fn new(address: Address, reader: &'a R) -> Self {
        Self { address, reader }
    }

    /// The cooldown stakers wait before redeeming
    pub async fn cooldown_seconds(&self) -> Result<U256, ScriptError> {
        read(self.reader, self.address, IStakedToken::COOLDOWN_SECONDSCall {}).await
    }

    /// The immutables needed to deploy a new implementation behind the same proxy
    pub async fn immutables(&self) -> Result<StakedTokenImmutables, ScriptError> {
        let to = self.address;
        Ok(StakedTokenImmutables {
            staked_token: read(self.reader, to, IStakedToken::STAKED_TOKENCall {}).await?,
            reward_token: read(self.reader, to, IStakedToken::REWARD_TOKENCall {}).await?,
            unstake_window: read(self.reader, to, IStakedToken::UNSTAKE_WINDOWCall {}).await?,
            rewards_vault: read(self.reader, to, IStakedToken::REWARDS_VAULTCall {}).await?,
            emission_manager: read(self.reader, to, IStakedToken::EMISSION_MANAGERCall {}).await?,
        })
    }
}

/// The GHO token
pub struct GhoToken<'a, R> {
    /// The token address
    address: Address,
    /// The reader used to query the token
    reader: &'a R,
}

impl<'a, R: ChainReader> GhoToken<'a, R> {
    /// Bind a handle to the GHO token at `address`
    pub fn new(address: Address, reader: &'a R) -> Self {
        Self { address, reader }
    }

    /// Read the registration of `facilitator`, `None` if it is not registered
    pub async fn facilitator(
        &self,
        facilitator: Address,
    ) -> Result<Option<FacilitatorInfo>, ScriptError> {
        let entry = read(
            self.reader,
            self.address,
            IGhoToken::getFacilitatorCall::new((facilitator,)),
        )
        .await?;

        // The token deletes the whole entry when removing a facilitator
        if entry.label.is_empty() {
            return Ok(None);
        }

        Ok(Some(FacilitatorInfo {
            label: entry.label,
            bucket_capacity: entry.bucketCapacity,
            bucket_level: entry.bucketLevel,
        }))
    }
}

/// The lending protocol's data provider
pub struct PoolDataProvider<'a, R> {
    /// The data provider address
    address: Address,
    /// The reader used to query the data provider
    reader: &'a R,
}

impl<'a, R: ChainReader> PoolDataProvider<'a, R> {
    /// Bind a handle to the data provider at `address`
    pub fn new(address: Address, reader: &'a R) -> Self {
        Self { address, reader }
    }

    /// The tokens created for the reserve of `asset`
    pub async fn reserve_tokens(&self, asset: Address) -> Result<ReserveTokens, ScriptError> {
        let tokens = read(
            self.reader,
            self.address,
            IPoolDataProvider::getReserveTokensAddressesCall::new((asset,)),
        )
        .await?;

        if tokens.aTokenAddress == Address::ZERO {
            return Err(ScriptError::DeploymentNotFound(format!(
                "no reserve listed for {asset:#x}"
            )));
        }

        Ok(ReserveTokens {
            a_token: tokens.aTokenAddress,
            stable_debt_token: tokens.stableDebtTokenAddress,
            variable_debt_token: tokens.variableDebtTokenAddress,
        })
    }
}
