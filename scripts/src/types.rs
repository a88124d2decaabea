//! Type definitions used throughout the scripts

use alloy::primitives::{Address, Bytes, Log, TxHash, U256};
use alloy_sol_types::SolCall;

use crate::solidity::IStakedToken;

/// The state of an upgradeable proxy, as read from its EIP1967 storage slots
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProxyState {
    /// The address of the proxy
    pub proxy: Address,
    /// The implementation the proxy currently delegates to
    pub implementation: Address,
    /// The address allowed to upgrade the proxy
    pub admin: Address,
}

/// The arguments of the staked token's `initialize` call, made atomically with an upgrade
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeInitArgs {
    /// The address allowed to slash stakers
    pub slashing_admin: Address,
    /// The address allowed to pause cooldowns
    pub cooldown_pause_admin: Address,
    /// The address allowed to claim on behalf of stakers
    pub claim_helper: Address,
    /// The maximum percentage of stake which can be slashed
    pub max_slashable_percentage: U256,
    /// The cooldown duration, copied from the outgoing implementation
    pub cooldown_seconds: U256,
}

impl UpgradeInitArgs {
    /// Build the initialization arguments for an upgrade signed by `admin`.
    ///
    /// `cooldown_seconds` must be read from the outgoing implementation so that
    /// cooldowns already started by stakers remain valid after the swap.
    pub fn new(admin: Address, cooldown_seconds: U256) -> Self {
        Self {
            slashing_admin: admin,
            cooldown_pause_admin: admin,
            claim_helper: admin,
            max_slashable_percentage: U256::ZERO,
            cooldown_seconds,
        }
    }

    /// ABI-encode the `initialize` call
    pub fn calldata(&self) -> Bytes {
        IStakedToken::initializeCall::new((
            self.slashing_admin,
            self.cooldown_pause_admin,
            self.claim_helper,
            self.max_slashable_percentage,
            self.cooldown_seconds,
        ))
        .abi_encode()
        .into()
    }
}

/// The tokens the lending protocol created for a reserve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReserveTokens {
    /// The yield-bearing token
    pub a_token: Address,
    /// The stable debt token
    pub stable_debt_token: Address,
    /// The variable debt token
    pub variable_debt_token: Address,
}

/// The requested registration of a facilitator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacilitatorConfig {
    /// The human-readable label of the facilitator
    pub label: String,
    /// The bucket capacity, in base units
    pub ceiling: u128,
}

/// A facilitator's registration as stored in the GHO token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacilitatorInfo {
    /// The label the facilitator is registered under
    pub label: String,
    /// The maximum amount the facilitator may mint
    pub bucket_capacity: u128,
    /// The amount the facilitator has minted
    pub bucket_level: u128,
}

/// The immutable parameters of a staked token implementation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakedTokenImmutables {
    /// The token being staked
    pub staked_token: Address,
    /// The token paid out as rewards
    pub reward_token: Address,
    /// The window after the cooldown in which stake may be redeemed
    pub unstake_window: U256,
    /// The vault rewards are paid from
    pub rewards_vault: Address,
    /// The address configuring reward emissions
    pub emission_manager: Address,
}

/// A single encoded contract call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    /// The contract being called
    pub to: Address,
    /// The ABI-encoded calldata
    pub data: Bytes,
    /// A human-readable description, used in logs and errors
    pub description: String,
}

impl ContractCall {
    /// Encode `call` against the contract at `to`
    pub fn new<C: SolCall>(to: Address, call: C, description: impl Into<String>) -> Self {
        Self {
            to,
            data: call.abi_encode().into(),
            description: description.into(),
        }
    }
}

/// The receipt of a confirmed transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// The transaction hash
    pub tx_hash: TxHash,
    /// Whether the transaction executed without reverting
    pub success: bool,
    /// The address of the created contract, for deployments
    pub contract_address: Option<Address>,
    /// The logs emitted by the transaction
    pub logs: Vec<Log>,
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, U256};
    use alloy_sol_types::SolCall;

    use crate::solidity::IStakedToken::initializeCall;

    use super::UpgradeInitArgs;

    #[test]
    fn test_init_args_repeat_admin_and_zero_slashing() {
        let admin = Address::repeat_byte(0xaa);
        let args = UpgradeInitArgs::new(admin, U256::from(864_000));

        let decoded = initializeCall::abi_decode(&args.calldata()).unwrap();
        assert_eq!(decoded.slashingAdmin, admin);
        assert_eq!(decoded.cooldownPauseAdmin, admin);
        assert_eq!(decoded.claimHelper, admin);
        assert_eq!(decoded.maxSlashablePercentage, U256::ZERO);
        assert_eq!(decoded.cooldownSeconds, U256::from(864_000));
    }
}
