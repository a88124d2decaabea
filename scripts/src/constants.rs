//! Constants used in the deploy scripts

use alloy::primitives::{address, b256, Address, B256};

/// The storage slot containing the admin address of an upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: B256 =
    b256!("b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// The storage slot containing the implementation address of an upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const PROXY_IMPLEMENTATION_STORAGE_SLOT: B256 =
    b256!("360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc");

/// The number of decimals of the GHO token and the testnet reserve tokens
pub const TOKEN_DECIMALS: u8 = 18;

/// The address holding operational authority over the staked token.
///
/// On a devnet fork this account is impersonated to configure the upgraded staked token.
pub const SHORT_EXECUTOR: Address = address!("ee56e2b3d491590b5b31738cc34d5232f378a8d5");

/// The distribution duration passed to a new staked token implementation, 100 years
pub const DEFAULT_DISTRIBUTION_DURATION: u128 = 3_153_600_000;

/// The default label under which the lending pool is registered as a GHO facilitator
pub const DEFAULT_FACILITATOR_LABEL: &str = "Aave V3 Pool";

/// The default bucket capacity of the lending pool facilitator, in whole GHO
pub const DEFAULT_FACILITATOR_CEILING: &str = "1000000000";

/// The key of the artifact field holding contract creation bytecode
pub const ARTIFACT_BYTECODE_KEY: &str = "bytecode";

/// The default path to the staked token implementation's compilation artifact
pub const DEFAULT_STAKED_TOKEN_ARTIFACT: &str = "artifacts/StakedREXV3.json";

/// The default path to the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default RPC url, that of a local Anvil node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

// -------------------
// | Deployment Keys |
// -------------------

/// The GHO token contract key in the `deployments.json` file
pub const GHO_TOKEN_KEY: &str = "GhoToken";

/// The lending protocol data provider key in the `deployments.json` file
pub const POOL_DATA_PROVIDER_KEY: &str = "PoolDataProvider";

/// The staked token proxy key in the `deployments.json` file
pub const STAKED_TOKEN_PROXY_KEY: &str = "StakedRexProxy";

/// The new staked token implementation key in the `deployments.json` file
pub const STAKED_TOKEN_IMPL_KEY: &str = "StakedREXV3Impl";

/// The treasury proxy key in the `deployments.json` file
pub const TREASURY_PROXY_KEY: &str = "TreasuryProxy";

/// The GHO discount rate strategy key in the `deployments.json` file
pub const DISCOUNT_RATE_STRATEGY_KEY: &str = "GhoDiscountRateStrategy";

/// The testnet faucet key in the `deployments.json` file
pub const FAUCET_KEY: &str = "Faucet";

/// The testnet WETH reserve key in the `deployments.json` file
pub const WETH_KEY: &str = "WETH";

/// The testnet USDC reserve key in the `deployments.json` file
pub const USDC_KEY: &str = "USDC";

/// The testnet REX reserve key in the `deployments.json` file
pub const REX_KEY: &str = "REX";
