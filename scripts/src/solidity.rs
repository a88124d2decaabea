//! Definitions of Solidity functions called by the scripts

use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IUpgradeabilityProxy {
        function upgradeToAndCall(address newImplementation, bytes calldata data) external payable;
    }
}

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IStakedToken {
        function STAKED_TOKEN() external view returns (address);
        function REWARD_TOKEN() external view returns (address);
        function UNSTAKE_WINDOW() external view returns (uint256);
        function REWARDS_VAULT() external view returns (address);
        function EMISSION_MANAGER() external view returns (address);
        function COOLDOWN_SECONDS() external view returns (uint256);

        function initialize(
            address slashingAdmin,
            address cooldownPauseAdmin,
            address claimHelper,
            uint256 maxSlashablePercentage,
            uint256 cooldownSeconds
        ) external;

        function setGHODebtToken(address newGHODebtToken) external;
    }
}

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IGhoToken {
        struct Facilitator {
            uint128 bucketCapacity;
            uint128 bucketLevel;
            string label;
        }

        function addFacilitator(address facilitatorAddress, string calldata facilitatorLabel, uint128 bucketCapacity) external;
        function getFacilitator(address facilitator) external view returns (Facilitator memory);

        event FacilitatorAdded(address indexed facilitatorAddress, bytes32 indexed label, uint256 bucketCapacity);
    }
}

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IGhoAToken {
        function updateGhoTreasury(address newGhoTreasury) external;
        function getGhoTreasury() external view returns (address);
        function setVariableDebtToken(address ghoVariableDebtToken) external;
        function getVariableDebtToken() external view returns (address);
    }
}

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IGhoVariableDebtToken {
        function setAToken(address ghoAToken) external;
        function getAToken() external view returns (address);
        function updateDiscountRateStrategy(address newDiscountRateStrategy) external;
        function getDiscountRateStrategy() external view returns (address);
        function updateDiscountToken(address newDiscountToken) external;
        function getDiscountToken() external view returns (address);
    }
}

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IPoolDataProvider {
        function getReserveTokensAddresses(address asset)
            external
            view
            returns (address aTokenAddress, address stableDebtTokenAddress, address variableDebtTokenAddress);
    }
}
