//! Solidity bindings for the testnet contracts used by the harness

use alloy::sol;

sol! {
    /// The testnet faucet, minting reserve tokens to arbitrary accounts
    contract Faucet {
        function mint(address token, address to, uint256 amount) external returns (uint256);
    }

    /// The subset of ERC20 read by the harness
    #[sol(rpc)]
    contract ERC20 {
        function balanceOf(address account) external view returns (uint256);
    }

    /// The staked token, read through its proxy
    #[sol(rpc)]
    contract StakedToken {
        function COOLDOWN_SECONDS() external view returns (uint256);
        function getGHODebtToken() external view returns (address);
    }
}
