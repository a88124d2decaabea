//! Utilities for the GHO scripts

use alloy::primitives::utils::parse_units;

use crate::{constants::TOKEN_DECIMALS, errors::ScriptError};

/// Convert an amount of whole tokens into base units
pub fn whole_tokens_to_base_units(amount: u128) -> Result<u128, ScriptError> {
    let units = parse_units(&amount.to_string(), TOKEN_DECIMALS)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?
        .get_absolute();

    u128::try_from(units).map_err(|_| {
        ScriptError::CalldataConstruction(format!("{amount} tokens overflow a uint128"))
    })
}
