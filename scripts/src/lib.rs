//! Scripts for deploying and administering the GHO stablecoin contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod chain;
pub mod cli;
pub mod client;
mod commands;
pub mod constants;
pub mod contracts;
pub mod deployments;
pub mod errors;
mod solidity;
pub mod tasks;
#[cfg(test)]
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
mod test_utils;
pub mod types;
pub mod utils;
