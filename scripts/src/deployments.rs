//! Utilities for reading and writing deployment addresses in a JSON file
//!
//! The file is a flat object mapping logical contract names to hex addresses.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::primitives::Address;
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::ScriptError;

/// Resolves logical contract names to their current on-chain address
pub trait AddressResolver {
    /// Get the address deployed under `name`
    fn resolve(&self, name: &str) -> Result<Address, ScriptError>;
}

/// The deployments file
#[derive(Clone, Debug)]
pub struct Deployments {
    /// The path of the deployments file
    path: PathBuf,
    /// The parsed entries of the file
    entries: Map<String, Value>,
}

impl Deployments {
    /// Load the deployments file at `path`, treating a missing file as empty
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                entries: Map::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            ScriptError::ReadDeployments(format!("{}: {}", path.display(), e))
        })?;
        let entries = match serde_json::from_str(&content) {
            Ok(Value::Object(entries)) => entries,
            Ok(_) => {
                return Err(ScriptError::ReadDeployments(format!(
                    "{} is not a JSON object",
                    path.display()
                )))
            }
            Err(e) => return Err(ScriptError::ReadDeployments(e.to_string())),
        };

        Ok(Self { path, entries })
    }

    /// Record `address` under `name` and write the file back to disk
    pub fn record(&mut self, name: &str, address: Address) -> Result<(), ScriptError> {
        self.entries
            .insert(name.to_string(), Value::String(format!("{address:#x}")));

        let content = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| {
            ScriptError::WriteDeployments(format!("{}: {}", self.path.display(), e))
        })?;

        info!("Recorded {name} at {address:#x} in {}", self.path.display());
        Ok(())
    }
}

impl AddressResolver for Deployments {
    fn resolve(&self, name: &str) -> Result<Address, ScriptError> {
        let addr_str = self
            .entries
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ScriptError::DeploymentNotFound(format!(
                    "key {} not found in {}",
                    name,
                    self.path.display()
                ))
            })?;

        Address::from_str(addr_str).map_err(|e| {
            ScriptError::ReadDeployments(format!("failed to parse address {}: {}", addr_str, e))
        })
    }
}
