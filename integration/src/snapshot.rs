//! Isolation of test groups through devnet snapshots

use std::future::Future;

use alloy::{
    primitives::U256,
    providers::{ext::AnvilApi, DynProvider},
};
use async_trait::async_trait;
use eyre::{eyre, Result};
use tracing::debug;

/// A chain whose state can be saved and restored
#[async_trait]
pub trait ChainSnapshots: Send + Sync {
    /// Save the current state, returning the snapshot id
    async fn snapshot(&self) -> Result<U256>;

    /// Restore the state saved under `id`, returning whether it existed
    async fn restore(&self, id: U256) -> Result<bool>;
}

#[async_trait]
impl ChainSnapshots for DynProvider {
    async fn snapshot(&self) -> Result<U256> {
        Ok(self.anvil_snapshot().await?)
    }

    async fn restore(&self, id: U256) -> Result<bool> {
        Ok(self.anvil_revert(id).await?)
    }
}

/// Run `body` and restore the chain to its prior state, whether or not `body` failed
pub async fn run_isolated<S, F, T>(chain: &S, body: F) -> Result<T>
where
    S: ChainSnapshots,
    F: Future<Output = Result<T>>,
{
    let id = chain.snapshot().await?;
    debug!("Took snapshot {id}");

    let res = body.await;
    if !chain.restore(id).await? {
        return Err(eyre!("snapshot {id} could not be restored"));
    }
    debug!("Restored snapshot {id}");

    res
}
