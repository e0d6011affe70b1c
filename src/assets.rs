use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::world::{AssetSpec, World};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset provider unavailable")]
    Unavailable,

    #[error("query failed: {0}")]
    Query(String),
}

/// Boundary to the external ownership-verification service. Implementations
/// may suspend; callers re-check session preconditions after awaiting and
/// must surface errors instead of reading them as zero.
#[async_trait]
pub trait AssetQuery: Send + Sync {
    /// Quantity of `asset` owned by the connected account.
    async fn balance(&self, asset: &AssetSpec) -> Result<u64, AssetError>;
}

/// Fixed balances keyed by contract reference. Serves the demo front-end
/// and tests; a chain-backed provider lives outside this crate.
#[derive(Default)]
pub struct MemoryAssets {
    balances: HashMap<String, u64>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, contract: impl Into<String>, amount: u64) -> Self {
        self.balances.insert(contract.into(), amount);
        self
    }
}

#[async_trait]
impl AssetQuery for MemoryAssets {
    async fn balance(&self, asset: &AssetSpec) -> Result<u64, AssetError> {
        Ok(self.balances.get(&asset.contract).copied().unwrap_or(0))
    }
}

/// One display row of the on-chain inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Holding {
    Owned { name: String, count: u64 },
    Failed { name: String, detail: String },
}

impl Holding {
    pub fn display(&self) -> String {
        match self {
            Holding::Owned { name, count } if *count > 1 => format!("{} (x{})", name, count),
            Holding::Owned { name, .. } => name.clone(),
            Holding::Failed { name, detail } => format!("{}: error ({})", name, detail),
        }
    }
}

/// Query every whitelisted asset and aggregate owned quantities by display
/// name. Zero balances are omitted; failures stay visible as their own row.
pub async fn collect_holdings(world: &World, provider: &dyn AssetQuery) -> Vec<Holding> {
    let mut holdings: Vec<Holding> = Vec::new();

    for asset in &world.assets {
        match provider.balance(asset).await {
            Ok(0) => {}
            Ok(n) => {
                let merged = holdings.iter_mut().find_map(|h| match h {
                    Holding::Owned { name, count } if name.eq_ignore_ascii_case(&asset.name) => {
                        Some(count)
                    }
                    _ => None,
                });
                match merged {
                    Some(count) => *count += n,
                    None => holdings.push(Holding::Owned {
                        name: asset.name.clone(),
                        count: n,
                    }),
                }
            }
            Err(e) => {
                tracing::warn!(asset = %asset.name, error = %e, "asset balance query failed");
                holdings.push(Holding::Failed {
                    name: asset.name.clone(),
                    detail: e.to_string(),
                });
            }
        }
    }

    holdings
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::load_world_from_str;

    fn world() -> World {
        load_world_from_str(
            r#"
            [world]
            id = "t"
            name = "Test"
            start_room = "a"

            [rooms.a]
            description = "A."

            [[asset]]
            name = "Sigil"
            description = "A sigil."
            contract = "0xaaa"

            [[asset]]
            name = "Shard"
            description = "A shard."
            contract = "0xbbb"
        "#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn zero_balances_are_omitted() {
        let world = world();
        let provider = MemoryAssets::new().with_balance("0xaaa", 1);
        let holdings = collect_holdings(&world, &provider).await;
        assert_eq!(
            holdings,
            vec![Holding::Owned {
                name: "Sigil".into(),
                count: 1
            }]
        );
    }

    #[tokio::test]
    async fn counts_render_with_a_multiplier_suffix() {
        let world = world();
        let provider = MemoryAssets::new().with_balance("0xbbb", 3);
        let holdings = collect_holdings(&world, &provider).await;
        assert_eq!(holdings[0].display(), "Shard (x3)");
    }

    #[tokio::test]
    async fn failures_are_distinct_from_zero() {
        let world = world();
        let holdings = collect_holdings(&world, &testing::FailingAssets).await;
        // both queries failed, both rows stay visible
        assert_eq!(holdings.len(), 2);
        assert!(holdings[0].display().contains("error (query failed: rpc timeout)"));
    }
}
