use crate::SessionState;
use crate::assets::{AssetQuery, collect_holdings};
use crate::engine::output::Output;
use crate::world::World;

/// Combined inventory listing: live on-chain holdings first, then the
/// off-chain items actually carried. Never silent about a missing or
/// failing provider.
pub async fn handle_inventory(
    out: &mut Output,
    world: &World,
    state: &SessionState,
    provider: Option<&dyn AssetQuery>,
) {
    let on_chain: Vec<String> = match provider {
        None => {
            if world.assets.is_empty() {
                Vec::new()
            } else {
                vec!["unavailable (no asset provider connected)".to_string()]
            }
        }
        Some(provider) => collect_holdings(world, provider)
            .await
            .iter()
            .map(|h| h.display())
            .collect(),
    };

    let off_chain: Vec<&str> = state.inventory.iter().map(|i| i.name.as_str()).collect();

    if on_chain.is_empty() && off_chain.is_empty() {
        out.say("Inventory is empty.");
        return;
    }

    out.say("Inventory");
    if !on_chain.is_empty() {
        out.say(format!("On-chain: {}", on_chain.join(", ")));
    }
    if !off_chain.is_empty() {
        out.say(format!("Off-chain: {}", off_chain.join(", ")));
    }
}
