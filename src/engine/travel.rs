use crate::SessionState;
use crate::assets::AssetQuery;
use crate::engine::movement::enter_room;
use crate::engine::output::Output;
use crate::world::World;

/// Teleport to a configured destination, gated on live ownership of the
/// port key asset. The balance check can suspend, so the destination is
/// resolved again after the await before any state changes.
pub async fn handle_port(
    out: &mut Output,
    world: &World,
    state: &mut SessionState,
    provider: Option<&dyn AssetQuery>,
    arg: &str,
) {
    let Some(port) = &world.port else {
        out.say("Porting is not possible in this world.");
        return;
    };

    let Some(provider) = provider else {
        out.say("Connect an asset provider to port.");
        return;
    };

    let Some(key_asset) = world
        .assets
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(&port.key_asset))
    else {
        tracing::warn!(key_asset = %port.key_asset, "port key asset missing from whitelist");
        out.say("Error: the port key asset is not configured.");
        return;
    };

    match provider.balance(key_asset).await {
        Err(e) => {
            out.say(format!("Error verifying the {}: {}", key_asset.name, e));
            return;
        }
        Ok(0) => {
            out.say(format!(
                "Porting requires the {}. You don't own one.",
                key_asset.name
            ));
            return;
        }
        Ok(_) => {}
    }

    // re-resolve after the suspension point; don't trust pre-await state
    if state.dead {
        return;
    }
    let Some(room_id) = port.destinations.get(arg) else {
        out.say(format!("You can't port to {}.", arg));
        return;
    };

    out.say("Reality thins around you, and somewhere else takes its place.");
    enter_room(out, world, state, &room_id.clone());
}

/// Unconditional travel back to the configured hub room.
pub fn handle_return(out: &mut Output, world: &World, state: &mut SessionState) {
    let Some(port) = &world.port else {
        out.say("There is nowhere to return to.");
        return;
    };

    if state.current_room == port.hub {
        out.say("You are already back where you started.");
        return;
    }

    out.say("You let go, and the hub reclaims you.");
    enter_room(out, world, state, &port.hub.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameSession;
    use crate::assets::{MemoryAssets, testing::FailingAssets};
    use crate::world::load_world_from_str;

    const WORLD: &str = r#"
        [world]
        id = "t"
        name = "Test"
        start_room = "hub"

        [rooms.hub]
        description = "The hub."

        [rooms.far]
        description = "Far away."

        [[asset]]
        name = "Sigil"
        description = "A sigil."
        contract = "0xaaa"

        [port]
        key_asset = "Sigil"
        hub = "hub"
        [port.destinations]
        far = "far"
    "#;

    fn session() -> GameSession {
        GameSession::new(load_world_from_str(WORLD).unwrap())
    }

    #[tokio::test]
    async fn port_refuses_without_the_key() {
        let mut session = session();
        let provider = MemoryAssets::new();
        let (world, state) = session.parts_mut();
        let mut out = Output::new();
        handle_port(&mut out, world, state, Some(&provider), "far").await;
        assert_eq!(
            out.text_lines(),
            vec!["Porting requires the Sigil. You don't own one."]
        );
        assert_eq!(state.current_room, "hub");
    }

    #[tokio::test]
    async fn port_moves_with_the_key() {
        let mut session = session();
        let provider = MemoryAssets::new().with_balance("0xaaa", 1);
        let (world, state) = session.parts_mut();
        let mut out = Output::new();
        handle_port(&mut out, world, state, Some(&provider), "far").await;
        assert_eq!(state.current_room, "far");
        assert!(out.text_lines().contains(&"Far away."));
    }

    #[tokio::test]
    async fn query_error_is_inline_and_non_mutating() {
        let mut session = session();
        let (world, state) = session.parts_mut();
        let mut out = Output::new();
        handle_port(&mut out, world, state, Some(&FailingAssets), "far").await;
        assert_eq!(
            out.text_lines(),
            vec!["Error verifying the Sigil: query failed: rpc timeout"]
        );
        assert_eq!(state.current_room, "hub");
    }

    #[tokio::test]
    async fn unknown_destination_is_refused_after_the_check() {
        let mut session = session();
        let provider = MemoryAssets::new().with_balance("0xaaa", 1);
        let (world, state) = session.parts_mut();
        let mut out = Output::new();
        handle_port(&mut out, world, state, Some(&provider), "void").await;
        assert_eq!(out.text_lines(), vec!["You can't port to void."]);
        assert_eq!(state.current_room, "hub");
    }

    #[tokio::test]
    async fn no_provider_is_an_explicit_message() {
        let mut session = session();
        let (world, state) = session.parts_mut();
        let mut out = Output::new();
        handle_port(&mut out, world, state, None, "far").await;
        assert_eq!(out.text_lines(), vec!["Connect an asset provider to port."]);
    }

    #[tokio::test]
    async fn return_goes_back_to_the_hub() {
        let mut session = session();
        let (world, state) = session.parts_mut();
        state.current_room = "far".into();
        let mut out = Output::new();
        handle_return(&mut out, world, state);
        assert_eq!(state.current_room, "hub");

        let mut out = Output::new();
        handle_return(&mut out, world, state);
        assert_eq!(
            out.text_lines(),
            vec!["You are already back where you started."]
        );
    }
}
