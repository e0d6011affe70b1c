use std::collections::HashMap;

use crate::engine::output::{Output, Panel};
use crate::world::Effects;
use crate::{InventoryItem, SessionState};

/// Case-insensitive key lookup. Returns the stored key so callers can use
/// the canonical (lowercased) spelling afterwards.
pub fn find_key_ci<'a, V>(map: &'a HashMap<String, V>, name: &str) -> Option<&'a str> {
    map.keys()
        .find(|k| k.eq_ignore_ascii_case(name))
        .map(|k| k.as_str())
}

/// Apply a declarative effect record against the current room. Panels whose
/// data changed get a refresh block.
pub fn apply_effects(out: &mut Output, state: &mut SessionState, effects: &Effects) {
    let mut room_changed = false;
    let mut inventory_changed = false;

    if let Some(name) = &effects.consume_item {
        let before = state.inventory.len();
        state
            .inventory
            .retain(|item| !item.name.eq_ignore_ascii_case(name));
        inventory_changed |= state.inventory.len() != before;
    }

    if let Some(spec) = &effects.award_item {
        state.inventory.push(InventoryItem {
            name: spec.name.clone(),
            description: spec.description.clone(),
        });
        inventory_changed = true;
    }

    let room_id = state.current_room.clone();
    if let Some(room) = state.rooms.get_mut(&room_id) {
        if let Some(spec) = &effects.create_item {
            room.items.insert(spec.name.clone(), spec.description.clone());
            if let Some(art) = &spec.art {
                room.item_art.insert(spec.name.clone(), art.clone());
            }
            room_changed = true;
        }

        if let Some(name) = &effects.remove_item {
            if let Some(key) = find_key_ci(&room.items, name).map(str::to_string) {
                room.items.remove(&key);
                room_changed = true;
            }
        }
    }

    if let Some(set) = &effects.set_condition {
        tracing::debug!(condition = %set.name, value = set.value, "condition changed");
        state.set_condition(&set.name, set.value);
        room_changed = true; // a flag change can unlock exits on the map
    }

    if room_changed {
        out.refresh(Panel::RoomItems);
        out.refresh(Panel::Map);
    }
    if inventory_changed {
        out.refresh(Panel::Inventory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ConditionEffect, ItemSpec, load_world_from_str};
    use crate::{GameSession, SessionState};

    fn session_state() -> SessionState {
        let world = load_world_from_str(
            r#"
            [world]
            id = "t"
            name = "Test"
            start_room = "a"

            [rooms.a]
            description = "A."
            [rooms.a.items]
            rock = "A rock."
        "#,
        )
        .unwrap();
        let session = GameSession::new(world);
        session.state().clone()
    }

    #[test]
    fn create_and_remove_room_items() {
        let mut state = session_state();
        let mut out = Output::new();

        let effects = Effects {
            create_item: Some(ItemSpec {
                name: "gem".into(),
                description: "A gem.".into(),
                art: Some("art/gem.png".into()),
            }),
            remove_item: Some("rock".into()),
            ..Effects::default()
        };
        apply_effects(&mut out, &mut state, &effects);

        let room = state.rooms.get("a").unwrap();
        assert!(room.items.contains_key("gem"));
        assert!(!room.items.contains_key("rock"));
        assert_eq!(room.item_art.get("gem").map(String::as_str), Some("art/gem.png"));
    }

    #[test]
    fn inventory_and_condition_effects() {
        let mut state = session_state();
        let mut out = Output::new();

        state.inventory.push(InventoryItem {
            name: "card".into(),
            description: "A card.".into(),
        });

        let effects = Effects {
            consume_item: Some("card".into()),
            award_item: Some(ItemSpec {
                name: "stub".into(),
                description: "A stub.".into(),
                art: None,
            }),
            set_condition: Some(ConditionEffect {
                name: "fed".into(),
                value: true,
            }),
            ..Effects::default()
        };
        apply_effects(&mut out, &mut state, &effects);

        assert_eq!(state.inventory.len(), 1);
        assert_eq!(state.inventory[0].name, "stub");
        assert!(state.condition("fed"));
    }
}
