use crate::engine::helpers::{apply_effects, find_key_ci};
use crate::engine::output::{Output, Panel};
use crate::world::World;
use crate::{InventoryItem, SessionState};

/// Examine accumulates every match across room items, room objects, the
/// inventory and the asset whitelist; a name shared between categories
/// prints each description in that order.
pub fn handle_examine(out: &mut Output, world: &World, state: &SessionState, target: &str) {
    let mut found = false;

    if let Some(room) = world.room(&state.current_room) {
        if let Some(room_state) = state.rooms.get(&room.id) {
            if let Some(key) = find_key_ci(&room_state.items, target) {
                out.say(&room_state.items[key]);
                if let Some(art) = room_state.item_art.get(key) {
                    out.art(art);
                }
                found = true;
            }
        }

        if let Some(key) = find_key_ci(&room.objects, target) {
            out.say(&room.objects[key]);
            if let Some(art) = room.object_art.get(key) {
                out.art(art);
            }
            found = true;
        }
    }

    if let Some(item) = state
        .inventory
        .iter()
        .find(|i| i.name.eq_ignore_ascii_case(target))
    {
        out.say(&item.description);
        // carried items leave their art behind in whichever room held them
        if let Some(art) = state
            .rooms
            .values()
            .find_map(|rs| rs.item_art.get(&item.name))
        {
            out.art(art);
        }
        found = true;
    }

    if let Some(asset) = world
        .assets
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(target))
    {
        if asset.description.is_empty() {
            out.say(format!("{}: no description available.", asset.name));
        } else {
            out.say(&asset.description);
        }
        found = true;
    }

    if !found {
        out.say("There's nothing like that to examine.");
        out.art_clear();
    }
}

pub fn handle_take(out: &mut Output, world: &World, state: &mut SessionState, target: &str) {
    let Some(room) = world.room(&state.current_room) else {
        out.say("Error: room not found.");
        return;
    };

    let room_state = state.rooms.entry(room.id.clone()).or_default();

    if let Some(key) = find_key_ci(&room_state.items, target).map(str::to_string) {
        let description = room_state.items.remove(&key).unwrap_or_default();
        state.inventory.push(InventoryItem {
            name: key.clone(),
            description,
        });
        out.say(format!("You take the {}.", key));
        out.refresh(Panel::Inventory);
        out.refresh(Panel::RoomItems);
    } else if let Some(key) = find_key_ci(&room.objects, target) {
        out.say(format!("You can't take the {}.", key));
    } else {
        out.say("There's nothing like that to take.");
    }
}

/// Grammar: `use <item> with <target>`. Fires the room's registered
/// (item, target) action; every unmet precondition gets its own message
/// and leaves the world untouched.
pub fn handle_use(out: &mut Output, world: &World, state: &mut SessionState, arg: &str) {
    let Some((item, target)) = arg.split_once(" with ") else {
        out.say("Use items like this: use <item> with <target>");
        return;
    };
    let item = item.trim();
    let target = target.trim();
    if item.is_empty() || target.is_empty() {
        out.say("Use items like this: use <item> with <target>");
        return;
    }

    if !state
        .inventory
        .iter()
        .any(|i| i.name.eq_ignore_ascii_case(item))
    {
        out.say(format!("You don't have a {}.", item));
        return;
    }

    let Some(room) = world.room(&state.current_room) else {
        out.say("Error: room not found.");
        return;
    };

    let target_present = state
        .rooms
        .get(&room.id)
        .is_some_and(|rs| find_key_ci(&rs.items, target).is_some())
        || find_key_ci(&room.objects, target).is_some();
    if !target_present {
        out.say(format!("There's no {} here to use that with.", target));
        return;
    }

    let action = room
        .use_actions
        .get(&item.to_lowercase())
        .and_then(|targets| targets.get(&target.to_lowercase()));
    match action {
        Some(action) => {
            if let Some(msg) = &action.message {
                out.say(msg);
            }
            apply_effects(out, state, &action.effects);
        }
        None => {
            out.say(format!("You can't use the {} with the {}.", item, target));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameSession;
    use crate::world::load_world_from_str;

    const WORLD: &str = r#"
        [world]
        id = "t"
        name = "Test"
        start_room = "cell"

        [rooms.cell]
        description = "A cell."

        [rooms.cell.items]
        key = "A small iron key."
        key2 = "A spare key."

        [rooms.cell.item_art]
        key = "art/key.png"

        [rooms.cell.objects]
        door = "A heavy door."
        key2 = "A key-shaped carving."

        [rooms.cell.object_art]
        door = "art/door.png"

        [rooms.cell.use_actions.key.door]
        message = "The lock clicks open."
        set_condition = { name = "cell_open" }

        [[asset]]
        name = "Sigil"
        description = "A sigil of passage."
        contract = "0xabc"
    "#;

    fn session() -> GameSession {
        GameSession::new(load_world_from_str(WORLD).unwrap())
    }

    #[test]
    fn examine_accumulates_every_match() {
        let session = session();
        let mut out = Output::new();
        // "key2" names both a room item and a room object
        handle_examine(&mut out, session.world(), session.state(), "key2");
        assert_eq!(
            out.text_lines(),
            vec!["A spare key.", "A key-shaped carving."]
        );
    }

    #[test]
    fn examine_matches_assets_case_insensitively() {
        let session = session();
        let mut out = Output::new();
        handle_examine(&mut out, session.world(), session.state(), "sigil");
        assert_eq!(out.text_lines(), vec!["A sigil of passage."]);
    }

    #[test]
    fn examine_miss_clears_art() {
        let session = session();
        let mut out = Output::new();
        handle_examine(&mut out, session.world(), session.state(), "ghost");
        assert_eq!(out.text_lines(), vec!["There's nothing like that to examine."]);
        assert!(out
            .blocks
            .iter()
            .any(|b| matches!(b, crate::engine::OutputBlock::ArtClear)));
    }

    #[test]
    fn take_moves_item_into_inventory_once() {
        let mut session = session();
        let (world, state) = session.parts_mut();

        let mut out = Output::new();
        handle_take(&mut out, world, state, "key");
        assert_eq!(out.text_lines(), vec!["You take the key."]);
        assert_eq!(state.inventory.len(), 1);
        assert_eq!(state.inventory[0].name, "key");
        assert!(!state.rooms["cell"].items.contains_key("key"));

        // second take of the same name now only hits the carving/object path
        let mut out = Output::new();
        handle_take(&mut out, world, state, "key");
        assert_eq!(out.text_lines(), vec!["There's nothing like that to take."]);
        assert_eq!(state.inventory.len(), 1);
    }

    #[test]
    fn objects_refuse_with_a_distinct_message() {
        let mut session = session();
        let (world, state) = session.parts_mut();
        let mut out = Output::new();
        handle_take(&mut out, world, state, "door");
        assert_eq!(out.text_lines(), vec!["You can't take the door."]);
        assert!(state.inventory.is_empty());
    }

    #[test]
    fn use_requires_all_three_preconditions() {
        let mut session = session();

        // not holding the key yet
        let (world, state) = session.parts_mut();
        let before = state.clone();
        let mut out = Output::new();
        handle_use(&mut out, world, state, "key with door");
        assert_eq!(out.text_lines(), vec!["You don't have a key."]);
        assert_eq!(*state, before, "failed use must not mutate the session");

        let mut out = Output::new();
        handle_take(&mut out, world, state, "key");

        // target absent
        let before = state.clone();
        let mut out = Output::new();
        handle_use(&mut out, world, state, "key with window");
        assert_eq!(
            out.text_lines(),
            vec!["There's no window here to use that with."]
        );
        assert_eq!(*state, before);

        // no action registered for this pair
        let before = state.clone();
        let mut out = Output::new();
        handle_use(&mut out, world, state, "key with key2");
        assert_eq!(
            out.text_lines(),
            vec!["You can't use the key with the key2."]
        );
        assert_eq!(*state, before);

        // all preconditions hold
        let mut out = Output::new();
        handle_use(&mut out, world, state, "key with door");
        assert_eq!(out.text_lines(), vec!["The lock clicks open."]);
        assert!(state.condition("cell_open"));
    }

    #[test]
    fn use_rejects_bad_grammar() {
        let mut session = session();
        let (world, state) = session.parts_mut();
        let mut out = Output::new();
        handle_use(&mut out, world, state, "key on door");
        assert_eq!(
            out.text_lines(),
            vec!["Use items like this: use <item> with <target>"]
        );
    }
}
