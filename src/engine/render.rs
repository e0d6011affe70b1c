use crate::SessionState;
use crate::engine::conditions::condition_met;
use crate::engine::output::{Output, Panel};
use crate::mode::Mode;
use crate::world::{Direction, World};

pub fn render_room(out: &mut Output, world: &World, state: &SessionState) {
    let Some(room) = world.room(&state.current_room) else {
        tracing::warn!(room = %state.current_room, "current room missing from world");
        out.say("Error: room not found.");
        return;
    };

    out.say(&room.description);

    if let Some(room_state) = state.rooms.get(&room.id) {
        if !room_state.items.is_empty() {
            let mut names: Vec<&str> = room_state.items.keys().map(String::as_str).collect();
            names.sort_unstable();
            out.say(format!("Items: {}", names.join(", ")));
        }
    }

    // The log lists every exit; the map panel separately shows only the
    // ones that are currently passable.
    let dirs: Vec<&str> = Direction::ALL
        .iter()
        .filter(|d| room.exits.contains_key(*d))
        .map(|d| d.name())
        .collect();
    if !dirs.is_empty() {
        out.say(format!("Exits: {}", dirs.join(", ")));
    }

    match &room.room_art {
        Some(art) => out.art(art),
        None => out.art_clear(),
    }

    out.refresh(Panel::Map);
    out.refresh(Panel::RoomItems);
}

/// An adjacent room reachable from the current one right now. Exits whose
/// condition is unmet are omitted entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapNeighbor {
    pub direction: Direction,
    pub room: String,
}

pub fn map_view(world: &World, state: &SessionState) -> Vec<MapNeighbor> {
    let Some(room) = world.room(&state.current_room) else {
        return Vec::new();
    };

    Direction::ALL
        .iter()
        .filter_map(|dir| {
            let exit = room.exits.get(dir)?;
            if !condition_met(exit.condition.as_deref(), &state.conditions) {
                return None;
            }
            Some(MapNeighbor {
                direction: *dir,
                room: exit.room.clone(),
            })
        })
        .collect()
}

/// Names listed in the room-items panel. The active mode narrows the list
/// to what its click action could target.
pub fn room_panel_entries(world: &World, state: &SessionState) -> Vec<String> {
    let Some(room) = world.room(&state.current_room) else {
        return Vec::new();
    };

    let items = state
        .rooms
        .get(&room.id)
        .map(|rs| rs.items.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    let objects: Vec<String> = room.objects.keys().cloned().collect();

    let mut entries = match state.mode {
        Mode::Take => items,
        Mode::Press | Mode::Search => objects,
        _ => {
            let mut all = items;
            all.extend(objects);
            all
        }
    };
    entries.sort_unstable();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameSession;
    use crate::world::load_world_from_str;

    fn session() -> GameSession {
        let world = load_world_from_str(
            r#"
            [world]
            id = "t"
            name = "Test"
            start_room = "hall"

            [rooms.hall]
            description = "A hall."
            room_art = "art/hall.png"

            [rooms.hall.items]
            coin = "A coin."

            [rooms.hall.objects]
            statue = "A statue."

            [rooms.hall.exits]
            north = "vault"

            [rooms.hall.exits.east]
            room = "garden"
            condition = "gate_open"
            message = "Shut."

            [rooms.vault]
            description = "A vault."

            [rooms.garden]
            description = "A garden."
        "#,
        )
        .unwrap();
        GameSession::new(world)
    }

    #[test]
    fn room_render_lists_items_and_all_exits() {
        let session = session();
        let mut out = Output::new();
        render_room(&mut out, session.world(), session.state());
        let lines = out.text_lines();
        assert!(lines.contains(&"Items: coin"));
        // locked exits still show in the log
        assert!(lines.contains(&"Exits: north, east"));
    }

    #[test]
    fn map_hides_locked_exits() {
        let mut session = session();
        let view = map_view(session.world(), session.state());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].room, "vault");

        session.state_mut().set_condition("gate_open", true);
        let view = map_view(session.world(), session.state());
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn panel_entries_follow_mode() {
        let mut session = session();
        assert_eq!(
            room_panel_entries(session.world(), session.state()),
            vec!["coin", "statue"]
        );

        session.state_mut().mode = Mode::Take;
        assert_eq!(
            room_panel_entries(session.world(), session.state()),
            vec!["coin"]
        );

        session.state_mut().mode = Mode::Press;
        assert_eq!(
            room_panel_entries(session.world(), session.state()),
            vec!["statue"]
        );
    }
}
