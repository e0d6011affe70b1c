use crate::SessionState;
use crate::engine::conditions::condition_met;
use crate::engine::output::Output;
use crate::engine::render::render_room;
use crate::world::{Direction, World};

pub fn handle_move(out: &mut Output, world: &World, state: &mut SessionState, dir: Direction) {
    let Some(room) = world.room(&state.current_room) else {
        tracing::warn!(room = %state.current_room, "current room missing from world");
        out.say("Error: room not found.");
        return;
    };

    let Some(exit) = room.exits.get(&dir) else {
        out.say("You can't go that way.");
        return;
    };

    if !condition_met(exit.condition.as_deref(), &state.conditions) {
        match &exit.message {
            Some(msg) => out.say(msg),
            None => out.say("The way is blocked."),
        }
        return;
    }

    enter_room(out, world, state, &exit.room.clone());
}

/// Shared by directional movement and the port/return teleports. Commits
/// the move, renders the destination, and only then applies a fatal room's
/// death transition, so the player always sees where they died.
pub fn enter_room(out: &mut Output, world: &World, state: &mut SessionState, room_id: &str) {
    let Some(room) = world.room(room_id) else {
        // content bug, not a crash: the command fails and play continues
        tracing::warn!(target_room = %room_id, "exit targets a room that does not exist");
        out.say("Error: the destination room does not exist.");
        return;
    };

    state.current_room = room_id.to_string();
    render_room(out, world, state);

    if room.fatal {
        state.dead = true;
        out.say("You are dead. Press any key to restart.");
    }
}
