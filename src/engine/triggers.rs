use std::collections::HashMap;

use crate::SessionState;
use crate::engine::conditions::condition_met;
use crate::engine::helpers::{apply_effects, find_key_ci};
use crate::engine::output::Output;
use crate::world::{TriggerAction, World};

pub fn handle_press(out: &mut Output, world: &World, state: &mut SessionState, target: &str) {
    fire_trigger(out, world, state, target, TriggerKind::Press);
}

pub fn handle_search(out: &mut Output, world: &World, state: &mut SessionState, target: &str) {
    fire_trigger(out, world, state, target, TriggerKind::Search);
}

#[derive(Clone, Copy)]
enum TriggerKind {
    Press,
    Search,
}

impl TriggerKind {
    fn table<'a>(&self, room: &'a crate::world::Room) -> &'a HashMap<String, TriggerAction> {
        match self {
            TriggerKind::Press => &room.press_actions,
            TriggerKind::Search => &room.search_actions,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            TriggerKind::Press => "press",
            TriggerKind::Search => "search",
        }
    }

    fn nothing_happens(&self, target: &str) -> String {
        match self {
            TriggerKind::Press => format!("Pressing the {} does nothing.", target),
            TriggerKind::Search => format!("Searching the {} reveals nothing.", target),
        }
    }
}

/// Press and search share one shape: objects only, an optional condition
/// gate (with `!` negation), then a declarative effect record.
fn fire_trigger(
    out: &mut Output,
    world: &World,
    state: &mut SessionState,
    target: &str,
    kind: TriggerKind,
) {
    let Some(room) = world.room(&state.current_room) else {
        out.say("Error: room not found.");
        return;
    };

    if let Some(key) = find_key_ci(kind.table(room), target) {
        let action = &kind.table(room)[key];

        if !condition_met(action.condition.as_deref(), &state.conditions) {
            match &action.condition_message {
                Some(msg) => out.say(msg),
                None => out.say(kind.nothing_happens(key)),
            }
            return;
        }

        match &action.message {
            Some(msg) => out.say(msg),
            None => out.say(format!("You {} the {}.", kind.verb(), key)),
        }
        apply_effects(out, state, &action.effects);
    } else if let Some(key) = find_key_ci(&room.objects, target) {
        out.say(kind.nothing_happens(key));
    } else {
        out.say(format!("There's no {} to {} here.", target, kind.verb()));
    }
}
