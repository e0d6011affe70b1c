use std::collections::HashMap;

use crate::SessionState;
use crate::engine::Output;

//////////////////////////////
/// GAME STRUCTS AND ENUMS ///
//////////////////////////////

/// Immutable world template. Built once by the loader and never mutated
/// afterwards; per-session mutable state lives in `SessionState`.
#[derive(Debug)]
pub struct World {
    pub id: String,
    pub name: String,
    pub about: String,
    pub start_room: String,
    pub rooms: HashMap<String, Room>,
    pub initial_conditions: HashMap<String, bool>,
    pub assets: Vec<AssetSpec>,
    pub port: Option<PortConfig>,
    pub commands: HashMap<String, CustomCommand>,
}

impl World {
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Register a world-specific verb. Custom verbs are dispatched before
    /// every built-in, so a custom command may also shadow a built-in verb.
    pub fn register_command(&mut self, name: impl Into<String>, command: CustomCommand) {
        self.commands.insert(name.into().to_lowercase(), command);
    }
}

#[derive(Debug)]
pub struct Room {
    pub id: String,
    pub description: String,
    pub exits: HashMap<Direction, Exit>,
    /// Starting takeable items (name -> description). Seeds the working
    /// copy; the live set is in `RoomState`.
    pub items: HashMap<String, String>,
    /// Fixed scenery (name -> description). Examinable, usable, never takeable.
    pub objects: HashMap<String, String>,
    pub item_art: HashMap<String, String>,
    pub object_art: HashMap<String, String>,
    pub room_art: Option<String>,
    /// item name -> target name -> action fired by "use <item> with <target>".
    pub use_actions: HashMap<String, HashMap<String, UseAction>>,
    pub press_actions: HashMap<String, TriggerAction>,
    pub search_actions: HashMap<String, TriggerAction>,
    /// Entering this room ends the game.
    pub fatal: bool,
}

/// One exit edge. A plain exit has no condition; a conditional exit refuses
/// passage (with `message`) until its condition flag is set.
#[derive(Debug)]
pub struct Exit {
    pub room: String,
    pub condition: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "n" | "north" => Some(Self::North),
            "s" | "south" => Some(Self::South),
            "e" | "east" => Some(Self::East),
            "w" | "west" => Some(Self::West),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

/// Effect fired by "use <item> with <target>".
#[derive(Debug)]
pub struct UseAction {
    pub message: Option<String>,
    pub effects: Effects,
}

/// Effect fired by pressing or searching a room object, optionally gated
/// on a condition flag (with `!` negation).
#[derive(Debug)]
pub struct TriggerAction {
    pub condition: Option<String>,
    pub condition_message: Option<String>,
    pub message: Option<String>,
    pub effects: Effects,
}

/// Declarative state mutations an action may apply. Any combination.
#[derive(Debug, Default, Clone)]
pub struct Effects {
    /// Add an item to the current room.
    pub create_item: Option<ItemSpec>,
    /// Remove an item from the current room.
    pub remove_item: Option<String>,
    /// Remove an item from the player's inventory.
    pub consume_item: Option<String>,
    /// Append an item to the player's inventory.
    pub award_item: Option<ItemSpec>,
    pub set_condition: Option<ConditionEffect>,
}

#[derive(Debug, Clone)]
pub struct ItemSpec {
    pub name: String,
    pub description: String,
    pub art: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConditionEffect {
    pub name: String,
    /// Defaults to true when omitted in the world file.
    pub value: bool,
}

/// A whitelisted on-chain asset. Ownership is queried live through the
/// asset provider and only displayed; these never enter the inventory.
#[derive(Debug, Clone)]
pub struct AssetSpec {
    pub name: String,
    pub description: String,
    pub contract: String,
}

/// Teleport travel configuration: `port <destination>` is gated on live
/// ownership of `key_asset`; `return` always goes back to `hub`.
#[derive(Debug)]
pub struct PortConfig {
    pub key_asset: String,
    pub hub: String,
    pub destinations: HashMap<String, String>,
}

/// Handler signature for custom commands. Invoked with an explicit session
/// handle rather than closing over shared state.
pub type CommandFn = fn(&World, &mut SessionState, &mut Output, &str);

/// A world-specific verb: pure data plus a handler reference. The optional
/// condition gates the whole verb; while it is unmet, `failure_message` is
/// all the player sees.
#[derive(Debug)]
pub struct CustomCommand {
    pub condition: Option<String>,
    pub failure_message: String,
    pub execute: CommandFn,
}
