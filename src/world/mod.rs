mod loader;
mod model;
mod validator;

pub use loader::{WorldError, load_world_from_file, load_world_from_str};

// Minimal, intentional surface area: re-export only what the game/engine uses.
pub use model::{
    AssetSpec, CommandFn, ConditionEffect, CustomCommand, Direction, Effects, Exit, ItemSpec,
    PortConfig, Room, TriggerAction, UseAction, World,
};
pub use validator::{ValidationError, validate_world};
