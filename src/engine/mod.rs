mod conditions;
mod helpers;
mod inventory;
mod items;
mod movement;
mod output;
mod render;
mod travel;
mod triggers;

pub use conditions::condition_met;
pub use helpers::apply_effects;
pub use inventory::handle_inventory;
pub use items::{handle_examine, handle_take, handle_use};
pub use movement::{enter_room, handle_move};
pub use output::{Output, OutputBlock, Panel};
pub use render::{MapNeighbor, map_view, render_room, room_panel_entries};
pub use travel::{handle_port, handle_return};
pub use triggers::{handle_press, handle_search};
