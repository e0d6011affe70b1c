use crate::SessionState;
use crate::engine::{Output, Panel};

/// Exclusive interaction mode. At most one is active; while active it
/// changes what a click in the room-items or inventory panel means.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    None,
    Examine,
    Take,
    Press,
    /// Two-step: the first selection is remembered until the target click.
    Use {
        pending: Option<String>,
    },
    Search,
    Port,
    /// Routes whole typed lines to the world's `type` command until exited
    /// explicitly.
    Type,
}

impl Mode {
    pub fn is_active(&self) -> bool {
        !matches!(self, Mode::None)
    }
}

/// Activate a mode, ending whatever mode was active before. No stacking.
pub fn enter_mode(state: &mut SessionState, out: &mut Output, mode: Mode) {
    if state.dead {
        return;
    }
    if state.mode.is_active() {
        exit_mode(state, out);
    }
    state.mode = mode;
    out.refresh(Panel::RoomItems);
    out.refresh(Panel::Inventory);
}

/// Deactivate the current mode and restore the panels it re-filtered.
pub fn exit_mode(state: &mut SessionState, out: &mut Output) {
    if !state.mode.is_active() {
        return;
    }
    state.mode = Mode::None;
    out.refresh(Panel::RoomItems);
    out.refresh(Panel::Inventory);
}
