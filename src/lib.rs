pub mod assets;
pub mod engine;
pub mod mode;
pub mod world;

use std::collections::HashMap;
use std::sync::Arc;

use assets::AssetQuery;
use engine::{Output, Panel, condition_met, render_room};
use mode::Mode;
use world::{Direction, World};

pub use world::{load_world_from_file, load_world_from_str};

/// One carried item. Off-chain only; on-chain assets are queried live and
/// never stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub name: String,
    pub description: String,
}

/// The mutable half of a room: the takeable items currently in it and
/// their art refs. Everything behavioral stays on the immutable template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoomState {
    pub items: HashMap<String, String>,
    pub item_art: HashMap<String, String>,
}

/// All per-session mutable state, owned by one `GameSession`. Rebuilt from
/// the world template on start and on restart.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub current_room: String,
    pub rooms: HashMap<String, RoomState>,
    pub conditions: HashMap<String, bool>,
    pub inventory: Vec<InventoryItem>,
    pub dead: bool,
    pub mode: Mode,
}

impl SessionState {
    /// The explicit reset-to-template operation. Mutable room fields and
    /// conditions are copied fresh; action tables are never copied at all,
    /// so they cannot be lost across restarts.
    pub fn from_world(world: &World) -> Self {
        let rooms = world
            .rooms
            .iter()
            .map(|(id, room)| {
                (
                    id.clone(),
                    RoomState {
                        items: room.items.clone(),
                        item_art: room.item_art.clone(),
                    },
                )
            })
            .collect();

        SessionState {
            current_room: world.start_room.clone(),
            rooms,
            conditions: world.initial_conditions.clone(),
            inventory: Vec::new(),
            dead: false,
            mode: Mode::None,
        }
    }

    /// Unset conditions read as false.
    pub fn condition(&self, name: &str) -> bool {
        self.conditions.get(name).copied().unwrap_or(false)
    }

    pub fn set_condition(&mut self, name: &str, value: bool) {
        self.conditions.insert(name.to_string(), value);
    }

    pub fn holds(&self, name: &str) -> bool {
        self.inventory
            .iter()
            .any(|i| i.name.eq_ignore_ascii_case(name))
    }
}

/// Owns the world template, the session state and the optional asset
/// provider, and turns player input into output blocks.
pub struct GameSession {
    world: World,
    state: SessionState,
    provider: Option<Arc<dyn AssetQuery>>,
}

impl GameSession {
    pub fn new(world: World) -> Self {
        let state = SessionState::from_world(&world);
        GameSession {
            world,
            state,
            provider: None,
        }
    }

    /// Attach the external ownership-verification service. May happen at
    /// any point in a session, mirroring a wallet connected mid-game.
    pub fn connect_assets(&mut self, provider: Arc<dyn AssetQuery>) {
        self.provider = Some(provider);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Split borrow for the free-function handlers.
    pub fn parts_mut(&mut self) -> (&World, &mut SessionState) {
        (&self.world, &mut self.state)
    }

    pub fn is_dead(&self) -> bool {
        self.state.dead
    }

    /// Initial render of the start room.
    pub fn initialize(&mut self) -> Output {
        let mut out = Output::new();
        render_room(&mut out, &self.world, &self.state);
        out.refresh(Panel::Inventory);
        out
    }

    /// Throw the session away and rebuild it from the templates.
    pub fn restart(&mut self) -> Output {
        tracing::info!(world = %self.world.id, "session restart");
        self.state = SessionState::from_world(&self.world);
        self.initialize()
    }

    /// A typed line from the player. Cancels any active mode first, except
    /// Type mode, which swallows the line as a console command.
    pub async fn submit_line(&mut self, input: &str) -> Output {
        let mut out = Output::new();
        if self.state.dead {
            return out;
        }

        let input = input.trim();
        if input.is_empty() {
            return out;
        }

        out.echo(format!("> {}", input));

        if self.state.mode == Mode::Type {
            let typed = format!("type {}", input);
            self.interpret_into(&mut out, &typed).await;
            return out;
        }

        if self.state.mode.is_active() {
            mode::exit_mode(&mut self.state, &mut out);
        }
        self.interpret_into(&mut out, input).await;
        out
    }

    /// A click on an entry in the room-items panel. Performs the active
    /// mode's action against it and ends the mode (Use waits for its
    /// second selection first).
    pub async fn click_room_entry(&mut self, name: &str) -> Output {
        self.click_entry(name).await
    }

    /// A click on an entry in the inventory panel.
    pub async fn click_inventory_entry(&mut self, name: &str) -> Output {
        let mut out = Output::new();
        if self.state.dead {
            return out;
        }

        match self.state.mode.clone() {
            Mode::Examine => {
                self.run_clicked(&mut out, format!("examine {}", name)).await;
            }
            Mode::Use { pending } => {
                self.advance_use(&mut out, pending, name).await;
            }
            _ => {}
        }
        out
    }

    pub fn enter_mode(&mut self, mode: Mode) -> Output {
        let mut out = Output::new();
        mode::enter_mode(&mut self.state, &mut out, mode);
        out
    }

    pub fn exit_mode(&mut self) -> Output {
        let mut out = Output::new();
        mode::exit_mode(&mut self.state, &mut out);
        out
    }

    async fn click_entry(&mut self, name: &str) -> Output {
        let mut out = Output::new();
        if self.state.dead {
            return out;
        }

        match self.state.mode.clone() {
            Mode::Examine => self.run_clicked(&mut out, format!("examine {}", name)).await,
            Mode::Take => self.run_clicked(&mut out, format!("take {}", name)).await,
            Mode::Press => self.run_clicked(&mut out, format!("press {}", name)).await,
            Mode::Search => self.run_clicked(&mut out, format!("search {}", name)).await,
            Mode::Port => self.run_clicked(&mut out, format!("port {}", name)).await,
            Mode::Use { pending } => self.advance_use(&mut out, pending, name).await,
            Mode::None | Mode::Type => {}
        }
        out
    }

    async fn advance_use(&mut self, out: &mut Output, pending: Option<String>, name: &str) {
        match pending {
            None => {
                self.state.mode = Mode::Use {
                    pending: Some(name.to_lowercase()),
                };
                out.refresh(Panel::RoomItems);
                out.refresh(Panel::Inventory);
            }
            Some(first) => {
                self.run_clicked(out, format!("use {} with {}", first, name))
                    .await;
            }
        }
    }

    /// Echo a synthesized command, run it, then end the mode (one-shot).
    async fn run_clicked(&mut self, out: &mut Output, command: String) {
        out.echo(format!("> {}", command));
        self.interpret_into(out, &command).await;
        mode::exit_mode(&mut self.state, out);
    }

    /// Interpret one command. Terminal sessions ignore input entirely.
    pub async fn interpret(&mut self, input: &str) -> Output {
        let mut out = Output::new();
        self.interpret_into(&mut out, input).await;
        out
    }

    async fn interpret_into(&mut self, out: &mut Output, input: &str) {
        if self.state.dead {
            return;
        }

        let lower = input.trim().to_lowercase();
        let Some(verb) = lower.split_whitespace().next() else {
            return;
        };
        let arg = lower[verb.len()..].trim();

        let world = &self.world;
        let state = &mut self.state;
        let provider = self.provider.as_deref();

        // world-specific verbs win over everything built in
        if let Some(command) = world.commands.get(verb) {
            if !condition_met(command.condition.as_deref(), &state.conditions) {
                out.say(&command.failure_message);
                return;
            }
            (command.execute)(world, state, out, arg);
            return;
        }

        if let Some(dir) = Direction::parse(verb) {
            engine::handle_move(out, world, state, dir);
            return;
        }

        match verb {
            "look" | "l" => render_room(out, world, state),
            "examine" | "exam" if !arg.is_empty() => engine::handle_examine(out, world, state, arg),
            "search" if !arg.is_empty() => engine::handle_search(out, world, state, arg),
            "take" if !arg.is_empty() => engine::handle_take(out, world, state, arg),
            "use" if !arg.is_empty() => engine::handle_use(out, world, state, arg),
            "inventory" | "i" => engine::handle_inventory(out, world, state, provider).await,
            "press" if !arg.is_empty() => engine::handle_press(out, world, state, arg),
            "port" if !arg.is_empty() => engine::handle_port(out, world, state, provider, arg).await,
            "return" => engine::handle_return(out, world, state),
            "help" | "h" => say_help(out, world),
            "about" => match world.about.is_empty() {
                true => out.say("There is nothing more to say about this world."),
                false => out.say(&world.about),
            },
            _ => out.say("I don't understand. Try help for a list of commands."),
        }
    }
}

fn say_help(out: &mut Output, world: &World) {
    out.say("Standard commands:");
    out.say("north/n, south/s, east/e, west/w - move");
    out.say("look/l - look around");
    out.say("examine/exam <target> - examine something");
    out.say("search <target> - search an object");
    out.say("take <item> - pick up an item");
    out.say("use <item> with <target> - use an item on something");
    out.say("inventory/i - check your inventory");
    out.say("press <target> - press an object");
    out.say("port <destination> - teleport (requires the key asset)");
    out.say("return - travel back to the hub");
    out.say("help/h - show this help");
    out.say("about - about this world");

    let mut custom: Vec<&str> = world.commands.keys().map(String::as_str).collect();
    if !custom.is_empty() {
        custom.sort_unstable();
        out.say(format!("This world also understands: {}.", custom.join(", ")));
    }
}
