use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::AsyncBufReadExt;

use chainfic::assets::MemoryAssets;
use chainfic::engine::{Output, OutputBlock, map_view};
use chainfic::world::{CustomCommand, World, validate_world};
use chainfic::{GameSession, SessionState, load_world_from_file};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn flush_output(out: Output, session: &GameSession) {
    for block in out.blocks {
        match block {
            OutputBlock::Text(line) => println!("{}", line),
            // the terminal already shows what was typed
            OutputBlock::Echo(_) => {}
            OutputBlock::Art(art_ref) => println!("(art: {})", art_ref),
            OutputBlock::ArtClear => {}
            OutputBlock::Refresh(panel) => {
                if panel == chainfic::engine::Panel::Map {
                    let paths: Vec<String> = map_view(session.world(), session.state())
                        .into_iter()
                        .map(|n| format!("{} ({})", n.direction.name(), n.room))
                        .collect();
                    if !paths.is_empty() {
                        println!("Open paths: {}", paths.join(", "));
                    }
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let world_path: PathBuf = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("worlds/enclave.toml"));

    let mut world = load_world_from_file(&world_path)
        .with_context(|| format!("loading world file '{}'", world_path.display()))?;

    let problems = validate_world(&world);
    if !problems.is_empty() {
        for p in &problems {
            eprintln!("world error: {}", p.message);
        }
        anyhow::bail!("world file '{}' failed validation", world_path.display());
    }

    register_console_commands(&mut world);

    let mut session = GameSession::new(world);

    // Stand-in provider so the on-chain surfaces work offline: the player
    // owns the port key and a few shards.
    session.connect_assets(Arc::new(
        MemoryAssets::new()
            .with_balance("0xf4c1a9e0b6d2374858c1d02f9a6e3b41c0de5512", 1)
            .with_balance("0x93b7d51f20aa6c4e8ef0cc1427b3a98d64e1f077", 3),
    ));

    println!("Welcome to {}!", session.world().name);
    println!("Type 'help' for commands, 'quit' to exit.\n");

    flush_output(session.initialize(), &session);

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!("\nGoodbye.");
            break;
        };
        let input = line.trim();

        if session.is_dead() {
            // any keystroke restarts
            let out = session.restart();
            flush_output(out, &session);
            continue;
        }

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            println!("Goodbye.");
            break;
        }

        let out = session.submit_line(input).await;
        flush_output(out, &session);
    }

    Ok(())
}

/// Verbs specific to the enclave world. The console only answers in the
/// terminal room; everything else is data in worlds/enclave.toml.
fn register_console_commands(world: &mut World) {
    world.register_command(
        "type",
        CustomCommand {
            condition: None,
            failure_message: String::new(),
            execute: console_type,
        },
    );
}

fn console_type(world: &World, state: &mut SessionState, out: &mut Output, arg: &str) {
    if state.current_room != "terminal" {
        out.say("You need to be at the terminal to type commands.");
        return;
    }
    let console_present = world
        .room("terminal")
        .is_some_and(|room| room.objects.contains_key("terminal"));
    if !console_present {
        out.say("There is no terminal here to type on.");
        return;
    }

    match arg {
        "help" => out.say(
            "The screen fills with a scrolling index of dead manpages. \
             Recognized commands include 'upload', 'unlock', 'help'.",
        ),
        "upload" => {
            if state.condition("soulcube_loaded") {
                out.say(
                    "You type 'upload'. The drive spins up and your pattern streams \
                     out into the firmament. Travelling it takes a key minted on-chain.",
                );
            } else {
                out.say("You type 'upload' into the terminal. Nothing happens.");
            }
        }
        "unlock" => out.say("Permission denied."),
        "sudo unlock" => {
            if state.condition("atrium_door_unlocked") {
                out.say("The atrium door is already unlocked.");
            } else {
                state.set_condition("atrium_door_unlocked", true);
                out.say(
                    "Servos whine and heavy bolts withdraw in the next room. \
                     A klaxon starts up somewhere above you.",
                );
            }
        }
        _ => out.say("Recognized commands include 'upload', 'unlock', 'help'."),
    }
}
