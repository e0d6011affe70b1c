use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use super::model::{
    AssetSpec, ConditionEffect, Direction, Effects, Exit, ItemSpec, PortConfig, Room,
    TriggerAction, UseAction, World,
};

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("failed to read world file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse world file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid world: {0}")]
    Invalid(String),
}

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Deserialize)]
struct WorldFile {
    world: WorldHeader,
    #[serde(default)]
    conditions: HashMap<String, bool>,
    #[serde(default)]
    rooms: HashMap<String, RoomConfig>,
    #[serde(default)]
    asset: Vec<AssetConfig>, // [[asset]] blocks
    #[serde(default)]
    port: Option<PortConfigFile>,
}

#[derive(Deserialize)]
struct WorldHeader {
    id: String,
    name: String,
    start_room: String,
    #[serde(default)]
    about: String,
}

#[derive(Deserialize)]
struct RoomConfig {
    #[serde(default)]
    description: String,

    #[serde(default)]
    exits: HashMap<String, ExitConfig>,
    #[serde(default)]
    items: HashMap<String, String>,
    #[serde(default)]
    objects: HashMap<String, String>,
    #[serde(default)]
    item_art: HashMap<String, String>,
    #[serde(default)]
    object_art: HashMap<String, String>,
    #[serde(default)]
    room_art: Option<String>,

    #[serde(default)]
    use_actions: HashMap<String, HashMap<String, UseActionConfig>>,
    #[serde(default)]
    press_actions: HashMap<String, TriggerActionConfig>,
    #[serde(default)]
    search_actions: HashMap<String, TriggerActionConfig>,

    #[serde(default)]
    fatal: bool,
}

/// An exit is either a bare room id or a conditional record.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExitConfig {
    Simple(String),
    Conditional {
        room: String,
        condition: String,
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Deserialize)]
struct UseActionConfig {
    #[serde(default)]
    message: Option<String>,

    #[serde(flatten)]
    effects: EffectsConfig,
}

#[derive(Deserialize)]
struct TriggerActionConfig {
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    condition_message: Option<String>,
    #[serde(default)]
    message: Option<String>,

    #[serde(flatten)]
    effects: EffectsConfig,
}

#[derive(Deserialize, Default)]
struct EffectsConfig {
    #[serde(default)]
    create_item: Option<ItemSpecConfig>,
    #[serde(default)]
    remove_item: Option<String>,
    #[serde(default)]
    consume_item: Option<String>,
    #[serde(default)]
    award_item: Option<ItemSpecConfig>,
    #[serde(default)]
    set_condition: Option<ConditionEffectConfig>,
}

#[derive(Deserialize)]
struct ItemSpecConfig {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    art: Option<String>,
}

#[derive(Deserialize)]
struct ConditionEffectConfig {
    name: String,
    // default to true if omitted
    #[serde(default = "default_true")]
    value: bool,
}

#[derive(Deserialize)]
struct AssetConfig {
    name: String,
    #[serde(default)]
    description: String,
    contract: String,
}

#[derive(Deserialize)]
struct PortConfigFile {
    key_asset: String,
    hub: String,
    #[serde(default)]
    destinations: HashMap<String, String>,
}

// Helper for serde default
fn default_true() -> bool {
    true
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// Public API: load a world from a .toml file on disk.
pub fn load_world_from_file(path: &Path) -> Result<World, WorldError> {
    let contents = fs::read_to_string(path)?;
    load_world_from_str(&contents)
}

/// Public API: load a world from TOML text.
pub fn load_world_from_str(contents: &str) -> Result<World, WorldError> {
    let world_file: WorldFile = toml::from_str(contents)?;

    // Basic validation
    if world_file.world.id.trim().is_empty() {
        return Err(WorldError::Invalid("world.id may not be empty".into()));
    }
    if world_file.world.start_room.trim().is_empty() {
        return Err(WorldError::Invalid(
            "world.start_room may not be empty".into(),
        ));
    }

    // Build rooms map
    let mut rooms_map: HashMap<String, Room> = HashMap::new();

    for (room_id, room_cfg) in world_file.rooms {
        let mut exits: HashMap<Direction, Exit> = HashMap::new();
        for (dir_raw, exit_cfg) in room_cfg.exits {
            let dir = Direction::parse(&dir_raw.to_lowercase()).ok_or_else(|| {
                WorldError::Invalid(format!(
                    "room '{}' has an unknown exit direction '{}'",
                    room_id, dir_raw
                ))
            })?;

            let exit = match exit_cfg {
                ExitConfig::Simple(target) => Exit {
                    room: target,
                    condition: None,
                    message: None,
                },
                ExitConfig::Conditional {
                    room,
                    condition,
                    message,
                } => Exit {
                    room,
                    condition: Some(condition),
                    message: message.map(|m| normalize_multiline_desc(&m)),
                },
            };

            if exits.insert(dir, exit).is_some() {
                return Err(WorldError::Invalid(format!(
                    "room '{}' declares exit '{}' twice",
                    room_id,
                    dir.name()
                )));
            }
        }

        let use_actions = room_cfg
            .use_actions
            .into_iter()
            .map(|(item, targets)| {
                let targets = targets
                    .into_iter()
                    .map(|(target, ua)| {
                        (
                            target.to_lowercase(),
                            UseAction {
                                message: ua.message.map(|m| normalize_multiline_desc(&m)),
                                effects: build_effects(ua.effects),
                            },
                        )
                    })
                    .collect();
                (item.to_lowercase(), targets)
            })
            .collect();

        rooms_map.insert(
            room_id.clone(),
            Room {
                id: room_id,
                description: normalize_multiline_desc(&room_cfg.description),
                exits,
                items: lowercase_keys(room_cfg.items, true),
                objects: lowercase_keys(room_cfg.objects, true),
                item_art: lowercase_keys(room_cfg.item_art, false),
                object_art: lowercase_keys(room_cfg.object_art, false),
                room_art: room_cfg.room_art,
                use_actions,
                press_actions: build_triggers(room_cfg.press_actions),
                search_actions: build_triggers(room_cfg.search_actions),
                fatal: room_cfg.fatal,
            },
        );
    }

    // Ensure start_room exists
    if !rooms_map.contains_key(&world_file.world.start_room) {
        return Err(WorldError::Invalid(format!(
            "start_room '{}' not found among rooms",
            world_file.world.start_room
        )));
    }

    // Build asset whitelist
    let mut assets: Vec<AssetSpec> = Vec::new();
    for ac in world_file.asset {
        if ac.name.trim().is_empty() {
            return Err(WorldError::Invalid("asset.name may not be empty".into()));
        }
        if assets.iter().any(|a| a.name.eq_ignore_ascii_case(&ac.name)) {
            return Err(WorldError::Invalid(format!(
                "duplicate asset name: {}",
                ac.name
            )));
        }
        assets.push(AssetSpec {
            name: ac.name,
            description: normalize_multiline_desc(&ac.description),
            contract: ac.contract,
        });
    }

    let port = world_file.port.map(|p| PortConfig {
        key_asset: p.key_asset,
        hub: p.hub,
        destinations: p
            .destinations
            .into_iter()
            .map(|(name, room)| (name.to_lowercase(), room))
            .collect(),
    });

    Ok(World {
        id: world_file.world.id,
        name: world_file.world.name,
        about: normalize_multiline_desc(&world_file.world.about),
        start_room: world_file.world.start_room,
        rooms: rooms_map,
        initial_conditions: world_file.conditions,
        assets,
        port,
        commands: HashMap::new(),
    })
}

/// Item, object and action keys are matched against lowercased player
/// input, so they are lowercased once here at load time.
fn lowercase_keys(map: HashMap<String, String>, normalize_values: bool) -> HashMap<String, String> {
    map.into_iter()
        .map(|(k, v)| {
            let v = if normalize_values {
                normalize_multiline_desc(&v)
            } else {
                v
            };
            (k.to_lowercase(), v)
        })
        .collect()
}

fn build_triggers(map: HashMap<String, TriggerActionConfig>) -> HashMap<String, TriggerAction> {
    map.into_iter()
        .map(|(target, tc)| {
            (
                target.to_lowercase(),
                TriggerAction {
                    condition: tc.condition,
                    condition_message: tc.condition_message.map(|m| normalize_multiline_desc(&m)),
                    message: tc.message.map(|m| normalize_multiline_desc(&m)),
                    effects: build_effects(tc.effects),
                },
            )
        })
        .collect()
}

fn build_effects(ec: EffectsConfig) -> Effects {
    Effects {
        create_item: ec.create_item.map(build_item_spec),
        remove_item: ec.remove_item.map(|s| s.to_lowercase()),
        consume_item: ec.consume_item.map(|s| s.to_lowercase()),
        award_item: ec.award_item.map(build_item_spec),
        set_condition: ec.set_condition.map(|c| ConditionEffect {
            name: c.name,
            value: c.value,
        }),
    }
}

fn build_item_spec(ic: ItemSpecConfig) -> ItemSpec {
    ItemSpec {
        name: ic.name.to_lowercase(),
        description: normalize_multiline_desc(&ic.description),
        art: ic.art,
    }
}

fn normalize_multiline_desc(raw: &str) -> String {
    let mut result = String::new();
    let mut pending_blank_lines = 0usize;
    let mut first_text_seen = false;

    for line in raw.lines() {
        // Strip *all* leading/trailing whitespace so indentation in TOML
        // doesn't affect what the player sees.
        let trimmed = line.trim();

        let is_blank = trimmed.is_empty();

        if is_blank {
            // Count blank lines; we'll decide how to render them when we
            // hit the next non-blank line.
            pending_blank_lines += 1;
            continue;
        }

        // Non-blank line:
        if !first_text_seen {
            // First actual text: just write it
            result.push_str(trimmed);
            first_text_seen = true;
        } else {
            match pending_blank_lines {
                0 => {
                    // Wrapped line: single newline in TOML -> space in output
                    result.push(' ');
                    result.push_str(trimmed);
                }
                1 => {
                    // One blank line -> one visible newline
                    result.push('\n');
                    result.push_str(trimmed);
                }
                _ => {
                    // Two or more blank lines -> paragraph break
                    result.push_str("\n\n");
                    result.push_str(trimmed);
                }
            }
        }

        // Reset pending blanks after we've handled them
        pending_blank_lines = 0;
    }

    result
}
