use super::model::World;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

/// Cross-reference checks the loader can't do locally. Returns every broken
/// reference rather than stopping at the first.
pub fn validate_world(world: &World) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    // Rooms must not be empty
    if world.rooms.is_empty() {
        errors.push(ValidationError::new("world has no rooms"));
    }

    // start_room must exist
    if !world.rooms.contains_key(&world.start_room) {
        errors.push(ValidationError::new(format!(
            "start_room '{}' not found among rooms",
            world.start_room
        )));
    }

    // Validate exits
    for (room_id, room) in &world.rooms {
        for (dir, exit) in &room.exits {
            if !world.rooms.contains_key(&exit.room) {
                errors.push(ValidationError::new(format!(
                    "room '{}' exit '{}' targets missing room '{}'",
                    room_id,
                    dir.name(),
                    exit.room
                )));
            }
        }
    }

    // Press/search actions only ever fire against declared objects.
    for (room_id, room) in &world.rooms {
        for (kind, table) in [
            ("press", &room.press_actions),
            ("search", &room.search_actions),
        ] {
            for target in table.keys() {
                if !room.objects.contains_key(target) {
                    errors.push(ValidationError::new(format!(
                        "room '{}' {} action targets '{}', which is not an object there",
                        room_id, kind, target
                    )));
                }
            }
        }
    }

    // Validate port configuration
    if let Some(port) = &world.port {
        if !world.rooms.contains_key(&port.hub) {
            errors.push(ValidationError::new(format!(
                "port hub '{}' not found among rooms",
                port.hub
            )));
        }

        for (name, room_id) in &port.destinations {
            if !world.rooms.contains_key(room_id) {
                errors.push(ValidationError::new(format!(
                    "port destination '{}' targets missing room '{}'",
                    name, room_id
                )));
            }
        }

        if !world
            .assets
            .iter()
            .any(|a| a.name.eq_ignore_ascii_case(&port.key_asset))
        {
            errors.push(ValidationError::new(format!(
                "port key_asset '{}' is not a whitelisted asset",
                port.key_asset
            )));
        }
    }

    errors
}
