//! Human-readable labels for participant ids.

use std::collections::HashMap;

use crate::{EngineError, ParticipantId, ResultEngine, util::normalize_display};

/// Characters of the raw id shown when a participant has no display name.
pub const FALLBACK_ID_CHARS: usize = 6;

const MIN_DISPLAY_NAME_CHARS: usize = 2;

/// Validates a display name chosen by a user.
pub fn normalize_display_name(raw: &str) -> ResultEngine<String> {
    match normalize_display(raw) {
        Some(name) if name.chars().count() >= MIN_DISPLAY_NAME_CHARS => Ok(name),
        _ => Err(EngineError::InvalidName("display name too short".to_string())),
    }
}

/// Placeholder label for participants without a profile.
pub fn fallback_label(id: &ParticipantId) -> String {
    format!("Usuario {}", id.short(FALLBACK_ID_CHARS))
}

/// Display names known for an event's participants.
#[derive(Clone, Debug, Default)]
pub struct ProfileDirectory {
    names: HashMap<ParticipantId, String>,
}

impl ProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a profile. Blank names are ignored so the fallback applies.
    pub fn insert(&mut self, id: ParticipantId, display_name: Option<&str>) {
        match display_name.and_then(normalize_display) {
            Some(name) => {
                self.names.insert(id, name);
            }
            None => {
                self.names.remove(&id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display name when known, otherwise `Usuario <first 6 chars of id>`.
    pub fn label(&self, id: &ParticipantId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| fallback_label(id))
    }
}

impl<'a> FromIterator<(ParticipantId, Option<&'a str>)> for ProfileDirectory {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Option<&'a str>)>>(iter: T) -> Self {
        let mut directory = ProfileDirectory::new();
        for (id, name) in iter {
            directory.insert(id, name);
        }
        directory
    }
}
