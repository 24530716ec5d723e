//! Persona identity types.
//!
//! A persona is a historical-figure identity the user converses with. It is
//! identified by a stable, human-readable key such as `einstein`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Sender names reserved for non-persona messages.
const RESERVED_KEYS: [&str; 2] = ["user", "system"];

/// Stable key identifying a persona (e.g. `"einstein"`).
///
/// # Invariants
///
/// - Non-empty after trimming
/// - Never equal to a reserved sender name (`user`, `system`), so a persona
///   key can share the `sender` field with those markers without ambiguity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonaId(String);

impl PersonaId {
    /// Creates a new PersonaId, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the key is blank
    /// - `InvalidFormat` if the key is a reserved sender name
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ValidationError::empty_field("persona_id"));
        }
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(ValidationError::invalid_format(
                "persona_id",
                format!("'{}' is a reserved sender name", key),
            ));
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PersonaId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PersonaId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PersonaId> for String {
    fn from(id: PersonaId) -> Self {
        id.0
    }
}

/// Static description of a persona.
///
/// Biography-style content is opaque configuration; the engine only reads
/// the fields it needs to title conversations and snapshot message authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaProfile {
    pub id: PersonaId,
    /// Full display name, e.g. "Albert Einstein".
    pub name: String,
    /// Short descriptor, e.g. "Theoretical Physicist".
    pub title: String,
    /// Accent color token used by clients.
    pub color: String,
    /// Portrait path used by clients.
    pub image: String,
    /// Opening line for individual conversations.
    pub greeting: String,
    /// Identifier of the trained replica on the remote persona service.
    pub remote_id: Option<String>,
}

impl PersonaProfile {
    /// Builds a minimal profile for a key that has no catalog entry.
    ///
    /// The display name falls back to the key itself.
    pub fn unknown(id: PersonaId) -> Self {
        let name = id.as_str().to_string();
        Self {
            greeting: format!(
                "Hello! I'm {}. I'm excited to discuss ideas with you. What would you like to explore today?",
                name
            ),
            image: format!("/images/characters/{}.jpg", id),
            name,
            title: "Historical Figure".to_string(),
            color: "from-slate-600 to-gray-600".to_string(),
            remote_id: None,
            id,
        }
    }

    /// First word of the display name ("Albert Einstein" -> "Albert").
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Captures the display metadata stored on each message.
    pub fn snapshot(&self) -> PersonaSnapshot {
        PersonaSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            color: self.color.clone(),
            image: self.image.clone(),
        }
    }
}

/// Denormalized copy of a persona's display metadata, frozen at the time a
/// message was created.
///
/// Historical messages keep the sender's appearance even if the catalog
/// changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaSnapshot {
    pub id: PersonaId,
    pub name: String,
    pub title: String,
    pub color: String,
    pub image: String,
}
