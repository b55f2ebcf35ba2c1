//! Discord guild entity.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier for a Discord guild (server).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(String);

impl GuildId {
    /// Creates a guild ID from its snowflake text.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the snowflake as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GuildId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GuildId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A guild object exactly as the API returned it.
///
/// Listing guilds never rewrites fields; the accessors only read the raw
/// object. The icon cache relies on `id` and `icon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildSummary {
    raw: Value,
}

impl GuildSummary {
    /// Wraps a raw guild object.
    #[must_use]
    pub const fn from_raw(raw: Value) -> Self {
        Self { raw }
    }

    /// Returns the guild ID, accepting string or numeric snowflakes.
    ///
    /// Anything but ASCII digits is rejected; the ID becomes a file name in
    /// the icon cache.
    #[must_use]
    pub fn id(&self) -> Option<GuildId> {
        match self.raw.get("id")? {
            Value::String(id) if is_snowflake(id) => Some(GuildId::new(id.as_str())),
            Value::Number(id) if id.is_u64() => Some(GuildId::new(id.to_string())),
            _ => None,
        }
    }

    /// Returns the guild name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.raw.get("name").and_then(Value::as_str)
    }

    /// Returns the icon hash; `None` when the guild has no icon.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.raw
            .get("icon")
            .and_then(Value::as_str)
            .filter(|icon| !icon.is_empty())
    }

    /// Returns the raw object.
    #[must_use]
    pub const fn as_json(&self) -> &Value {
        &self.raw
    }
}

fn is_snowflake(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}
