//! # Data Model
//!
//! A [`Todo`] is the only persisted record. Its serialized form is the wire
//! format of the key-value slot, so field names are camelCase and `createdAt`
//! is an ISO-8601 string with millisecond precision:
//!
//! ```json
//! {"id": 1700000000000, "text": "Buy milk", "completed": false, "createdAt": "2023-11-14T22:13:20.000Z"}
//! ```
//!
//! [`Filter`] is transient view state and is never written to storage.

use crate::error::{Result, TodozError};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a todo: its creation time in Unix milliseconds, bumped as
/// needed to stay unique (see [`IdAllocator`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(TodoId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Builds a todo from already-validated text.
    ///
    /// Callers go through [`normalize_text`] first; an empty string here is a bug.
    pub fn new(id: TodoId, text: String, created_at: DateTime<Utc>) -> Self {
        debug_assert!(!text.trim().is_empty());
        Self {
            id,
            text,
            completed: false,
            created_at,
        }
    }
}

/// `createdAt` is always written with exactly three fractional digits and a `Z`
/// suffix, the same shape a browser's `Date.toISOString()` produces.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Trims input and rejects what is left if it is empty.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Current time truncated to whole milliseconds, matching the stored precision.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_millis_opt(now.timestamp_millis())
        .single()
        .unwrap_or(now)
}

/// Hands out creation-timestamp ids that never repeat within a collection.
///
/// The clock alone is not enough: two adds in the same millisecond, or a clock
/// that steps backwards, would collide. Each id is therefore at least one past
/// both the last id issued and the largest id already stored.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    last: Option<i64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the allocator from an existing collection so loaded ids are never reissued.
    pub fn observe(&mut self, todos: &[Todo]) {
        if let Some(max) = todos.iter().map(|t| t.id.0).max() {
            self.last = Some(self.last.map_or(max, |last| last.max(max)));
        }
    }

    /// Fails only when the largest id in use is already `i64::MAX`.
    pub fn next(&mut self, now: DateTime<Utc>) -> Result<TodoId> {
        let candidate = now.timestamp_millis();
        let id = match self.last {
            Some(last) if candidate <= last => last
                .checked_add(1)
                .ok_or_else(|| TodozError::Store(format!("No todo id left after {}", last)))?,
            _ => candidate,
        };
        self.last = Some(id);
        Ok(TodoId(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" | "done" => Ok(Filter::Completed),
            other => Err(format!("Unknown filter: {}", other)),
        }
    }
}
