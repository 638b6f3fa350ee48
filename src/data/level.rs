//! Raw level content
//!
//! The shape level files deserialize into before the world model
//! classifies them. Nothing here is validated beyond what serde enforces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::Position;

/// Errors raised while fetching or building a level
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level `{id}` not found")]
    NotFound { id: String },
    #[error("failed to read level `{id}`: {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level `{id}`: {message}")]
    Parse { id: String, message: String },
    #[error("level `{id}` has no player entity")]
    MissingPlayer { id: String },
}

/// A level as supplied by the level data collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelData {
    /// Identifier the level was loaded under
    #[serde(default)]
    pub id: String,
    /// One string per row of tile symbols
    pub structure: Vec<String>,
    /// Entity records, in encounter order
    #[serde(default)]
    pub components: Vec<RawComponent>,
}

/// A single attribute value on a raw record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Text(String),
}

impl AttrValue {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            AttrValue::Int(v) => i32::try_from(*v).ok(),
            AttrValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            AttrValue::Int(v) => v.to_string(),
            AttrValue::Text(s) => s.clone(),
        }
    }
}

/// An unclassified entity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComponent {
    pub symbol: String,
    pub row: i32,
    pub col: i32,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl RawComponent {
    pub fn new(symbol: impl Into<String>, row: i32, col: i32) -> Self {
        Self {
            symbol: symbol.into(),
            row,
            col,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with(mut self, key: &str, value: AttrValue) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with(key, AttrValue::Int(value))
    }

    pub fn with_text(self, key: &str, value: &str) -> Self {
        self.with(key, AttrValue::Text(value.to_string()))
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    /// First non-blank character of the symbol
    pub fn symbol_char(&self) -> Option<char> {
        self.symbol.trim().chars().next()
    }

    pub fn int(&self, key: &str) -> Option<i32> {
        self.attributes.get(key).and_then(AttrValue::as_int)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.attributes.get(key).map(AttrValue::as_text)
    }
}
