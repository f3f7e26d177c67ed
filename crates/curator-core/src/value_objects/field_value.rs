//! Field values carried by corrections
//!
//! A proposed change can target fields of different shapes (title text,
//! release year, flags, genre lists). Clearing a field is its own variant so a
//! "set to nothing" decision is never confused with a missing value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single game field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
    /// Explicitly empty the field
    Clear,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[inline]
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }

    /// True for values that carry no content but are not an explicit clear
    /// (whitespace-only text, empty lists, non-finite numbers).
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(|item| item.trim().is_empty()),
            Self::Number(n) => !n.is_finite(),
            Self::Bool(_) | Self::Clear => false,
        }
    }

    /// Number of characters stored, used for size limits
    pub fn char_len(&self) -> usize {
        match self {
            Self::Text(s) => s.chars().count(),
            Self::List(items) => items.iter().map(|item| item.chars().count()).sum(),
            Self::Number(_) | Self::Bool(_) | Self::Clear => 0,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Case-insensitive substring match against the rendered value
    pub fn contains_ignore_case(&self, needle_lower: &str) -> bool {
        self.to_string().to_lowercase().contains(needle_lower)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => write!(f, "{}", items.join(", ")),
            Self::Clear => write!(f, "(empty)"),
        }
    }
}
