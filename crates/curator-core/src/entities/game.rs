//! Game entity - the canonical record corrections are applied to

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::value_objects::{FieldValue, Snowflake};

/// Name of the field stored in the `title` column rather than the field map
pub const TITLE_FIELD: &str = "title";

/// Canonical game record
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: Snowflake,
    pub slug: String,
    pub title: String,
    pub fields: BTreeMap<String, FieldValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    pub fn new(id: Snowflake, title: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();
        let slug = match slugify(&title) {
            slug if slug.is_empty() => id.to_string(),
            slug => slug,
        };
        Self {
            id,
            slug,
            title,
            fields: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.set_field(&field.into(), value);
        self
    }

    /// Make the slug unique by appending the id
    pub fn disambiguate_slug(&mut self) {
        let suffix = self.id.to_string();
        if !self.slug.ends_with(&suffix) {
            self.slug = format!("{}-{}", self.slug, suffix);
        }
    }

    /// Current value of a field; absent fields read as `Clear`
    pub fn field_value(&self, field: &str) -> FieldValue {
        if field == TITLE_FIELD {
            return FieldValue::Text(self.title.clone());
        }
        self.fields.get(field).cloned().unwrap_or(FieldValue::Clear)
    }

    /// Write a field; `Clear` removes it. The title only accepts text.
    pub fn set_field(&mut self, field: &str, value: FieldValue) {
        if field == TITLE_FIELD {
            if let FieldValue::Text(title) = value {
                self.title = title;
            }
        } else if value.is_clear() {
            self.fields.remove(field);
        } else {
            self.fields.insert(field.to_string(), value);
        }
        self.updated_at = Utc::now();
    }
}

/// URL slug derived from a title: lowercase alphanumerics joined by single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Chrono Trigger"), "chrono-trigger");
        assert_eq!(slugify("  Half-Life 2: Episode One!! "), "half-life-2-episode-one");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_field_reads_and_writes() {
        let mut game = Game::new(Snowflake::new(1), "Foo")
            .with_field("developer", FieldValue::text("Acme"));

        assert_eq!(game.field_value("title"), FieldValue::text("Foo"));
        assert_eq!(game.field_value("developer"), FieldValue::text("Acme"));
        assert_eq!(game.field_value("publisher"), FieldValue::Clear);

        game.set_field("title", FieldValue::text("Bar"));
        game.set_field("developer", FieldValue::Clear);
        assert_eq!(game.title, "Bar");
        assert!(!game.fields.contains_key("developer"));
    }

    #[test]
    fn test_slug_fallback_and_disambiguation() {
        let mut game = Game::new(Snowflake::new(42), "!!!");
        assert_eq!(game.slug, "42");

        let mut other = Game::new(Snowflake::new(43), "Doom");
        other.disambiguate_slug();
        assert_eq!(other.slug, "doom-43");
        other.disambiguate_slug();
        assert_eq!(other.slug, "doom-43");

        game.disambiguate_slug();
        assert_eq!(game.slug, "42");
    }

    #[test]
    fn test_title_ignores_non_text() {
        let mut game = Game::new(Snowflake::new(1), "Foo");
        game.set_field("title", FieldValue::Clear);
        assert_eq!(game.title, "Foo");
    }
}
