//! Documentation records as emitted by the static-site generator.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One indexed documentation unit (a section, page, type, function, ...).
///
/// Records are consumed as an opaque, already-finalized batch. Missing or
/// `null` fields decode as empty strings so indexing never rejects a record
/// for being sparse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub page: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
}

impl DocRecord {
    pub fn new(
        location: impl Into<String>,
        page: impl Into<String>,
        title: impl Into<String>,
        category: Category,
        text: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            page: page.into(),
            title: title.into(),
            category,
            text: text.into(),
        }
    }

    /// Raw string content of an indexed field.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Text => &self.text,
            Field::Category => self.category.as_str(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of documentation unit a record describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Section,
    Page,
    Type,
    Method,
    Function,
    Macro,
    /// A category string the generator emitted that we don't know about,
    /// trimmed and lowercased.
    Other(String),
}

impl Default for Category {
    /// A record without a category contributes no category tokens.
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Section => "section",
            Self::Page => "page",
            Self::Type => "type",
            Self::Method => "method",
            Self::Function => "function",
            Self::Macro => "macro",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        let name = value.trim().to_lowercase();
        match name.as_str() {
            "section" => Self::Section,
            "page" => Self::Page,
            "type" => Self::Type,
            "method" => Self::Method,
            "function" => Self::Function,
            "macro" => Self::Macro,
            _ => Self::Other(name),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map_or_else(Self::default, |s| Self::from(s.as_str())))
    }
}

/// The record fields that feed the inverted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Text,
    Category,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Title, Self::Text, Self::Category];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Text => "text",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
