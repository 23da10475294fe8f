//! Record kinds and the detail model.
//!
//! Details arrive as loosely-typed JSON. Parsing is lenient: a field of the
//! wrong type degrades to its zero value, and only a missing or empty `title`
//! rejects the whole record.

mod coerce;
pub mod date;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FolioError, Result};

/// The two record families served by the content API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Publications,
    Projects,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Publications, Kind::Projects];

    /// Path segment under `/api/`
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Publications => "publications",
            Kind::Projects => "projects",
        }
    }

    /// Singular noun for user-facing messages
    pub fn singular(&self) -> &'static str {
        match self {
            Kind::Publications => "publication",
            Kind::Projects => "project",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Kind {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "publications" | "publication" => Ok(Kind::Publications),
            "projects" | "project" => Ok(Kind::Projects),
            _ => Err(FolioError::Config(format!(
                "unknown record kind '{s}', expected 'publications' or 'projects'"
            ))),
        }
    }
}

/// Body text, either a single string or ordered paragraphs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Paragraphs(Vec<String>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl Content {
    /// Editable text form: paragraphs are separated by a blank line.
    pub fn to_text(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Paragraphs(paragraphs) => paragraphs.join("\n\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(text) => text.is_empty(),
            Content::Paragraphs(paragraphs) => paragraphs.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub title: String,
    pub content: Content,
    pub date: String,
    pub publication_url: String,
    pub authors: Vec<String>,
    pub venue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub content: Content,
    pub date: String,
    pub partner: Partner,
}

/// Full record detail, one variant per kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Detail {
    Publication(Publication),
    Project(Project),
}

impl Detail {
    /// Coerce a JSON body into a detail of the given kind.
    pub fn from_value(kind: Kind, value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            FolioError::SchemaInvalid(format!("expected a JSON object, got {}", type_name(value)))
        })?;

        let title = coerce::string_field(obj, "title");
        if title.is_empty() {
            return Err(FolioError::SchemaInvalid(
                "missing or empty 'title'".to_string(),
            ));
        }

        let content = coerce::content_field(obj, "content");
        let date = coerce::string_field(obj, "date");

        Ok(match kind {
            Kind::Publications => Detail::Publication(Publication {
                title,
                content,
                date,
                publication_url: coerce::string_field(obj, "publicationUrl"),
                authors: coerce::string_list(obj, "authors"),
                venue: coerce::string_field(obj, "venue"),
            }),
            Kind::Projects => Detail::Project(Project {
                title,
                content,
                date,
                partner: coerce::partner_field(obj, "partner"),
            }),
        })
    }

    pub fn kind(&self) -> Kind {
        match self {
            Detail::Publication(_) => Kind::Publications,
            Detail::Project(_) => Kind::Projects,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Detail::Publication(p) => &p.title,
            Detail::Project(p) => &p.title,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            Detail::Publication(p) => &p.date,
            Detail::Project(p) => &p.date,
        }
    }

    pub fn content(&self) -> &Content {
        match self {
            Detail::Publication(p) => &p.content,
            Detail::Project(p) => &p.content,
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
