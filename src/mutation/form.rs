//! Editable record forms and the payloads built from them.
//!
//! Create and update share one pipeline: required-field validation, URL
//! normalization, and conversion of free text into paragraphs. All of it runs
//! locally, before any request is made.

use serde_json::{Value, json};
use url::Url;

use crate::error::{FolioError, Result};
use crate::record::{Detail, Kind, date};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationForm {
    pub title: String,
    pub content: String,
    pub date: String,
    pub publication_url: String,
    /// Comma- or newline-separated
    pub authors: String,
    pub venue: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub title: String,
    pub content: String,
    pub date: String,
    pub partner_name: String,
    pub partner_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordForm {
    Publication(PublicationForm),
    Project(ProjectForm),
}

impl RecordForm {
    pub fn empty(kind: Kind) -> Self {
        match kind {
            Kind::Publications => RecordForm::Publication(PublicationForm::default()),
            Kind::Projects => RecordForm::Project(ProjectForm::default()),
        }
    }

    /// Prefill a form from a loaded detail.
    pub fn from_detail(detail: &Detail) -> Self {
        match detail {
            Detail::Publication(p) => RecordForm::Publication(PublicationForm {
                title: p.title.clone(),
                content: p.content.to_text(),
                date: p.date.clone(),
                publication_url: p.publication_url.clone(),
                authors: p.authors.join(", "),
                venue: p.venue.clone(),
            }),
            Detail::Project(p) => RecordForm::Project(ProjectForm {
                title: p.title.clone(),
                content: p.content.to_text(),
                date: p.date.clone(),
                partner_name: p.partner.name.clone(),
                partner_url: p.partner.url.clone(),
            }),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            RecordForm::Publication(_) => Kind::Publications,
            RecordForm::Project(_) => Kind::Projects,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            RecordForm::Publication(f) => &f.title,
            RecordForm::Project(f) => &f.title,
        }
    }

    /// Validate and normalize the form into a request payload.
    pub fn payload(&self) -> Result<Value> {
        match self {
            RecordForm::Publication(f) => {
                require(&[
                    ("title", &f.title),
                    ("content", &f.content),
                    ("date", &f.date),
                    ("publication URL", &f.publication_url),
                    ("authors", &f.authors),
                    ("venue", &f.venue),
                ])?;
                let authors = split_authors(&f.authors);
                if authors.is_empty() {
                    return Err(FolioError::Validation(
                        "At least one author is required".to_string(),
                    ));
                }
                validate_date(&f.date)?;
                let publication_url = normalize_url(&f.publication_url)?;

                Ok(json!({
                    "title": f.title.trim(),
                    "content": split_paragraphs(&f.content),
                    "date": f.date.trim(),
                    "publicationUrl": publication_url,
                    "authors": authors,
                    "venue": f.venue.trim(),
                }))
            }
            RecordForm::Project(f) => {
                require(&[
                    ("title", &f.title),
                    ("content", &f.content),
                    ("date", &f.date),
                    ("partner name", &f.partner_name),
                    ("partner URL", &f.partner_url),
                ])?;
                validate_date(&f.date)?;
                let partner_url = normalize_url(&f.partner_url)?;

                Ok(json!({
                    "title": f.title.trim(),
                    "content": split_paragraphs(&f.content),
                    "date": f.date.trim(),
                    "partner": {
                        "name": f.partner_name.trim(),
                        "url": partner_url,
                    },
                }))
            }
        }
    }
}

fn require(fields: &[(&str, &String)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(FolioError::Validation(format!(
        "Please fill in all required fields: {}",
        missing.join(", ")
    )))
}

fn validate_date(text: &str) -> Result<()> {
    if date::parse_millis(text).is_none() {
        return Err(FolioError::Validation(format!(
            "'{}' is not a valid date (expected e.g. 2024-03-01)",
            text.trim()
        )));
    }
    Ok(())
}

fn split_authors(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split free text into paragraphs on runs of two or more newlines.
///
/// Line endings are normalized first and empty paragraphs are dropped. Text
/// with no paragraph breaks becomes a single trimmed paragraph.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let paragraphs: Vec<String> = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if paragraphs.is_empty() {
        return vec![normalized.trim().to_string()];
    }
    paragraphs
}

/// Prefix `https://` when no scheme is given, then require a parseable URL.
pub fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match Url::parse(&candidate) {
        Ok(url) if url.has_host() => Ok(candidate),
        _ => Err(FolioError::Validation(format!(
            "'{trimmed}' is not a valid URL"
        ))),
    }
}

fn has_scheme(text: &str) -> bool {
    let Some((scheme, _)) = text.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// The record's filename: the last segment of its pathname, percent-decoded.
///
/// Trailing slashes are ignored. If decoding fails the raw segment is used.
pub fn filename_from_pathname(pathname: &str) -> String {
    let trimmed = pathname.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    }
}
