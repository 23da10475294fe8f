//! Endpoint shapes for one record kind.
//!
//! Deployments of the content API follow one of two REST conventions. Which
//! one applies is configured per kind; responses are never sniffed.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use crate::error::{FolioError, Result};
use crate::record::Kind;

/// Where the index lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListShape {
    /// `GET /api/<kind>/list`
    #[default]
    ListSuffix,
    /// `GET /api/<kind>`
    Root,
}

/// Where new records are posted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateShape {
    /// `POST /api/<kind>/upload`
    #[default]
    Upload,
    /// `POST /api/<kind>`
    Root,
}

/// How a record to delete is identified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteShape {
    /// `DELETE /api/<kind>/delete` with `{"filename": ..}`
    #[default]
    Body,
    /// `DELETE /api/<kind>/<filename>`
    Path,
}

/// How an update body is encoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateShape {
    /// The payload object as-is
    #[default]
    Plain,
    /// `{"contents": "<payload serialized as JSON>"}`
    Wrapped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default)]
    pub list: ListShape,
    #[serde(default)]
    pub create: CreateShape,
    #[serde(default)]
    pub delete: DeleteShape,
    #[serde(default)]
    pub update: UpdateShape,
}

/// HTTP verbs the core issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_method(&self) -> reqwest::Method {
        match self {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Put => reqwest::Method::PUT,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully resolved mutation request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub verb: Verb,
    pub url: String,
    pub body: Option<Value>,
}

/// Resolves the URLs of one kind's endpoints against a base URL.
#[derive(Debug, Clone)]
pub struct Routes {
    base: Url,
    kind: Kind,
    endpoints: Endpoints,
}

impl Routes {
    pub fn new(base_url: &str, kind: Kind, endpoints: Endpoints) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| FolioError::Config(format!("invalid base_url '{base_url}': {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            kind,
            endpoints,
        })
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn endpoints(&self) -> Endpoints {
        self.endpoints
    }

    fn collection(&self) -> String {
        format!("{}api/{}", self.base, self.kind.as_str())
    }

    pub fn list_url(&self) -> String {
        match self.endpoints.list {
            ListShape::ListSuffix => format!("{}/list", self.collection()),
            ListShape::Root => self.collection(),
        }
    }

    /// Detail URLs from the index may be relative to the base URL.
    pub fn detail_url(&self, url: &str) -> Result<String> {
        self.base
            .join(url)
            .map(String::from)
            .map_err(|e| FolioError::SchemaInvalid(format!("invalid detail url '{url}': {e}")))
    }

    pub fn create(&self, payload: Value) -> ApiRequest {
        let url = match self.endpoints.create {
            CreateShape::Upload => format!("{}/upload", self.collection()),
            CreateShape::Root => self.collection(),
        };
        ApiRequest {
            verb: Verb::Post,
            url,
            body: Some(payload),
        }
    }

    pub fn update(&self, filename: &str, payload: Value) -> Result<ApiRequest> {
        let body = match self.endpoints.update {
            UpdateShape::Plain => payload,
            UpdateShape::Wrapped => json!({ "contents": serde_json::to_string(&payload)? }),
        };
        Ok(ApiRequest {
            verb: Verb::Put,
            url: self.filename_url(filename),
            body: Some(body),
        })
    }

    pub fn delete(&self, filename: &str) -> ApiRequest {
        match self.endpoints.delete {
            DeleteShape::Body => ApiRequest {
                verb: Verb::Delete,
                url: format!("{}/delete", self.collection()),
                body: Some(json!({ "filename": filename })),
            },
            DeleteShape::Path => ApiRequest {
                verb: Verb::Delete,
                url: self.filename_url(filename),
                body: None,
            },
        }
    }

    fn filename_url(&self, filename: &str) -> String {
        format!("{}/{}", self.collection(), urlencoding::encode(filename))
    }
}
