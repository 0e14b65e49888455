use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::error::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Formats a timestamp the way the hosting API does, `2024-06-04T12:34:56Z`.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Owner and name of the repository a request targets.
///
/// The registry is global, this only feeds the generated URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetState {
    #[default]
    Uploaded,
}

/// Binary attached to a release.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Asset {
    pub id: u64,
    pub name: String,
    pub label: String,
    pub content_type: String,
    /// Declared by the uploader, never checked against the stored bytes.
    pub size: u64,
    pub state: AssetState,
    pub url: String,
    pub browser_download_url: String,
    pub node_id: String,
    pub download_count: u64,
    pub uploader: Value,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
    // derived once at creation, a later tag_name change leaves them untouched
    pub url: String,
    pub html_url: String,
    pub upload_url: String,
    pub assets_url: String,
    pub tarball_url: String,
    pub zipball_url: String,
    pub created_at: String,
    pub published_at: String,
    pub node_id: String,
    pub author: String,
    pub assets: Vec<Asset>,
}

/// Payload of a release creation request.
///
/// Every field is optional at the wire level so that a missing one turns into
/// a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct CreateRelease {
    pub tag_name: Option<String>,
    pub target_commitish: Option<String>,
    pub name: Option<String>,
    pub body: Option<String>,
    pub draft: Option<bool>,
    pub prerelease: Option<bool>,
}

/// Allow-listed changes applicable to an existing release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseUpdate {
    pub tag_name: Option<String>,
    pub target_commitish: Option<String>,
    pub name: Option<String>,
    pub body: Option<String>,
    pub draft: Option<bool>,
    pub prerelease: Option<bool>,
}

impl ReleaseUpdate {
    pub fn apply(self, release: &mut Release) {
        if let Some(value) = self.tag_name {
            release.tag_name = value;
        }
        if let Some(value) = self.target_commitish {
            release.target_commitish = value;
        }
        if let Some(value) = self.name {
            release.name = value;
        }
        if let Some(value) = self.body {
            release.body = value;
        }
        if let Some(value) = self.draft {
            release.draft = value;
        }
        if let Some(value) = self.prerelease {
            release.prerelease = value;
        }
    }
}

fn expect_string(field: &str, value: Value) -> Result<String, Error> {
    match value {
        Value::String(inner) => Ok(inner),
        other => Err(Error::validation(format!(
            "field {field:?} expects a string, got {other}"
        ))),
    }
}

fn expect_nullable_string(field: &str, value: Value) -> Result<String, Error> {
    match value {
        Value::Null => Ok(String::new()),
        other => expect_string(field, other),
    }
}

fn expect_bool(field: &str, value: Value) -> Result<bool, Error> {
    match value {
        Value::Bool(inner) => Ok(inner),
        other => Err(Error::validation(format!(
            "field {field:?} expects a boolean, got {other}"
        ))),
    }
}

impl TryFrom<Map<String, Value>> for ReleaseUpdate {
    type Error = Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut update = Self::default();
        for (field, value) in fields {
            match field.as_str() {
                "tag_name" => update.tag_name = Some(expect_string(&field, value)?),
                "target_commitish" => {
                    update.target_commitish = Some(expect_string(&field, value)?);
                }
                "name" => update.name = Some(expect_nullable_string(&field, value)?),
                "body" => update.body = Some(expect_nullable_string(&field, value)?),
                "draft" => update.draft = Some(expect_bool(&field, value)?),
                "prerelease" => update.prerelease = Some(expect_bool(&field, value)?),
                _ => {
                    return Err(Error::validation(format!(
                        "field {field:?} cannot be updated"
                    )));
                }
            }
        }
        Ok(update)
    }
}

/// Metadata sent alongside the bytes of an uploaded asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetUpload {
    pub name: Option<String>,
    pub label: Option<String>,
    pub content_type: Option<String>,
    pub declared_size: Option<u64>,
}

/// Where a blob landed once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub path: std::path::PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}
