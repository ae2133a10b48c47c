//! Backup document: the JSON file an organization is saved to and restored from.
//!
//! Writing always emits every field. Reading is deliberately partial: only
//! `cards` and `tracks` are required, and every other top-level field that
//! is present replaces the matching live state while absent ones leave it
//! alone. Parsing and validation happen up front in [`RestorePlan::parse`],
//! so a rejected document never touches the engine.

#[cfg(test)]
#[path = "backup_test.rs"]
mod backup_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::camera::Transform;
use crate::doc::{Card, PersonTemplate, RoleTemplate, Track};
use crate::history::HistoryStep;

/// The only document version this crate writes.
pub const BACKUP_VERSION: u32 = 1;

/// Errors produced while writing or reading a backup.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("failed to parse backup file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid backup file: missing {0} data")]
    MissingField(&'static str),
    #[error("cannot restore while a {0} gesture is in progress")]
    GestureActive(&'static str),
    #[error("failed to format backup timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// A complete backup as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: u32,
    /// RFC 3339 time the backup was written.
    pub timestamp: String,
    pub org_id: String,
    pub org_name: String,
    pub cards: Vec<Card>,
    pub tracks: Vec<Track>,
    pub role_templates: Vec<RoleTemplate>,
    pub people_templates: Vec<PersonTemplate>,
    pub transform: Transform,
    pub history_steps: Vec<HistoryStep>,
}

impl BackupDocument {
    /// Current UTC time in RFC 3339 form.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Timestamp`] if the clock value cannot be formatted.
    pub fn now_timestamp() -> Result<String, BackupError> {
        Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
    }

    /// Pretty-printed JSON, two-space indented.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, BackupError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Suggested file name for a backup of `org_name`.
///
/// Every character outside `[A-Za-z0-9]` becomes `_` and the result is lowercased.
#[must_use]
pub fn backup_file_name(org_name: &str) -> String {
    let stem: String = org_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("{stem}_backup.json")
}

/// Wire shape accepted on restore: everything optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialBackup {
    version: Option<u32>,
    org_name: Option<String>,
    cards: Option<Vec<Card>>,
    tracks: Option<Vec<Track>>,
    role_templates: Option<Vec<RoleTemplate>>,
    people_templates: Option<Vec<PersonTemplate>>,
    transform: Option<Transform>,
    history_steps: Option<Vec<HistoryStep>>,
}

/// A validated restore, ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct RestorePlan {
    pub version: Option<u32>,
    /// New organization name. Empty names in the document are dropped.
    pub org_name: Option<String>,
    pub cards: Vec<Card>,
    pub tracks: Vec<Track>,
    pub role_templates: Option<Vec<RoleTemplate>>,
    pub people_templates: Option<Vec<PersonTemplate>>,
    pub transform: Option<Transform>,
    pub history_steps: Option<Vec<HistoryStep>>,
}

impl RestorePlan {
    /// Parse and validate backup text.
    ///
    /// # Errors
    ///
    /// [`BackupError::Parse`] if the text is not JSON or a present field has
    /// the wrong shape; [`BackupError::MissingField`] if `cards` or `tracks`
    /// is absent or null.
    pub fn parse(text: &str) -> Result<Self, BackupError> {
        let partial: PartialBackup = serde_json::from_str(text)?;
        let cards = partial.cards.ok_or(BackupError::MissingField("cards"))?;
        let tracks = partial.tracks.ok_or(BackupError::MissingField("tracks"))?;
        Ok(Self {
            version: partial.version,
            org_name: partial.org_name.filter(|name| !name.is_empty()),
            cards,
            tracks,
            role_templates: partial.role_templates,
            people_templates: partial.people_templates,
            transform: partial.transform,
            history_steps: partial.history_steps,
        })
    }

    /// Whether the document declares a version other than [`BACKUP_VERSION`].
    #[must_use]
    pub fn unexpected_version(&self) -> Option<u32> {
        self.version.filter(|v| *v != BACKUP_VERSION)
    }
}
