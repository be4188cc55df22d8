use crate::tags::{join_tags, parse_tag_text};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque note identifier assigned by the storage service.
///
/// The service may send ids as JSON numbers or strings; either way the value is
/// kept verbatim and only used to address the note again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<i64> for NoteId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Signed(i64),
            Unsigned(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Signed(n) => NoteId(n.to_string()),
            RawId::Unsigned(n) => NoteId(n.to_string()),
            RawId::Text(s) => NoteId(s),
        })
    }
}

/// The two shapes the service uses for the tags field.
#[derive(Deserialize)]
#[serde(untagged)]
enum TagsField {
    List(Vec<String>),
    Text(String),
}

/// Ordered tag labels. Decodes from either a delimited string or an array.
///
/// When the service sent a string, that string is kept as-is for editing so an
/// untouched note saves back exactly the text it was stored with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    labels: Vec<String>,
    raw: Option<String>,
}

impl Tags {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels, raw: None }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            labels: parse_tag_text(text),
            raw: Some(text.to_string()),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Text for the editor: the service's own string, or the labels joined.
    pub fn to_text(&self) -> String {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => join_tags(&self.labels),
        }
    }
}

/// Labels joined for listings, whatever shape the service sent.
impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&join_tags(&self.labels))
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<TagsField>::deserialize(deserializer)? {
            Some(TagsField::List(list)) => Tags::new(list),
            Some(TagsField::Text(text)) => Tags::from_text(&text),
            None => Tags::default(),
        })
    }
}

/// A note as persisted by the storage service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Timestamps are display-only, so a value we cannot read decodes as absent
// instead of failing the whole note.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_timestamp(&s),
        _ => None,
    })
}

/// Parses RFC 3339, or a zone-less ISO-8601 timestamp read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Request body for create and update. `tags` is the raw text the user typed;
/// the service does any further parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotePayload {
    pub title: String,
    pub content: String,
    pub tags: String,
}

/// The edit buffer bound to the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub content: String,
    pub tags_text: String,
}

impl Draft {
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            tags_text: note.tags.to_text(),
        }
    }

    /// True when neither title nor content has any visible text.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }

    pub fn to_payload(&self) -> NotePayload {
        NotePayload {
            title: self.title.clone(),
            content: self.content.clone(),
            tags: self.tags_text.clone(),
        }
    }
}

/// Whether the draft is a new note or an edit of a persisted one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DraftState {
    #[default]
    New,
    Existing(NoteId),
}

impl DraftState {
    pub fn selected_id(&self) -> Option<&NoteId> {
        match self {
            DraftState::New => None,
            DraftState::Existing(id) => Some(id),
        }
    }
}
