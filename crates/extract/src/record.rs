// ABOUTME: PostRecord, the extracted unit handed from the pipeline to the exporter.
// ABOUTME: Also PublishDate, which keeps unparseable raw dates for diagnostics.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A publish date: canonical when it parsed, verbatim otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublishDate {
    Parsed(DateTime<Utc>),
    Raw(String),
}

impl PublishDate {
    /// The canonical instant, when the date parsed.
    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            PublishDate::Parsed(instant) => Some(*instant),
            PublishDate::Raw(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, PublishDate::Parsed(_))
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishDate::Parsed(instant) => write!(f, "{}", instant.to_rfc3339()),
            PublishDate::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

/// One blog post extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub source_locator: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_timestamp: Option<PublishDate>,
    pub category: String,
    pub body: String,
}
