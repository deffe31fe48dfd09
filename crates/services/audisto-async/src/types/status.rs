use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status value the server reports for a completed crawl
pub const STATUS_FINISHED: &str = "finished";

/// One entry of the recent-crawls listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStatusItem {
    /// Crawl id
    #[serde(default)]
    pub id: Option<u64>,
    /// Crawled domain
    #[serde(default)]
    pub domain: Option<String>,
    /// Free-form status string
    #[serde(default)]
    pub status: Option<String>,
}

impl CrawlStatusItem {
    /// Returns true once the crawl has completed
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.as_deref() == Some(STATUS_FINISHED)
    }
}

/// Recent crawls in server order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStatusResponse {
    /// Crawls as listed by the server
    pub items: Vec<CrawlStatusItem>,
}

impl CrawlStatusResponse {
    /// Builds the response from either `{"items": [...]}` or a bare array
    ///
    /// # Errors
    ///
    /// Returns the serde error when the body has neither shape or an item fails
    /// to validate.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Array(_) => Ok(Self {
                items: Vec::<CrawlStatusItem>::deserialize(value)?,
            }),
            _ => Self::deserialize(value),
        }
    }
}

/// Result of the crawl-status call: the typed listing, or the decoded body
/// when it did not match the expected shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CrawlStatus {
    /// Body validated as a crawl listing
    Parsed(CrawlStatusResponse),
    /// Body as decoded, shape not recognized
    Raw(Value),
}

impl CrawlStatus {
    /// Validates `value`, keeping it untouched when validation fails
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match CrawlStatusResponse::from_value(&value) {
            Ok(parsed) => Self::Parsed(parsed),
            Err(e) => {
                tracing::warn!("Failed to validate crawl status response: {e}. Returning raw data.");
                Self::Raw(value)
            }
        }
    }

    /// Returns the typed listing, if validation succeeded
    #[must_use]
    pub const fn parsed(&self) -> Option<&CrawlStatusResponse> {
        match self {
            Self::Parsed(p) => Some(p),
            Self::Raw(_) => None,
        }
    }

    /// Best-effort view of the crawls for display
    ///
    /// For a raw body this reads `id`, `domain` and `status` from whatever
    /// entries are present and renders each value as the server sent it.
    #[must_use]
    pub fn rows(&self) -> Vec<CrawlStatusRow> {
        match self {
            Self::Parsed(p) => p.items.iter().map(CrawlStatusRow::from).collect(),
            Self::Raw(value) => {
                let entries = match value {
                    Value::Array(a) => a.as_slice(),
                    Value::Object(o) => o
                        .get("items")
                        .and_then(Value::as_array)
                        .map_or(&[][..], Vec::as_slice),
                    _ => &[][..],
                };
                entries
                    .iter()
                    .map(|entry| CrawlStatusRow {
                        id: entry.get("id").and_then(present).map(display_value),
                        domain: entry.get("domain").and_then(present).map(display_value),
                        status: entry.get("status").and_then(present).map(display_value),
                    })
                    .collect()
            }
        }
    }
}

/// Display form of one listed crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatusRow {
    /// Crawl id as sent by the server
    pub id: Option<String>,
    /// Crawled domain
    pub domain: Option<String>,
    /// Free-form status string
    pub status: Option<String>,
}

impl CrawlStatusRow {
    /// Returns true once the crawl has completed
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.as_deref() == Some(STATUS_FINISHED)
    }
}

impl From<&CrawlStatusItem> for CrawlStatusRow {
    fn from(item: &CrawlStatusItem) -> Self {
        Self {
            id: item.id.map(|id| id.to_string()),
            domain: item.domain.clone(),
            status: item.status.clone(),
        }
    }
}

fn present(v: &Value) -> Option<&Value> {
    (!v.is_null()).then_some(v)
}

fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
