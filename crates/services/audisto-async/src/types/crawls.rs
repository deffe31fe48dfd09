use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AudistoError;

/// Validated crawl identifier (a non-negative integer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrawlId(u64);

impl CrawlId {
    /// Validates a signed crawl id
    ///
    /// # Errors
    ///
    /// Returns [`AudistoError::InvalidArgument`] for negative values.
    pub fn new(id: i64) -> Result<Self, AudistoError> {
        u64::try_from(id).map(Self).map_err(|_| {
            AudistoError::InvalidArgument(format!(
                "crawl_id must be a non-negative integer (got {id})"
            ))
        })
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CrawlId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl TryFrom<&serde_json::Value> for CrawlId {
    type Error = AudistoError;

    /// Accepts only JSON integers; floats, strings, booleans and negatives are rejected.
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        if let Some(id) = value.as_u64() {
            return Ok(Self(id));
        }
        if let Some(id) = value.as_i64() {
            return Self::new(id);
        }
        Err(AudistoError::InvalidArgument(format!(
            "crawl_id must be a non-negative integer (got {value})"
        )))
    }
}

impl FromStr for CrawlId {
    type Err = AudistoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let id: i64 = s.parse().map_err(|_| {
            AudistoError::InvalidArgument(format!(
                "crawl_id must be a non-negative integer (got {s:?})"
            ))
        })?;
        Self::new(id)
    }
}

impl fmt::Display for CrawlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of a single crawl, as returned by `GET /crawls/{id}`
///
/// Every field is optional; fields the server omits are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// Crawl id
    #[serde(default)]
    pub id: Option<u64>,
    /// Crawled domain
    #[serde(default)]
    pub domain: Option<String>,
    /// Number of pages crawled
    #[serde(default)]
    pub crawled_pages: Option<u64>,
    /// Maximum link depth reached
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Start time, kept verbatim as sent by the server
    #[serde(default)]
    pub start_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn crawl_id_rejects_negative() {
        assert!(matches!(
            CrawlId::new(-1),
            Err(AudistoError::InvalidArgument(_))
        ));
        assert_eq!(CrawlId::new(0).unwrap().get(), 0);
        assert_eq!(CrawlId::new(12345).unwrap().get(), 12345);
    }

    #[test]
    fn crawl_id_from_json_requires_integer() {
        assert_eq!(CrawlId::try_from(&json!(42)).unwrap(), CrawlId::from(42));
        for bad in [json!(-3), json!(1.5), json!("12"), json!(true), json!(null)] {
            assert!(
                matches!(CrawlId::try_from(&bad), Err(AudistoError::InvalidArgument(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn crawl_id_from_str() {
        assert_eq!("77".parse::<CrawlId>().unwrap().get(), 77);
        assert!("-77".parse::<CrawlId>().is_err());
        assert!("abc".parse::<CrawlId>().is_err());
        assert_eq!(CrawlId::from(9).to_string(), "9");
    }

    #[test]
    fn summary_missing_fields_are_none() {
        let s: CrawlSummary =
            serde_json::from_value(json!({"domain": "example.com", "crawled_pages": 42})).unwrap();
        assert_eq!(s.domain.as_deref(), Some("example.com"));
        assert_eq!(s.crawled_pages, Some(42));
        assert_eq!(s.id, None);
        assert_eq!(s.max_depth, None);
        assert_eq!(s.start_time, None);
    }

    #[test]
    fn summary_ignores_unknown_fields_and_accepts_nulls() {
        let s: CrawlSummary = serde_json::from_value(json!({
            "id": 7,
            "domain": null,
            "max_depth": 12,
            "start_time": "2024-05-01 10:00:00",
            "ignored_pages": 3
        }))
        .unwrap();
        assert_eq!(s.id, Some(7));
        assert_eq!(s.domain, None);
        assert_eq!(s.max_depth, Some(12));
        assert_eq!(s.start_time.as_deref(), Some("2024-05-01 10:00:00"));
    }

    #[test]
    fn summary_wrong_type_fails() {
        let res = serde_json::from_value::<CrawlSummary>(json!({"crawled_pages": "many"}));
        assert!(res.is_err());
    }
}
