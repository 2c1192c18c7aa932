//! Research paper record as returned by the upstream endpoint.
//!
//! The upstream shape is loosely typed: nearly every field can be missing,
//! `null`, or carry a number as a string. Everything except `id` is optional
//! here, and the accessors supply the fallbacks the list pipeline relies on
//! (empty string for text, `0.0` for impact factor, no timestamp for dates).
//! Fields this crate does not model are kept in [`Paper::extra`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Record identifier; upstream sends numbers, but strings are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaperId {
    Num(i64),
    Text(String),
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperId::Num(n) => write!(f, "{}", n),
            PaperId::Text(s) => f.write_str(s),
        }
    }
}

impl PaperId {
    /// Match against user input such as a CLI argument.
    pub fn matches(&self, input: &str) -> bool {
        match self {
            PaperId::Num(n) => input.trim().parse::<i64>().map(|v| v == *n).unwrap_or(false),
            PaperId::Text(s) => s == input.trim(),
        }
    }
}

/// Journal the paper was accepted in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub impactfactor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub journalabbreviation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub issn: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub publishingcompany: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub journalreach: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mediumofpublication: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub articleinfluence: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub crimsoniscore: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub hirschindex: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub journalsubjectarea: Option<String>,
}

/// Subject-area level (`salevelone`, `saleveltwo`, `salevelthree`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectArea {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceType {
    #[serde(default, deserialize_with = "lenient_text")]
    pub servicename: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub servicetype: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(default, deserialize_with = "lenient_text")]
    pub publishername: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, deserialize_with = "lenient_text")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub memid: Option<String>,
}

/// A single accepted research paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub id: PaperId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub papertitle: Option<String>,
    /// Author list as one display string
    #[serde(default, deserialize_with = "lenient_text")]
    pub coauthors: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub publishername: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub journal: Option<Journal>,
    #[serde(default, deserialize_with = "lenient")]
    pub salevelone: Option<SubjectArea>,
    #[serde(default, deserialize_with = "lenient")]
    pub saleveltwo: Option<SubjectArea>,
    #[serde(default, deserialize_with = "lenient")]
    pub salevelthree: Option<SubjectArea>,
    #[serde(default, deserialize_with = "lenient")]
    pub servicetype: Option<ServiceType>,
    #[serde(default, deserialize_with = "lenient")]
    pub publisher: Option<Publisher>,
    #[serde(default, deserialize_with = "lenient")]
    pub client: Option<Client>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub articlelink: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub journalaltimpactfactor: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub journaldetails: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub assignmentno: Option<String>,
    /// ISO 8601 publication timestamp
    #[serde(default, deserialize_with = "lenient_text")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    /// Fields not modelled above, carried through unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Paper {
    /// Minimal record; mostly useful for building fixtures.
    pub fn new(id: PaperId) -> Self {
        Self {
            id,
            papertitle: None,
            coauthors: None,
            publishername: None,
            journal: None,
            salevelone: None,
            saleveltwo: None,
            salevelthree: None,
            servicetype: None,
            publisher: None,
            client: None,
            articlelink: None,
            journalaltimpactfactor: None,
            journaldetails: None,
            assignmentno: None,
            published_at: None,
            created_at: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn title(&self) -> &str {
        self.papertitle.as_deref().unwrap_or("")
    }

    pub fn authors(&self) -> &str {
        self.coauthors.as_deref().unwrap_or("")
    }

    pub fn journal_title(&self) -> &str {
        self.journal
            .as_ref()
            .and_then(|j| j.title.as_deref())
            .unwrap_or("")
    }

    pub fn journal_abbreviation(&self) -> Option<&str> {
        self.journal
            .as_ref()
            .and_then(|j| j.journalabbreviation.as_deref())
    }

    /// Raw impact factor, `None` when absent.
    pub fn impact_factor_opt(&self) -> Option<f64> {
        self.journal.as_ref().and_then(|j| j.impactfactor)
    }

    /// Impact factor for ordering; absent sorts as `0.0`.
    pub fn impact_factor(&self) -> f64 {
        self.impact_factor_opt().unwrap_or(0.0)
    }

    pub fn subject_area(&self) -> &str {
        self.salevelone
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("")
    }

    pub fn publisher_name(&self) -> &str {
        self.publishername.as_deref().unwrap_or("")
    }

    pub fn service_name(&self) -> &str {
        self.servicetype
            .as_ref()
            .and_then(|s| s.servicename.as_deref())
            .unwrap_or("")
    }

    /// Parsed publication timestamp.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_deref().and_then(parse_timestamp)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    /// Text fields searched by the free-text filter.
    pub fn searchable_fields(&self) -> [&str; 5] {
        [
            self.title(),
            self.authors(),
            self.journal_title(),
            self.publisher_name(),
            self.subject_area(),
        ]
    }
}

/// Parse an upstream timestamp.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC) and
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Number or numeric string -> finite f64; anything else -> None.
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// Nested object of the wrong shape -> None, instead of failing the record.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// String, number or bool -> display string.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
