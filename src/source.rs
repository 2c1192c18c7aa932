//! Record sources.
//!
//! [`PaperSource`] fetches the record list over HTTP; [`FileSource`] reads the
//! same JSON from disk. Both reject anything that is not a JSON array of
//! records. Neither retries: retry is an explicit user action.

use crate::config::Config;
use crate::error::{PaperdashError, Result};
use crate::record::Paper;
use reqwest::header::ACCEPT;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Something that can produce the full record set.
pub trait RecordSource {
    fn fetch_records(&self) -> impl Future<Output = Result<Vec<Paper>>> + Send;

    /// Human-readable origin, used in logs and the status line.
    fn describe(&self) -> String;
}

/// HTTP client for the accepted-papers endpoint.
pub struct PaperSource {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl PaperSource {
    pub fn new(config: &Config) -> Result<Self> {
        let url = config.records_url()?;
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .user_agent(concat!("paperdash/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PaperdashError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            timeout,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn classify(&self, e: reqwest::Error) -> PaperdashError {
        if e.is_timeout() {
            PaperdashError::Timeout(self.timeout)
        } else if e.is_decode() {
            PaperdashError::Format(e.to_string())
        } else {
            PaperdashError::Network(describe_reqwest_error(&e))
        }
    }
}

impl RecordSource for PaperSource {
    async fn fetch_records(&self) -> Result<Vec<Paper>> {
        info!(url = %self.url, "Fetching records");

        let response = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            warn!(url = %self.url, status = status.as_u16(), "Record fetch failed");
            return Err(PaperdashError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let papers = parse_records(&body)?;

        info!(url = %self.url, count = papers.len(), "Fetched records");
        Ok(papers)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Reads the record list from a JSON file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for FileSource {
    async fn fetch_records(&self) -> Result<Vec<Paper>> {
        debug!(path = ?self.path, "Reading records from file");
        let body = tokio::fs::read_to_string(&self.path).await?;
        parse_records(&body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse a response body into records.
///
/// The body must be a JSON array; every element must deserialize as a
/// [`Paper`].
pub fn parse_records(body: &str) -> Result<Vec<Paper>> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| PaperdashError::Format(format!("response is not valid JSON: {}", e)))?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(PaperdashError::Format(format!(
                "expected a JSON array of records, got {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value::<Paper>(item)
                .map_err(|e| PaperdashError::Format(format!("record {}: {}", idx, e)))
        })
        .collect()
}

/// `message` field of a JSON error body, if any.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// reqwest's top-level message omits the cause; append the source chain.
fn describe_reqwest_error(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_records_array() -> Result<()> {
        let papers = parse_records(r#"[{"id": 1, "papertitle": "A"}, {"id": 2}]"#)?;
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].title(), "A");
        Ok(())
    }

    #[test]
    fn test_parse_records_rejects_non_array() {
        let err = parse_records(r#"{"data": []}"#);
        assert!(matches!(err, Err(PaperdashError::Format(ref m)) if m.contains("an object")));

        let err = parse_records("<html>");
        assert!(matches!(err, Err(PaperdashError::Format(_))));
    }

    #[test]
    fn test_parse_records_keeps_record_with_malformed_fields() -> Result<()> {
        let papers = parse_records(
            r#"[
                {"id": 1, "papertitle": "Alpha", "salevelone": {"name": "Biology"}},
                {"id": 2, "papertitle": "Beta", "salevelone": "Medicine"},
                {"id": 3, "papertitle": 404, "journal": {"impactfactor": "NaN"}}
            ]"#,
        )?;
        assert_eq!(papers.len(), 3);
        assert_eq!(papers[0].subject_area(), "Biology");
        assert_eq!(papers[1].title(), "Beta");
        assert_eq!(papers[1].subject_area(), "");
        assert_eq!(papers[2].impact_factor(), 0.0);
        Ok(())
    }

    #[test]
    fn test_parse_records_bad_element() {
        let err = parse_records(r#"[{"id": 1}, {"papertitle": "no id"}]"#);
        assert!(matches!(err, Err(PaperdashError::Format(ref m)) if m.starts_with("record 1")));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"message": "Service unavailable"}"#),
            Some("Service unavailable".to_string())
        );
        assert_eq!(error_message("oops"), None);
        assert_eq!(error_message(r#"{"message": ""}"#), None);
    }

    #[tokio::test]
    async fn test_file_source() -> Result<()> {
        use std::io::Write;

        let mut file = NamedTempFile::new()?;
        write!(file, r#"[{{"id": 5, "papertitle": "From disk"}}]"#)?;

        let source = FileSource::new(file.path());
        let papers = source.fetch_records().await?;
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].title(), "From disk");
        Ok(())
    }
}
