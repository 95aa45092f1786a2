//! Document collection loading
//!
//! The collection lives behind a single fixed resource: either an HTTP
//! endpoint or a local JSON file. The body is a JSON array of records or an
//! object mapping ids to records.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{Config, DataLocation};
use crate::library::errors::LoadError;
use crate::models::DocumentRecord;

/// A read-only location the document collection can be fetched from
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the raw resource body
    async fn fetch(&self) -> Result<Vec<u8>, LoadError>;

    /// Location shown in logs and status messages
    fn describe(&self) -> String;
}

/// Collection served over HTTP
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: &str, config: &Config) -> Result<Self, LoadError> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status_code: status.as_u16(),
                location: self.url.clone(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Collection read from a local JSON file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        debug!("Reading {}", self.path.display());
        Ok(tokio::fs::read(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Build the source named by the configuration
pub fn source_from_config(config: &Config) -> Result<Arc<dyn DocumentSource>, LoadError> {
    Ok(match &config.data {
        DataLocation::Url(url) => Arc::new(HttpSource::new(url, config)?),
        DataLocation::File(path) => Arc::new(FileSource::new(path.clone())),
    })
}

/// Fetch and parse the whole collection
pub async fn load(source: &dyn DocumentSource) -> Result<Vec<DocumentRecord>, LoadError> {
    info!("Loading documents from {}", source.describe());

    let body = source.fetch().await?;
    let records = parse_collection(&body)?;

    info!("Loaded {} documents from {}", records.len(), source.describe());
    Ok(records)
}

/// Parse a collection body into records.
///
/// Object bodies are flattened to their values; the resulting order carries
/// no meaning. A record without an id takes its mapping key. Records that
/// still have no id, or repeat an id already seen, are dropped.
pub fn parse_collection(body: &[u8]) -> Result<Vec<DocumentRecord>, LoadError> {
    let value: Value = serde_json::from_slice(body)?;

    let entries: Vec<(Option<String>, Value)> = match value {
        Value::Array(items) => items.into_iter().map(|item| (None, item)).collect(),
        Value::Object(map) => map.into_iter().map(|(key, item)| (Some(key), item)).collect(),
        other => return Err(LoadError::UnexpectedShape(json_kind(&other).to_string())),
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut records = Vec::with_capacity(entries.len());

    for (key, item) in entries {
        let mut record: DocumentRecord = serde_json::from_value(item)?;

        if record.id.is_empty() {
            if let Some(key) = key {
                record.id = key;
            }
        }

        if record.id.is_empty() {
            warn!("Skipping document without id: {}", record.display_title());
            continue;
        }

        if !seen.insert(record.id.clone()) {
            warn!("Skipping duplicate document id {}", record.id);
            continue;
        }

        records.push(record);
    }

    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and return the URL to request
    async fn serve_once(status_line: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/data/processed_files.json", addr)
    }

    #[test]
    fn test_parse_array_body() {
        let body = br#"[
            {"id": "a", "title": "Annual Report 2023", "tags": ["finance"]},
            {"id": "b", "title": "Market Analysis Q2", "authors": ["R. Department"]}
        ]"#;

        let records = parse_collection(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[1].primary_author(), "R. Department");
    }

    #[test]
    fn test_parse_keyed_mapping_body() {
        let body = br#"{
            "file-1": {"id": "file-1", "title": "Board Meeting Minutes"},
            "file-2": {"title": "Product Launch Memo"}
        }"#;

        let mut ids: Vec<String> = parse_collection(body)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["file-1", "file-2"]);
    }

    #[test]
    fn test_parse_drops_missing_and_duplicate_ids() {
        let body = br#"[
            {"id": "a", "title": "First"},
            {"title": "No id"},
            {"id": "a", "title": "Second"}
        ]"#;

        let records = parse_collection(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "First");
    }

    #[test]
    fn test_parse_rejects_bad_bodies() {
        assert!(matches!(parse_collection(b"not json"), Err(LoadError::Malformed(_))));
        assert!(matches!(
            parse_collection(b"\"just a string\""),
            Err(LoadError::UnexpectedShape(_))
        ));
        assert!(matches!(
            parse_collection(br#"[{"id": "a", "authors": "not a list"}]"#),
            Err(LoadError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_files.json");
        std::fs::write(&path, r#"{"x": {"title": "Competitive Analysis"}}"#).unwrap();

        let records = load(&FileSource::new(&path)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "x");

        let missing = FileSource::new(dir.path().join("missing.json"));
        assert!(matches!(load(&missing).await, Err(LoadError::Io(_))));
    }

    #[tokio::test]
    async fn test_http_source_success() {
        let url = serve_once("200 OK", r#"[{"id": "1", "title": "Acme Corp"}]"#).await;
        let source = HttpSource::new(&url, &Config::default()).unwrap();

        let records = load(&source).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Acme Corp");
    }

    #[tokio::test]
    async fn test_http_source_server_error() {
        let url = serve_once("500 Internal Server Error", "{}").await;
        let source = HttpSource::new(&url, &Config::default()).unwrap();

        match load(&source).await {
            Err(LoadError::Status { status_code, .. }) => assert_eq!(status_code, 500),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_source_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/data/processed_files.json", addr);
        let source = HttpSource::new(&url, &Config::default()).unwrap();
        assert!(matches!(load(&source).await, Err(LoadError::Http(_))));
    }
}
