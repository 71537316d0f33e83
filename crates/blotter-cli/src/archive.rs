//! Archive loading.
//!
//! An archive is a JSON file holding captured tasks and log messages:
//!
//! ```json
//! {
//!   "tasks": [{
//!     "id": "login",
//!     "state": "success",
//!     "url": "https://example.com/login",
//!     "method": "POST",
//!     "original_request": { "headers": [{ "name": "Accept", "value": "*/*" }] },
//!     "response": { "status_code": 200, "headers": [] },
//!     "request_body": { "text": "user=ana" },
//!     "response_body": { "base64": "eyJvayI6dHJ1ZX0=" }
//!   }],
//!   "messages": [{ "level": "info", "text": "Signed in", "task_id": "login" }]
//! }
//! ```
//!
//! Bodies become in-memory blobs keyed by the SHA-256 of their bytes, so tasks
//! with identical bodies share one entry in the renderer's cache.

use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use blotter_core::{
    Blob, CodingKey, DecodingError, DecodingErrorKind, Entity, FetchType, Header, LogLevel,
    LogMessage, Request, RequestOptions, Response, Task, TaskError, TaskState, TaskType,
    Transaction,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArchiveFile {
    tasks: Vec<TaskRecord>,
    messages: Vec<MessageRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TaskRecord {
    id: Option<String>,
    task_type: TaskType,
    state: TaskState,
    created_at: Option<DateTime<Utc>>,
    /// Seconds.
    duration: Option<f64>,
    url: Option<String>,
    method: Option<String>,
    original_request: Option<RequestRecord>,
    current_request: Option<RequestRecord>,
    response: Option<ResponseRecord>,
    error: Option<TaskError>,
    request_body: Option<BodyRecord>,
    response_body: Option<BodyRecord>,
    request_body_size: Option<u64>,
    response_body_size: Option<u64>,
    decoding_error: Option<DecodingErrorRecord>,
    transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RequestRecord {
    url: Option<String>,
    method: Option<String>,
    headers: Vec<Header>,
    options: Option<RequestOptions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseRecord {
    status_code: Option<u16>,
    headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum BodyRecord {
    Text(String),
    Base64(String),
}

#[derive(Debug, Deserialize)]
struct DecodingErrorRecord {
    kind: DecodingErrorKind,
    #[serde(default)]
    coding_path: Vec<PathComponent>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PathComponent {
    Index(usize),
    Key(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TransactionRecord {
    request: RequestRecord,
    response: Option<ResponseRecord>,
    fetch_type: FetchType,
    duration: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MessageRecord {
    created_at: Option<DateTime<Utc>>,
    level: LogLevel,
    label: Option<String>,
    text: String,
    task_id: Option<String>,
}

/// A task together with its archive id.
#[derive(Debug, Clone)]
pub struct ArchivedTask {
    /// Id from the archive, if it had one.
    pub id: Option<String>,
    /// The task.
    pub task: Arc<Task>,
}

/// Records loaded from an archive, in file order.
#[derive(Debug, Default)]
pub struct Archive {
    /// Captured tasks.
    pub tasks: Vec<ArchivedTask>,
    /// Captured messages. A message shares its task with the task list.
    pub messages: Vec<Arc<LogMessage>>,
}

impl Archive {
    /// Load an archive from a file, or from standard input when `path` is `-`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = if path.as_os_str() == "-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read archive from stdin")?;
            buffer
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read archive {}", path.display()))?
        };
        Self::parse(&content).with_context(|| format!("Invalid archive {}", path.display()))
    }

    /// Parse archive JSON.
    pub fn parse(json: &str) -> Result<Self> {
        let file: ArchiveFile = serde_json::from_str(json)?;

        let tasks: Vec<ArchivedTask> = file
            .tasks
            .into_iter()
            .map(|record| -> Result<ArchivedTask> {
                let id = record.id.clone();
                let task = record.into_task()?;
                Ok(ArchivedTask {
                    id,
                    task: Arc::new(task),
                })
            })
            .collect::<Result<_>>()?;

        let by_id: HashMap<&str, Arc<Task>> = tasks
            .iter()
            .filter_map(|archived| {
                let id = archived.id.as_deref()?;
                Some((id, Arc::clone(&archived.task)))
            })
            .collect();

        let messages = file
            .messages
            .into_iter()
            .enumerate()
            .map(|(index, record)| -> Result<Arc<LogMessage>> {
                let task = match &record.task_id {
                    Some(id) => Some(by_id.get(id.as_str()).cloned().ok_or_else(|| {
                        anyhow!("message {} references unknown task '{id}'", index + 1)
                    })?),
                    None => None,
                };
                Ok(Arc::new(LogMessage {
                    created_at: record.created_at.unwrap_or_default(),
                    level: record.level,
                    label: record.label,
                    text: record.text,
                    task,
                }))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(tasks = tasks.len(), messages = messages.len(), "parsed archive");
        Ok(Self { tasks, messages })
    }

    /// Entities to render for `selection`.
    ///
    /// [`Selection::Messages`] falls back to the tasks when the archive has no
    /// messages. [`Selection::Transactions`] lists every task's transactions in
    /// task order.
    pub fn entities(&self, selection: Selection) -> Vec<Entity> {
        match selection {
            Selection::Messages if !self.messages.is_empty() => {
                self.messages.iter().map(|m| Entity::Message(Arc::clone(m))).collect()
            },
            Selection::Messages | Selection::Tasks => self
                .tasks
                .iter()
                .map(|archived| Entity::Task(Arc::clone(&archived.task)))
                .collect(),
            Selection::Transactions => self
                .tasks
                .iter()
                .flat_map(|archived| archived.task.transactions.iter().cloned())
                .map(Entity::from)
                .collect(),
        }
    }
}

/// Which records of an archive get rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Log messages, or the tasks when there are none.
    Messages,
    /// Network tasks.
    Tasks,
    /// Network transactions of every task.
    Transactions,
}

impl TaskRecord {
    fn into_task(self) -> Result<Task> {
        let request_body = self.request_body.map(BodyRecord::into_bytes).transpose()?;
        let response_body = self.response_body.map(BodyRecord::into_bytes).transpose()?;

        Ok(Task {
            task_type: self.task_type,
            state: self.state,
            created_at: self.created_at.unwrap_or_default(),
            duration: self.duration.and_then(seconds),
            url: self.url,
            method: self.method,
            original_request: self.original_request.map(RequestRecord::into_request),
            current_request: self.current_request.map(RequestRecord::into_request),
            response: self.response.map(ResponseRecord::into_response),
            error: self.error,
            request_body_size: self
                .request_body_size
                .or_else(|| request_body.as_ref().map(|b| b.len() as u64))
                .unwrap_or(0),
            response_body_size: self
                .response_body_size
                .or_else(|| response_body.as_ref().map(|b| b.len() as u64))
                .unwrap_or(0),
            request_body: request_body.map(blob),
            response_body: response_body.map(blob),
            decoding_error: self.decoding_error.map(DecodingErrorRecord::into_error),
            transactions: self
                .transactions
                .into_iter()
                .map(TransactionRecord::into_transaction)
                .collect(),
        })
    }
}

impl RequestRecord {
    fn into_request(self) -> Request {
        Request {
            url: self.url,
            method: self.method,
            headers: self.headers,
            options: self.options,
        }
    }
}

impl ResponseRecord {
    fn into_response(self) -> Response {
        Response {
            status_code: self.status_code,
            headers: self.headers,
        }
    }
}

impl BodyRecord {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Text(text) => Ok(text.into_bytes()),
            Self::Base64(encoded) => STANDARD
                .decode(encoded.trim())
                .context("Body is not valid base64"),
        }
    }
}

impl DecodingErrorRecord {
    fn into_error(self) -> DecodingError {
        DecodingError {
            kind: self.kind,
            coding_path: self
                .coding_path
                .into_iter()
                .map(|component| match component {
                    PathComponent::Index(index) => CodingKey::Index(index),
                    PathComponent::Key(key) => CodingKey::Key(key),
                })
                .collect(),
            description: self.description,
        }
    }
}

impl TransactionRecord {
    fn into_transaction(self) -> Transaction {
        Transaction {
            request: self.request.into_request(),
            response: self.response.map(ResponseRecord::into_response),
            fetch_type: self.fetch_type,
            duration: self.duration.and_then(seconds),
        }
    }
}

/// In-memory blob identified by the SHA-256 of its bytes.
fn blob(bytes: Vec<u8>) -> Blob {
    let id = format!("{:x}", Sha256::digest(&bytes));
    Blob::inline(id, bytes)
}

fn seconds(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ARCHIVE: &str = r#"{
        "tasks": [
            {
                "id": "a",
                "state": "success",
                "url": "https://example.com/a",
                "duration": 0.25,
                "response": { "status_code": 200, "headers": [{ "name": "Content-Type", "value": "application/json" }] },
                "response_body": { "text": "{\"ok\":true}" },
                "transactions": [
                    { "request": { "url": "https://example.com/a" }, "fetch_type": "localCache" },
                    { "request": { "url": "https://example.com/a" }, "response": { "status_code": 200 }, "duration": 0.1 }
                ]
            },
            {
                "id": "b",
                "url": "https://example.com/b",
                "response_body": { "base64": "eyJvayI6dHJ1ZX0=" },
                "decoding_error": { "kind": "typeMismatch", "coding_path": ["items", 0], "description": "Expected Int" }
            }
        ],
        "messages": [
            { "level": "warning", "text": "slow", "task_id": "a" },
            { "text": "standalone" }
        ]
    }"#;

    #[test]
    fn test_parse_links_messages_to_tasks() {
        let archive = Archive::parse(ARCHIVE).unwrap();

        assert_eq!(archive.tasks.len(), 2);
        assert_eq!(archive.messages.len(), 2);
        let linked = archive.messages[0].task.as_ref().unwrap();
        assert!(Arc::ptr_eq(linked, &archive.tasks[0].task));
        assert_eq!(archive.messages[0].level, LogLevel::Warning);
        assert!(archive.messages[1].task.is_none());
        assert_eq!(archive.messages[1].level, LogLevel::Info);
    }

    #[test]
    fn test_identical_bodies_share_blob_id() {
        let archive = Archive::parse(ARCHIVE).unwrap();

        let a = archive.tasks[0].task.response_body.as_ref().unwrap();
        let b = archive.tasks[1].task.response_body.as_ref().unwrap();
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id().as_str().len(), 64);
        assert_eq!(b.load().unwrap(), br#"{"ok":true}"#);
        assert_eq!(archive.tasks[1].task.response_body_size, 11);
    }

    #[test]
    fn test_task_fields_are_converted() {
        let archive = Archive::parse(ARCHIVE).unwrap();
        let task = &archive.tasks[0].task;

        assert_eq!(task.state, TaskState::Success);
        assert_eq!(task.duration, Some(Duration::from_millis(250)));
        assert_eq!(task.status_code(), Some(200));

        let error = archive.tasks[1].task.decoding_error.as_ref().unwrap();
        assert_eq!(
            error.coding_path,
            vec![CodingKey::Key("items".to_string()), CodingKey::Index(0)]
        );
    }

    #[test]
    fn test_unknown_task_reference_is_an_error() {
        let err = Archive::parse(r#"{"messages":[{"text":"x","task_id":"missing"}]}"#).unwrap_err();
        assert!(err.to_string().contains("unknown task 'missing'"));
    }

    #[test]
    fn test_invalid_base64_is_an_error() {
        let result = Archive::parse(r#"{"tasks":[{"response_body":{"base64":"!!"}}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_entities_prefer_messages() {
        let archive = Archive::parse(ARCHIVE).unwrap();

        assert!(matches!(archive.entities(Selection::Messages)[0], Entity::Message(_)));
        assert!(matches!(archive.entities(Selection::Tasks)[0], Entity::Task(_)));
        let tasks_only = Archive::parse(r#"{"tasks":[{}]}"#).unwrap();
        assert!(matches!(tasks_only.entities(Selection::Messages)[0], Entity::Task(_)));
    }

    #[test]
    fn test_transactions_in_task_order() {
        let archive = Archive::parse(ARCHIVE).unwrap();

        let entities = archive.entities(Selection::Transactions);

        assert_eq!(entities.len(), 2);
        let fetch_types: Vec<FetchType> = entities
            .iter()
            .map(|entity| match entity {
                Entity::Transaction(transaction) => transaction.fetch_type,
                _ => FetchType::Unknown,
            })
            .collect();
        assert_eq!(fetch_types, vec![FetchType::LocalCache, FetchType::NetworkLoad]);
        let Entity::Transaction(last) = &entities[1] else {
            unreachable!("transactions only");
        };
        assert_eq!(last.duration, Some(Duration::from_millis(100)));
        assert_eq!(last.response.as_ref().and_then(|r| r.status_code), Some(200));
    }

    #[test]
    fn test_empty_archive() {
        let archive = Archive::parse("{}").unwrap();
        assert!(archive.entities(Selection::Messages).is_empty());
        assert!(archive.entities(Selection::Transactions).is_empty());
    }
}
