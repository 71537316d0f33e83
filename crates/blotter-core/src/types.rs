//! Records consumed from the capturing layer.
//!
//! These are plain data: the renderer reads them and never mutates them. Body
//! bytes are not stored inline; a [`Blob`] carries an identity and a loader
//! that is only invoked when the body is actually formatted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Opaque identity of a stored payload.
///
/// Two blobs with the same id are assumed to hold the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobId(Arc<str>);

impl BlobId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BlobId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Lazily fetches the bytes of a blob.
///
/// Returning `None` means the bytes are not available (evicted, unreadable);
/// renderers fall back to a size summary or the placeholder.
pub trait BlobLoader: Send + Sync {
    /// Fetch the payload. May perform I/O.
    fn load(&self) -> Option<Vec<u8>>;
}

impl<F> BlobLoader for F
where
    F: Fn() -> Option<Vec<u8>> + Send + Sync,
{
    fn load(&self) -> Option<Vec<u8>> {
        self()
    }
}

/// A stored payload: identity plus a lazy loader.
#[derive(Clone)]
pub struct Blob {
    id: BlobId,
    loader: Arc<dyn BlobLoader>,
}

impl Blob {
    /// Blob backed by an arbitrary loader.
    pub fn new(id: impl Into<BlobId>, loader: impl BlobLoader + 'static) -> Self {
        Self {
            id: id.into(),
            loader: Arc::new(loader),
        }
    }

    /// Blob whose bytes are already in memory.
    pub fn inline(id: impl Into<BlobId>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self::new(id, move || Some(bytes.to_vec()))
    }

    /// Identity of the payload.
    #[must_use]
    pub const fn id(&self) -> &BlobId {
        &self.id
    }

    /// Invoke the loader.
    #[must_use]
    pub fn load(&self) -> Option<Vec<u8>> {
        self.loader.load()
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob").field("id", &self.id).finish_non_exhaustive()
    }
}

/// A parsed `Content-Type` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    raw: String,
    essence: String,
}

impl ContentType {
    /// Parse a header value such as `application/json; charset=utf-8`.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        let essence = raw
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        Self {
            raw: raw.to_string(),
            essence,
        }
    }

    /// The header value as received.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lowercase `type/subtype` without parameters.
    #[must_use]
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// `application/json` or any `+json` suffix type.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.essence == "application/json" || self.essence.ends_with("+json")
    }

    /// `text/html`.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.essence == "text/html" || self.essence == "application/xhtml+xml"
    }

    /// `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn is_encoded_form(&self) -> bool {
        self.essence == "application/x-www-form-urlencoded"
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One HTTP header field. Order and duplicates are preserved by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: String,
}

impl Header {
    /// Create a header field.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn content_type_of(headers: &[Header]) -> Option<ContentType> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("content-type"))
        .map(|h| ContentType::new(&h.value))
}

/// Per-request loading options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Cache policy name, e.g. `useProtocolCachePolicy`.
    pub cache_policy: String,
    /// Timeout in seconds.
    pub timeout_interval: f64,
    #[allow(missing_docs)]
    pub allows_cellular_access: bool,
    #[allow(missing_docs)]
    pub allows_expensive_network_access: bool,
    #[allow(missing_docs)]
    pub allows_constrained_network_access: bool,
    #[allow(missing_docs)]
    pub http_should_handle_cookies: bool,
    #[allow(missing_docs)]
    pub http_should_use_pipelining: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            cache_policy: "useProtocolCachePolicy".to_string(),
            timeout_interval: 60.0,
            allows_cellular_access: true,
            allows_expensive_network_access: true,
            allows_constrained_network_access: true,
            http_should_handle_cookies: true,
            http_should_use_pipelining: false,
        }
    }
}

/// A request as sent (original) or as rewritten by the client (current).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    /// Absolute URL.
    pub url: Option<String>,
    /// HTTP method; `GET` when absent.
    pub method: Option<String>,
    /// Header fields in wire order.
    pub headers: Vec<Header>,
    /// Loading options, when captured.
    pub options: Option<RequestOptions>,
}

impl Request {
    /// Declared body content type.
    #[must_use]
    pub fn content_type(&self) -> Option<ContentType> {
        content_type_of(&self.headers)
    }
}

/// A received response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code, when the response was HTTP.
    pub status_code: Option<u16>,
    /// Header fields in wire order.
    pub headers: Vec<Header>,
}

impl Response {
    /// Declared body content type.
    #[must_use]
    pub fn content_type(&self) -> Option<ContentType> {
        content_type_of(&self.headers)
    }
}

/// Transport-level failure of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskError {
    /// Error domain, e.g. `NSURLErrorDomain`.
    pub domain: String,
    /// Domain-specific code.
    pub code: i64,
    /// Human-readable description.
    pub description: String,
}

/// Kind of session task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskType {
    /// In-memory data task.
    #[default]
    Data,
    /// Body streamed to a file.
    Download,
    /// Body streamed from a file.
    Upload,
    /// Raw stream.
    Stream,
    /// WebSocket connection.
    WebSocket,
}

impl TaskType {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Data => "Data Task",
            Self::Download => "Download Task",
            Self::Upload => "Upload Task",
            Self::Stream => "Stream Task",
            Self::WebSocket => "WebSocket Task",
        }
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Still in flight.
    #[default]
    Pending,
    /// Completed without error.
    Success,
    /// Completed with a transport error or a failing status code.
    Failure,
}

/// Which key of a decoded document a [`DecodingError`] points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodingKey {
    /// Object member.
    Key(String),
    /// Array element.
    Index(usize),
}

/// Category of a decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecodingErrorKind {
    /// A value had an unexpected type.
    TypeMismatch,
    /// A required value was `null`.
    ValueNotFound,
    /// A required key was missing from the object at the coding path.
    KeyNotFound,
    /// The payload was not decodable at all.
    DataCorrupted,
}

/// The capturing layer's failure to decode a response body into its model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingError {
    /// Failure category.
    pub kind: DecodingErrorKind,
    /// Path from the document root to the offending node.
    pub coding_path: Vec<CodingKey>,
    /// Human-readable description.
    pub description: String,
}

/// How a transaction obtained its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FetchType {
    /// Loaded over the network.
    #[default]
    NetworkLoad,
    /// Served from the local cache.
    LocalCache,
    /// Pushed by the server.
    ServerPush,
    /// Not reported.
    Unknown,
}

impl FetchType {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NetworkLoad => "Network Load",
            Self::LocalCache => "Cache Lookup",
            Self::ServerPush => "Server Push",
            Self::Unknown => "Unknown",
        }
    }
}

/// One request/response exchange within a task (redirects, cache lookups).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    /// Request of this exchange.
    pub request: Request,
    /// Response, if one arrived.
    pub response: Option<Response>,
    /// Where the response came from.
    pub fetch_type: FetchType,
    /// Time from request start to response end.
    pub duration: Option<Duration>,
}

/// A captured network task.
#[derive(Debug, Clone, Default)]
pub struct Task {
    /// Kind of task.
    pub task_type: TaskType,
    /// Lifecycle state.
    pub state: TaskState,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Total duration, once complete.
    pub duration: Option<Duration>,
    /// URL of the original request.
    pub url: Option<String>,
    /// HTTP method of the original request.
    pub method: Option<String>,
    /// Request as created by the caller.
    pub original_request: Option<Request>,
    /// Request as sent, after client rewrites.
    pub current_request: Option<Request>,
    /// Final response.
    pub response: Option<Response>,
    /// Transport error.
    pub error: Option<TaskError>,
    /// Request body payload.
    pub request_body: Option<Blob>,
    /// Response body payload.
    pub response_body: Option<Blob>,
    /// Declared request body size in bytes.
    pub request_body_size: u64,
    /// Declared response body size in bytes.
    pub response_body_size: u64,
    /// Failure of the capturing layer to decode the response body.
    pub decoding_error: Option<DecodingError>,
    /// Exchanges in chronological order.
    pub transactions: Vec<Transaction>,
}

impl Task {
    /// Host component of the URL.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        let url = url::Url::parse(self.url.as_deref()?).ok()?;
        url.host_str().map(str::to_string)
    }

    /// HTTP method, defaulting to `GET`.
    #[must_use]
    pub fn http_method(&self) -> &str {
        self.method.as_deref().unwrap_or("GET")
    }

    /// Status code of the final response.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().and_then(|r| r.status_code)
    }

    /// Transport error code, when the task failed below HTTP.
    #[must_use]
    pub fn error_code(&self) -> Option<i64> {
        self.error.as_ref().map(|e| e.code).filter(|code| *code != 0)
    }

    /// Content type of the request body.
    #[must_use]
    pub fn request_content_type(&self) -> Option<ContentType> {
        self.original_request.as_ref().and_then(Request::content_type)
    }

    /// Content type of the response body.
    #[must_use]
    pub fn response_content_type(&self) -> Option<ContentType> {
        self.response.as_ref().and_then(Response::content_type)
    }
}

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[allow(missing_docs)]
    Trace,
    #[allow(missing_docs)]
    Debug,
    #[allow(missing_docs)]
    #[default]
    Info,
    #[allow(missing_docs)]
    Notice,
    #[allow(missing_docs)]
    Warning,
    #[allow(missing_docs)]
    Error,
    #[allow(missing_docs)]
    Critical,
}

impl LogLevel {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trace => "Trace",
            Self::Debug => "Debug",
            Self::Info => "Info",
            Self::Notice => "Notice",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Critical => "Critical",
        }
    }
}

/// A captured log message.
#[derive(Debug, Clone, Default)]
pub struct LogMessage {
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Subsystem label.
    pub label: Option<String>,
    /// Message text.
    pub text: String,
    /// Task the message was logged for. Many messages may share one task.
    pub task: Option<Arc<Task>>,
}

/// Anything the renderer can turn into a document.
#[derive(Debug, Clone)]
pub enum Entity {
    #[allow(missing_docs)]
    Task(Arc<Task>),
    #[allow(missing_docs)]
    Message(Arc<LogMessage>),
    #[allow(missing_docs)]
    Transaction(Arc<Transaction>),
}

impl Entity {
    /// The task behind the entity: the task itself or a message's task.
    #[must_use]
    pub fn task(&self) -> Option<&Task> {
        match self {
            Self::Task(task) => Some(task),
            Self::Message(message) => message.task.as_deref(),
            Self::Transaction(_) => None,
        }
    }
}

impl From<Task> for Entity {
    fn from(task: Task) -> Self {
        Self::Task(Arc::new(task))
    }
}

impl From<LogMessage> for Entity {
    fn from(message: LogMessage) -> Self {
        Self::Message(Arc::new(message))
    }
}

impl From<Transaction> for Entity {
    fn from(transaction: Transaction) -> Self {
        Self::Transaction(Arc::new(transaction))
    }
}
