//! Status titles and one-line summaries for tasks, transactions and messages.

use crate::style::Color;
use crate::types::{LogMessage, Task, TaskState, Transaction};
use crate::utils::{format_duration, format_time};

/// Summary line separator.
const SEPARATOR: &str = " · ";

/// Standard reason phrase for an HTTP status code.
pub const fn reason_phrase(code: u16) -> Option<&'static str> {
    Some(match code {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => return None,
    })
}

/// `"200 OK"`, or just the number for codes without a standard phrase.
pub fn status_code_text(code: u16) -> String {
    reason_phrase(code).map_or_else(|| code.to_string(), |phrase| format!("{code} {phrase}"))
}

/// Description of a URL loading error code.
pub const fn url_error_description(code: i64) -> Option<&'static str> {
    Some(match code {
        -1 => "Unknown",
        -999 => "Cancelled",
        -1000 => "Bad URL",
        -1001 => "Timed Out",
        -1002 => "Unsupported URL",
        -1003 => "Cannot Find Host",
        -1004 => "Cannot Connect To Host",
        -1005 => "Network Connection Lost",
        -1006 => "DNS Lookup Failed",
        -1007 => "Too Many Redirects",
        -1008 => "Resource Unavailable",
        -1009 => "Not Connected To Internet",
        -1011 => "Bad Server Response",
        -1200 => "Secure Connection Failed",
        _ => return None,
    })
}

/// Outcome of a request as shown in headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// `"200 OK"`, `"-1001 (Timed Out)"`, `"Pending"`, `"Success"`.
    pub title: String,
    /// Tint of the title.
    pub tint: Color,
    /// Whether the request counts as successful.
    pub is_success: bool,
}

impl Status {
    /// Status of a task.
    pub fn for_task(task: &Task) -> Self {
        if task.state == TaskState::Pending {
            return Self {
                title: "Pending".to_string(),
                tint: Color::Orange,
                is_success: false,
            };
        }
        let error_code = task.error_code();
        let status_code = task.status_code().filter(|code| *code != 0);
        let is_success = task.state != TaskState::Failure
            && error_code.is_none()
            && status_code.is_none_or(|code| (200..400).contains(&code));

        let title = if let Some(code) = status_code {
            status_code_text(code)
        } else if let Some(code) = error_code {
            let description = url_error_description(code)
                .map(str::to_string)
                .or_else(|| task.error.as_ref().map(|e| e.description.clone()))
                .unwrap_or_default();
            format!("{code} ({description})")
        } else {
            "Success".to_string()
        };

        Self {
            title,
            tint: if is_success { Color::Green } else { Color::Red },
            is_success,
        }
    }

    /// Status of a single transaction.
    pub fn for_transaction(transaction: &Transaction) -> Self {
        let status_code = transaction
            .response
            .as_ref()
            .and_then(|r| r.status_code)
            .filter(|code| *code != 0);
        let is_success = status_code.is_none_or(|code| (200..400).contains(&code));
        Self {
            title: status_code.map_or_else(|| "Success".to_string(), status_code_text),
            tint: if is_success { Color::Green } else { Color::Red },
            is_success,
        }
    }
}

/// `"HH:mm:ss.SSS · METHOD · status[ · duration]"`.
pub fn task_subheadline(task: &Task) -> String {
    let mut parts = vec![
        format_time(&task.created_at),
        task.http_method().to_string(),
        Status::for_task(task).title,
    ];
    if let Some(duration) = task.duration.filter(|d| !d.is_zero()) {
        parts.push(format_duration(duration));
    }
    parts.join(SEPARATOR)
}

/// `"HH:mm:ss.SSS · LEVEL[ · label]"`.
pub fn message_subheadline(message: &LogMessage) -> String {
    let mut parts = vec![
        format_time(&message.created_at),
        message.level.name().to_uppercase(),
    ];
    if let Some(label) = message.label.as_deref().filter(|l| !l.is_empty()) {
        parts.push(label.to_string());
    }
    parts.join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LogLevel, Response, TaskError};
    use std::time::Duration;

    fn completed(status: Option<u16>, error: Option<i64>) -> Task {
        Task {
            state: if error.is_some() || status.is_some_and(|s| s >= 400) {
                TaskState::Failure
            } else {
                TaskState::Success
            },
            response: status.map(|code| Response {
                status_code: Some(code),
                headers: Vec::new(),
            }),
            error: error.map(|code| TaskError {
                domain: "NSURLErrorDomain".to_string(),
                code,
                description: "The request failed".to_string(),
            }),
            ..Task::default()
        }
    }

    #[test]
    fn test_status_code_title() {
        let status = Status::for_task(&completed(Some(200), None));
        assert_eq!(status.title, "200 OK");
        assert_eq!(status.tint, Color::Green);
        assert!(status.is_success);
    }

    #[test]
    fn test_client_error_is_failure() {
        let status = Status::for_task(&completed(Some(404), None));
        assert_eq!(status.title, "404 Not Found");
        assert_eq!(status.tint, Color::Red);
    }

    #[test]
    fn test_error_code_title() {
        let status = Status::for_task(&completed(None, Some(-1001)));
        assert_eq!(status.title, "-1001 (Timed Out)");
        assert!(!status.is_success);

        let unknown = Status::for_task(&completed(None, Some(42)));
        assert_eq!(unknown.title, "42 (The request failed)");
    }

    #[test]
    fn test_success_without_status() {
        assert_eq!(Status::for_task(&completed(None, None)).title, "Success");
    }

    #[test]
    fn test_pending_status() {
        let status = Status::for_task(&Task::default());
        assert_eq!(status.title, "Pending");
        assert_eq!(status.tint, Color::Orange);
    }

    #[test]
    fn test_unknown_status_code_has_no_phrase() {
        assert_eq!(status_code_text(299), "299");
    }

    #[test]
    fn test_task_subheadline() {
        let mut task = completed(Some(201), None);
        task.method = Some("POST".to_string());
        task.duration = Some(Duration::from_millis(85));

        let line = task_subheadline(&task);

        assert_eq!(line, "00:00:00.000 · POST · 201 Created · 85 ms");
    }

    #[test]
    fn test_message_subheadline() {
        let message = LogMessage {
            level: LogLevel::Warning,
            label: Some("auth".to_string()),
            ..LogMessage::default()
        };
        assert_eq!(message_subheadline(&message), "00:00:00.000 · WARNING · auth");
    }
}
