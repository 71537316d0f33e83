//! cURL command lines for captured tasks.

use crate::types::{Blob, Task};

/// Quote a value for a POSIX shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// A `curl` invocation that replays the task's request.
///
/// Headers come from the request as sent when it was captured, otherwise from
/// the original request. The body is included only when it is valid UTF-8.
///
/// ```rust
/// use blotter_core::curl::curl_description;
/// use blotter_core::types::{Header, Request, Task};
///
/// let task = Task {
///     url: Some("https://example.com/api".to_string()),
///     method: Some("DELETE".to_string()),
///     original_request: Some(Request {
///         headers: vec![Header::new("Accept", "*/*")],
///         ..Request::default()
///     }),
///     ..Task::default()
/// };
/// assert_eq!(
///     curl_description(&task),
///     "curl -v 'https://example.com/api' -X DELETE -H 'Accept: */*'"
/// );
/// ```
#[must_use]
pub fn curl_description(task: &Task) -> String {
    let mut parts = vec!["curl -v".to_string()];
    if let Some(url) = &task.url {
        parts.push(shell_quote(url));
    }
    parts.push(format!("-X {}", task.http_method()));

    let request = task.current_request.as_ref().or(task.original_request.as_ref());
    if let Some(request) = request {
        for header in &request.headers {
            parts.push(format!("-H {}", shell_quote(&format!("{}: {}", header.name, header.value))));
        }
    }

    let body = task
        .request_body
        .as_ref()
        .and_then(Blob::load)
        .filter(|bytes| !bytes.is_empty())
        .and_then(|bytes| String::from_utf8(bytes).ok());
    if let Some(body) = body {
        parts.push(format!("-d {}", shell_quote(&body)));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Blob, Header, Request};

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_post_with_body_uses_current_headers() {
        let task = Task {
            url: Some("https://example.com/login".to_string()),
            method: Some("POST".to_string()),
            original_request: Some(Request {
                headers: vec![Header::new("Accept", "*/*")],
                ..Request::default()
            }),
            current_request: Some(Request {
                headers: vec![
                    Header::new("Accept", "*/*"),
                    Header::new("Content-Type", "application/json"),
                ],
                ..Request::default()
            }),
            request_body: Some(Blob::inline("body", br#"{"user":"o'neil"}"#.to_vec())),
            request_body_size: 17,
            ..Task::default()
        };

        let command = curl_description(&task);

        assert_eq!(
            command,
            r#"curl -v 'https://example.com/login' -X POST -H 'Accept: */*' -H 'Content-Type: application/json' -d '{"user":"o'\''neil"}'"#
        );
    }

    #[test]
    fn test_binary_body_is_omitted() {
        let task = Task {
            url: Some("https://example.com/upload".to_string()),
            request_body: Some(Blob::inline("bin", vec![0xff, 0xfe, 0x00])),
            ..Task::default()
        };

        let command = curl_description(&task);

        assert_eq!(command, "curl -v 'https://example.com/upload' -X GET");
    }
}
