//! Key-value sections: titled, colored lists of `(key, value)` pairs.
//!
//! Each builder reads one kind of source and returns `None` when that source
//! has nothing to show, which tells the renderer to omit the section. Items
//! keep source order and duplicate keys are kept as separate items. A missing
//! value is `None` and renders as the `–` placeholder.

use crate::status::{Status, status_code_text};
use crate::style::Color;
use crate::types::{Header, Request, Task, Transaction};
use crate::utils::{format_byte_count, format_duration};
use url::Url;

/// A titled list of key-value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueSection {
    /// Section title.
    pub title: String,
    /// Accent color for keys.
    pub color: Color,
    /// Items in source order.
    pub items: Vec<(String, Option<String>)>,
}

impl KeyValueSection {
    /// Create a section.
    pub fn new(title: impl Into<String>, color: Color, items: Vec<(String, Option<String>)>) -> Self {
        Self {
            title: title.into(),
            color,
            items,
        }
    }

    /// Header fields. Always present; an empty list renders as a placeholder.
    pub fn headers(title: &str, headers: &[Header]) -> Self {
        let items = headers
            .iter()
            .map(|h| (h.name.clone(), Some(h.value.clone())))
            .collect();
        Self::new(title, Color::Red, items)
    }

    /// Components of a URL, skipping the ones it does not have.
    pub fn url_components(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let items = [
            ("Scheme", non_empty(url.scheme())),
            ("Port", url.port().map(|p| p.to_string())),
            ("User", non_empty(url.username())),
            ("Password", url.password().map(str::to_string)),
            ("Host", url.host_str().map(str::to_string)),
            ("Path", non_empty(url.path())),
            ("Query", url.query().map(str::to_string)),
            ("Fragment", url.fragment().map(str::to_string)),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), Some(v))))
        .collect();
        Some(Self::new("URL Components", Color::Blue, items))
    }

    /// Query items of a URL; `None` when it has no query.
    ///
    /// Only percent-escapes are decoded: `+` in a URL query is a literal plus.
    pub fn query_items(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        Self::query_items_from(url.query()?)
    }

    /// Query items of a raw URL query string.
    ///
    /// Pairs without `=` have no value.
    pub fn query_items_from(query: &str) -> Option<Self> {
        let items = split_pairs(query, false)?;
        Some(Self::new("Query Items", Color::Purple, items))
    }

    /// Parameters of an `application/x-www-form-urlencoded` body, where `+`
    /// stands for a space.
    pub fn form_parameters(body: &str) -> Option<Self> {
        let items = split_pairs(body.trim(), true)?;
        Some(Self::new("Form Parameters", Color::Purple, items))
    }

    /// Loading options of a request; `None` when not captured.
    pub fn request_options(request: &Request) -> Option<Self> {
        let options = request.options.as_ref()?;
        let timeout = format!("{} s", options.timeout_interval);
        let items = vec![
            item("Cache Policy", options.cache_policy.clone()),
            item("Timeout Interval", timeout),
            item("Allows Cellular Access", options.allows_cellular_access.to_string()),
            item(
                "Allows Expensive Network Access",
                options.allows_expensive_network_access.to_string(),
            ),
            item(
                "Allows Constrained Network Access",
                options.allows_constrained_network_access.to_string(),
            ),
            item(
                "HTTP Should Handle Cookies",
                options.http_should_handle_cookies.to_string(),
            ),
            item(
                "HTTP Should Use Pipelining",
                options.http_should_use_pipelining.to_string(),
            ),
        ];
        Some(Self::new("Request Options", Color::Indigo, items))
    }

    /// Summary of a task.
    pub fn task_details(task: &Task) -> Self {
        let items = vec![
            item("Task Type", task.task_type.name()),
            item("Method", task.http_method()),
            ("Host".to_string(), task.host()),
            (
                "Status Code".to_string(),
                task.status_code().map(status_code_text),
            ),
            item("Status", Status::for_task(task).title),
            (
                "Duration".to_string(),
                task.duration.map(format_duration),
            ),
            item("Request Body Size", format_byte_count(task.request_body_size)),
            item("Response Body Size", format_byte_count(task.response_body_size)),
        ];
        Self::new("Summary", Color::Blue, items)
    }

    /// Transport error of a task; `None` when it did not fail.
    pub fn error_details(task: &Task) -> Option<Self> {
        let error = task.error.as_ref()?;
        let items = vec![
            item("Domain", error.domain.clone()),
            item("Code", error.code.to_string()),
            item("Description", error.description.clone()),
        ];
        Some(Self::new("Error", Color::Red, items))
    }

    /// Timing and origin of a transaction.
    pub fn transaction_details(transaction: &Transaction) -> Self {
        let items = vec![
            item("Fetch Type", transaction.fetch_type.name()),
            (
                "Duration".to_string(),
                transaction.duration.map(format_duration),
            ),
        ];
        Self::new("Details", Color::Gray, items)
    }
}

fn item(key: &str, value: impl Into<String>) -> (String, Option<String>) {
    (key.to_string(), Some(value.into()))
}

fn split_pairs(query: &str, plus_as_space: bool) -> Option<Vec<(String, Option<String>)>> {
    let decode = |raw: &str| decode_component(raw, plus_as_space);
    let items: Vec<_> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode(key), Some(decode(value))),
            None => (decode(pair), None),
        })
        .collect();
    (!items.is_empty()).then_some(items)
}

fn decode_component(raw: &str, plus_as_space: bool) -> String {
    let escaped;
    let raw = if plus_as_space {
        raw
    } else {
        escaped = raw.replace('+', "%2B");
        escaped.as_str()
    };
    url::form_urlencoded::parse(format!("v={raw}").as_bytes())
        .next()
        .map_or_else(|| raw.to_string(), |(_, value)| value.into_owned())
}
