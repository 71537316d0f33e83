//! End-to-end rendering scenarios through the public API.

#![allow(clippy::unwrap_used)]

use blotter_core::content::ContentFlag;
use blotter_core::renderer::spacer;
use blotter_core::{
    Blob, ContentSelector, Entity, Header, LogLevel, LogMessage, Request, Response, StyledDocument,
    Task, TaskState, TextRenderer, export,
};
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn json_headers() -> Vec<Header> {
    vec![Header::new("Content-Type", "application/json")]
}

fn task(url: &str) -> Task {
    Task {
        state: TaskState::Success,
        url: Some(url.to_string()),
        method: Some("GET".to_string()),
        original_request: Some(Request {
            url: Some(url.to_string()),
            ..Request::default()
        }),
        response: Some(Response {
            status_code: Some(200),
            headers: json_headers(),
        }),
        ..Task::default()
    }
}

fn counted_blob(id: &str, body: Vec<u8>, fetches: &Arc<AtomicUsize>) -> Blob {
    let fetches = Arc::clone(fetches);
    Blob::new(id, move || {
        fetches.fetch_add(1, Ordering::SeqCst);
        Some(body.clone())
    })
}

/// 50 entities (tasks and messages) sharing 3 distinct response bodies.
fn batch(fetches: &Arc<AtomicUsize>) -> Vec<Entity> {
    let tasks: Vec<Arc<Task>> = (0..3)
        .map(|i| {
            let body = format!(r#"{{"id":{i},"items":[1,2,3]}}"#).into_bytes();
            let size = body.len() as u64;
            Arc::new(Task {
                response_body: Some(counted_blob(&format!("blob-{i}"), body, fetches)),
                response_body_size: size,
                ..task(&format!("https://api.example.com/items/{i}"))
            })
        })
        .collect();

    (0..50)
        .map(|i| {
            let task = Arc::clone(&tasks[i % 3]);
            if i % 2 == 0 {
                Entity::Task(task)
            } else {
                Entity::from(LogMessage {
                    text: format!("message {i}"),
                    task: Some(task),
                    ..LogMessage::default()
                })
            }
        })
        .collect()
}

#[test]
fn test_json_response_body_scenario() {
    let mut renderer = TextRenderer::default();
    let task = Task {
        response_body: Some(Blob::inline("json", br#"{"a":1}"#.to_vec())),
        response_body_size: 7,
        ..task("https://example.com/a")
    };

    let text = export::plain_text(&renderer.render_task(&task, ContentSelector::SHARING));

    assert!(text.contains("\"a\""));
    assert!(text.contains('1'));
}

#[test]
fn test_form_request_body_scenario() {
    let mut renderer = TextRenderer::default();
    let task = Task {
        method: Some("POST".to_string()),
        original_request: Some(Request {
            url: Some("https://example.com/login".to_string()),
            method: Some("POST".to_string()),
            headers: vec![Header::new("Content-Type", "application/x-www-form-urlencoded")],
            options: None,
        }),
        request_body: Some(Blob::inline("form", b"x=1&y=2".to_vec())),
        request_body_size: 7,
        ..task("https://example.com/login")
    };
    let content = ContentSelector::from_flags(&[ContentFlag::RequestBody]);

    let text = renderer.render_task(&task, content).plain_text();

    assert_eq!(text, "Request Body (7 bytes)\nForm Parameters\nx: 1\ny: 2\n\n");
}

#[test]
fn test_missing_response_body_scenario() {
    let mut renderer = TextRenderer::default();
    let content = ContentSelector::from_flags(&[ContentFlag::ResponseBody]);

    let text = renderer.render_task(&task("https://example.com"), content).plain_text();

    assert_eq!(text, "Response Body\n–\n");
}

#[test]
fn test_batch_fetches_each_blob_once_without_prerender() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let entities = batch(&fetches);

    TextRenderer::default().share(&entities);

    assert_eq!(fetches.load(Ordering::SeqCst), 3);
}

#[test]
fn test_batch_fetches_each_blob_once_with_prerender() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let entities = batch(&fetches);
    let mut renderer = TextRenderer::default().with_prerender_threshold(10);

    renderer.share(&entities);

    assert_eq!(fetches.load(Ordering::SeqCst), 3);
    assert_eq!(renderer.cache().len(), 3);
}

#[test]
fn test_prerender_does_not_change_output() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let entities = batch(&fetches);

    let eager = TextRenderer::default().with_prerender_threshold(0).share(&entities);
    let lazy = TextRenderer::default()
        .with_prerender_threshold(usize::MAX)
        .share(&entities);

    assert_eq!(eager, lazy);
    assert_eq!(export::plain_text(&eager), export::plain_text(&lazy));
}

#[test]
fn test_zero_entities_render_empty_document() {
    let document = TextRenderer::sharing().share(&[]);
    assert!(document.is_empty());
    assert_eq!(export::plain_text(&document), "");
}

#[test]
fn test_single_entity_keeps_large_header() {
    let entity = Entity::from(task("https://example.com/one"));

    let single = TextRenderer::sharing().share(std::slice::from_ref(&entity));
    let pair = TextRenderer::sharing().share(&[entity.clone(), entity]);

    assert!(single.plain_text().starts_with("200 OK\n\nGET\nhttps://example.com/one\n"));
    assert!(pair.plain_text().starts_with("00:00:00.000 · GET · 200 OK\n"));
}

#[test]
fn test_batch_is_join_of_individual_renders() {
    let a = Entity::from(task("https://example.com/a"));
    let b = Entity::from(LogMessage {
        level: LogLevel::Error,
        text: "failed".to_string(),
        ..LogMessage::default()
    });
    let content = ContentSelector::for_sharing(2);
    let mut renderer = TextRenderer::sharing();

    let batch = renderer.render_entities(&[a.clone(), b.clone()], content);
    let expected = StyledDocument::joined(
        [renderer.render_entity(&a, content), renderer.render_entity(&b, content)],
        &spacer(),
    );

    assert_eq!(batch, expected);
}

#[test]
fn test_messages_are_separated_by_one_blank_line() {
    let entities: Vec<Entity> = ["one", "two", "three"]
        .iter()
        .map(|text| {
            Entity::from(LogMessage {
                text: (*text).to_string(),
                ..LogMessage::default()
            })
        })
        .collect();

    let text = export::plain_text_terse(&TextRenderer::sharing().share(&entities));

    assert_eq!(text, "one\n\ntwo\n\nthree\n");
}

#[test]
fn test_decoding_error_is_advisory() {
    let mut renderer = TextRenderer::default();
    let task = Task {
        response_body: Some(Blob::inline("bad", br#"{"count":"ten"}"#.to_vec())),
        response_body_size: 15,
        decoding_error: Some(blotter_core::DecodingError {
            kind: blotter_core::DecodingErrorKind::TypeMismatch,
            coding_path: vec![blotter_core::CodingKey::Key("count".to_string())],
            description: "Expected Int".to_string(),
        }),
        ..task("https://example.com/count")
    };

    let document = renderer.render_task(&task, ContentSelector::SHARING);

    assert!(document.plain_text().contains("\"count\": \"ten\""));
    assert!(document.runs().iter().any(|run| run.background.is_some()));
}

proptest! {
    #[test]
    fn test_task_render_contains_url(path in "[a-z0-9]{1,12}", batch_size in 1usize..4) {
        let url = format!("https://example.com/{path}");
        let entities = vec![Entity::from(task(&url)); batch_size];

        let text = export::plain_text(&TextRenderer::sharing().share(&entities));

        prop_assert!(text.contains(&url));
    }

    #[test]
    fn test_message_render_contains_text(message in "[^\n]{1,40}") {
        let entity = Entity::from(LogMessage {
            text: message.clone(),
            ..LogMessage::default()
        });

        let text = export::plain_text(&TextRenderer::sharing().share(&[entity]));

        prop_assert!(text.contains(&message));
    }
}
