//! Export converters applied to real renders.

#![allow(clippy::unwrap_used)]

use blotter_core::{
    Blob, ColorMode, Entity, Header, LogMessage, RenderOptions, Request, Response, Task, TaskState,
    TextRenderer, export,
};

fn sample_task() -> Task {
    let body = br#"{"user":{"name":"Ana <admin>","roles":["read","write"]}}"#;
    Task {
        state: TaskState::Success,
        url: Some("https://example.com/users/1?expand=roles".to_string()),
        method: Some("GET".to_string()),
        original_request: Some(Request {
            url: Some("https://example.com/users/1?expand=roles".to_string()),
            headers: vec![Header::new("Accept", "application/json")],
            ..Request::default()
        }),
        current_request: Some(Request {
            headers: vec![Header::new("Accept", "application/json")],
            ..Request::default()
        }),
        response: Some(Response {
            status_code: Some(200),
            headers: vec![Header::new("Content-Type", "application/json")],
        }),
        response_body: Some(Blob::inline("user", body.to_vec())),
        response_body_size: body.len() as u64,
        ..Task::default()
    }
}

fn sample_batch() -> Vec<Entity> {
    vec![
        Entity::from(sample_task()),
        Entity::from(LogMessage {
            label: Some("auth".to_string()),
            text: "Signed in as Ana – welcome".to_string(),
            ..LogMessage::default()
        }),
    ]
}

#[test]
fn test_html_export_is_standalone_and_escaped() {
    let document = TextRenderer::sharing().share(&sample_batch());

    let html = export::html(&document);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.trim_end().ends_with("</html>"));
    assert!(html.contains("&lt;admin&gt;"));
    assert!(!html.contains("<admin>"));
    assert!(html.contains("&#x2013;"));
    assert_eq!(html.matches("<span").count(), html.matches("</span>").count());
}

#[test]
fn test_markdown_export_structure() {
    let document = TextRenderer::sharing().share(&[Entity::from(sample_task())]);

    let markdown = export::markdown(&document);

    assert!(markdown.starts_with("## 200 OK\n"));
    assert!(markdown.contains("### Response Body ("));
    assert!(markdown.contains("```\n{\n  \"user\": {\n"));
    assert_eq!(markdown.matches("```").count() % 2, 0);
}

#[test]
fn test_terse_text_drops_metadata_lines() {
    let document = TextRenderer::sharing().share(&sample_batch());

    let full = export::plain_text(&document);
    let terse = export::plain_text_terse(&document);

    assert!(full.contains("· GET · 200 OK"));
    assert!(!terse.contains("· GET · 200 OK"));
    assert!(terse.contains("https://example.com/users/1?expand=roles"));
    assert!(terse.contains("Signed in as Ana – welcome"));
}

#[test]
fn test_monochrome_html_uses_two_tones() {
    let mut renderer = TextRenderer::new(RenderOptions::with_color(ColorMode::Monochrome));
    let document = renderer.share(&sample_batch());

    let html = export::html(&document);

    for color in ["#ff3b30", "#34c759", "#007aff"] {
        assert!(!html.contains(&format!("color: {color}")), "unexpected {color}");
    }
}

#[cfg(feature = "pdf")]
mod pdf {
    use super::*;
    use blotter_core::export::pdf::{PageSetup, pdf};

    #[test]
    fn test_pdf_export_of_batch() {
        let entities: Vec<Entity> = std::iter::repeat_with(|| Entity::from(sample_task()))
            .take(20)
            .collect();
        let document = TextRenderer::sharing().share(&entities);

        let bytes = pdf(&document, &PageSetup::default()).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.matches("/Type /Page /Parent").count() > 1);
    }
}
