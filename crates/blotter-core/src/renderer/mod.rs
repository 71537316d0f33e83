//! The document builder.
//!
//! [`TextRenderer`] turns tasks, log messages and transactions into
//! [`StyledDocument`]s and joins them for batch exports. Which sections a task
//! render contains is decided by a [`ContentSelector`]; the order is fixed:
//!
//! 1. header or large header
//! 2. task details, error details
//! 3. URL components, query items, request options
//! 4. request headers
//! 5. request body
//! 6. response headers
//! 7. response body
//!
//! Sections whose source has no data are skipped silently. Documents are
//! separated by a one-line spacer, with no spacer after the last one.
//!
//! ## Response body cache
//!
//! A renderer owns a [`RenderedBodyCache`]. Response bodies are looked up by
//! blob id before formatting and stored after, so a body shared by many
//! entities is fetched and formatted once per renderer. [`TextRenderer::share`]
//! additionally pre-renders all distinct bodies in parallel for large batches.

pub mod cache;

pub use cache::RenderedBodyCache;

use crate::config::RenderConfig;
use crate::content::{ContentSelector, Section};
use crate::document::StyledDocument;
use crate::format::key_value::{render_section, subheadline};
use crate::format::{BodyFormatter, PLACEHOLDER, placeholder};
use crate::section::KeyValueSection;
use crate::status::{Status, message_subheadline, task_subheadline};
use crate::style::{
    Color, ColorMode, FontStyle, FontWeight, RenderOptions, TextRole, TextStyle, TextWidth,
};
use crate::types::{Blob, Entity, Header, LogLevel, LogMessage, Task, TaskState, Transaction};
use crate::utils::format_body_size;
use cache::PoolSize;
use tracing::debug;

/// Batches larger than this are pre-rendered before the join.
pub const DEFAULT_PRERENDER_THRESHOLD: usize = 100;
/// Worker count once the job list is long enough.
pub const DEFAULT_MAX_WORKERS: usize = 32;
/// Job count from which pre-rendering uses more than one worker.
pub const DEFAULT_MIN_PARALLEL_JOBS: usize = 32;

/// The blank line between sections and between documents.
pub fn spacer() -> StyledDocument {
    StyledDocument::text("\n", TextStyle::spacer())
}

/// Builds styled documents from captured records.
#[derive(Debug)]
pub struct TextRenderer {
    options: RenderOptions,
    formatter: BodyFormatter,
    cache: RenderedBodyCache,
    prerender_threshold: usize,
    pool: PoolSize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl TextRenderer {
    /// Renderer with the given options and default batch settings.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            formatter: BodyFormatter::new(options),
            cache: RenderedBodyCache::new(),
            prerender_threshold: DEFAULT_PRERENDER_THRESHOLD,
            pool: PoolSize {
                max_workers: DEFAULT_MAX_WORKERS,
                min_parallel_jobs: DEFAULT_MIN_PARALLEL_JOBS,
            },
        }
    }

    /// Renderer with export options.
    #[must_use]
    pub fn sharing() -> Self {
        Self::new(RenderOptions::SHARING)
    }

    /// Renderer configured from the `[render]` config section.
    #[must_use]
    pub fn from_config(config: &RenderConfig) -> Self {
        let options = RenderOptions::with_color(config.color);
        Self {
            options,
            formatter: BodyFormatter::new(options).with_max_body_size(config.max_body_size),
            cache: RenderedBodyCache::new(),
            prerender_threshold: config.prerender_threshold,
            pool: PoolSize {
                max_workers: config.max_workers,
                min_parallel_jobs: config.min_parallel_jobs,
            },
        }
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> RenderOptions {
        self.options
    }

    /// The response bodies rendered so far.
    #[must_use]
    pub const fn cache(&self) -> &RenderedBodyCache {
        &self.cache
    }

    /// Pre-render batches with more than `threshold` entities.
    #[must_use]
    pub const fn with_prerender_threshold(mut self, threshold: usize) -> Self {
        self.prerender_threshold = threshold;
        self
    }

    /// Render one entity. A message with a task renders as the task.
    pub fn render_entity(&mut self, entity: &Entity, content: ContentSelector) -> StyledDocument {
        match entity {
            Entity::Task(task) => self.render_task(task, content),
            Entity::Message(message) => match &message.task {
                Some(task) => self.render_task(task, content),
                None => self.render_message(message),
            },
            Entity::Transaction(transaction) => self.render_transaction(transaction),
        }
    }

    /// Render entities in order, separated by spacers.
    pub fn render_entities(&mut self, entities: &[Entity], content: ContentSelector) -> StyledDocument {
        let documents: Vec<StyledDocument> = entities
            .iter()
            .map(|entity| self.render_entity(entity, content))
            .collect();
        StyledDocument::joined(documents, &spacer())
    }

    /// Batch export.
    ///
    /// Uses the sharing selector, switching to the compact header when there
    /// is more than one entity, and pre-renders response bodies for batches
    /// above the threshold.
    pub fn share(&mut self, entities: &[Entity]) -> StyledDocument {
        if entities.len() > self.prerender_threshold {
            self.prerender_response_bodies(entities);
        }
        let content = ContentSelector::for_sharing(entities.len());
        debug!(entities = entities.len(), ?content, "rendering batch");
        self.render_entities(entities, content)
    }

    /// Format every distinct response body of `entities` ahead of the join.
    ///
    /// Returns the number of bodies added to the cache. Bodies whose bytes
    /// cannot be loaded are skipped and render on demand later.
    pub fn prerender_response_bodies(&mut self, entities: &[Entity]) -> usize {
        cache::prerender(entities, &mut self.cache, &self.formatter, self.pool)
    }

    /// Render a log message: a technical subheadline, then the text.
    pub fn render_message(&self, message: &LogMessage) -> StyledDocument {
        let mut output = StyledDocument::text(
            format!("{}\n", message_subheadline(message)),
            metadata_style(Color::SecondaryLabel),
        )
        .technical();
        output.push(
            format!("{}\n", message.text),
            TextStyle::role(TextRole::Body2).with_color(self.level_color(message.level)),
        );
        output
    }

    /// Render a task with the selected sections.
    pub fn render_task(&mut self, task: &Task, content: ContentSelector) -> StyledDocument {
        let mut components = Vec::new();
        for section in content.sections() {
            match section {
                Section::LargeHeader => components.push(self.render_large_header(task)),
                Section::Header => components.push(self.render_header(task)),
                Section::TaskDetails => {
                    components.push(self.section(&KeyValueSection::task_details(task), false));
                },
                Section::ErrorDetails => {
                    self.push_section(&mut components, KeyValueSection::error_details(task), false);
                },
                Section::UrlComponents => {
                    let section = task.url.as_deref().and_then(KeyValueSection::url_components);
                    self.push_section(&mut components, section, false);
                },
                Section::QueryItems => {
                    let section = task.url.as_deref().and_then(KeyValueSection::query_items);
                    self.push_section(&mut components, section, false);
                },
                Section::RequestOptions => {
                    let section = task
                        .original_request
                        .as_ref()
                        .and_then(KeyValueSection::request_options);
                    self.push_section(&mut components, section, false);
                },
                Section::OriginalAndCurrentRequestHeaders => {
                    match (&task.original_request, &task.current_request) {
                        (Some(original), Some(current)) => {
                            components.push(self.headers("Original Request Headers", &original.headers));
                            components.push(self.headers("Current Request Headers", &current.headers));
                        },
                        (Some(request), None) | (None, Some(request)) => {
                            components.push(self.headers("Request Headers", &request.headers));
                        },
                        (None, None) => {},
                    }
                },
                Section::OriginalRequestHeaders => {
                    if let Some(request) = &task.original_request {
                        components.push(self.headers("Request Headers", &request.headers));
                    }
                },
                Section::CurrentRequestHeaders => {
                    if let Some(request) = &task.current_request {
                        components.push(self.headers("Request Headers", &request.headers));
                    }
                },
                Section::RequestBody => {
                    let body = self.render_request_body(task);
                    components.push(body_section("Request Body", task.request_body_size, body));
                },
                Section::ResponseHeaders => {
                    if let Some(response) = &task.response {
                        components.push(self.headers("Response Headers", &response.headers));
                    }
                },
                Section::ResponseBody => {
                    let body = self.render_response_body(task);
                    components.push(body_section("Response Body", task.response_body_size, body));
                },
            }
        }
        StyledDocument::joined(components, &spacer())
    }

    /// Render one transaction: header, URL components, request and response
    /// headers, and timing details.
    pub fn render_transaction(&self, transaction: &Transaction) -> StyledDocument {
        let request = &transaction.request;
        let status = Status::for_transaction(transaction);
        let mut components = vec![self.large_header(
            &status,
            request.method.as_deref().unwrap_or("GET"),
            request.url.as_deref(),
        )];
        if let Some(section) = request.url.as_deref().and_then(KeyValueSection::url_components) {
            components.push(self.section(&section, false));
        }
        components.push(self.headers("Request Headers", &request.headers));
        if let Some(response) = &transaction.response {
            components.push(self.headers("Response Headers", &response.headers));
        }
        components.push(self.section(&KeyValueSection::transaction_details(transaction), false));
        StyledDocument::joined(components, &spacer())
    }

    /// The request body, a size summary when only the size is known, or `–`.
    pub fn render_request_body(&self, task: &Task) -> StyledDocument {
        let content_type = task.request_content_type();
        if let Some((blob, bytes)) = loaded(task.request_body.as_ref()) {
            return cache::format_body(&self.formatter, blob.id(), &bytes, content_type.as_ref(), None);
        }
        if task.request_body_size > 0 {
            return self.formatter.summary(task.request_body_size, content_type.as_ref());
        }
        placeholder()
    }

    /// The response body, from the cache when already rendered.
    pub fn render_response_body(&mut self, task: &Task) -> StyledDocument {
        let content_type = task.response_content_type();
        if let Some(blob) = &task.response_body {
            if let Some(cached) = self.cache.get(blob.id()) {
                return cached.clone();
            }
        }
        if let Some((blob, bytes)) = loaded(task.response_body.as_ref()) {
            let document = cache::format_body(
                &self.formatter,
                blob.id(),
                &bytes,
                content_type.as_ref(),
                task.decoding_error.as_ref(),
            );
            self.cache.insert(blob.id().clone(), document.clone());
            return document;
        }
        if task.response_body_size > 0 {
            return self.formatter.summary(task.response_body_size, content_type.as_ref());
        }
        placeholder()
    }

    fn render_large_header(&self, task: &Task) -> StyledDocument {
        self.large_header(&Status::for_task(task), task.http_method(), task.url.as_deref())
    }

    fn large_header(&self, status: &Status, method: &str, url: Option<&str>) -> StyledDocument {
        let tint = if self.options.color == ColorMode::Monochrome {
            Color::Label
        } else {
            status.tint
        };
        let mut output = StyledDocument::text(
            format!("{}\n", status.title),
            TextStyle::role(TextRole::Title)
                .with_weight(FontWeight::Semibold)
                .with_color(tint),
        );
        output.append(spacer());
        output.push(
            format!("{method}\n"),
            TextStyle::role(TextRole::Body).with_weight(FontWeight::Semibold),
        );
        output.push(
            format!("{}\n", url.unwrap_or(PLACEHOLDER)),
            TextStyle::role(TextRole::Body2),
        );
        output
    }

    fn render_header(&self, task: &Task) -> StyledDocument {
        let colored = task.state == TaskState::Failure && self.options.color != ColorMode::Monochrome;
        let (title_color, details_color) = if colored {
            (Color::Red, Color::Red)
        } else {
            (Color::SecondaryLabel, Color::Label)
        };
        let mut output = StyledDocument::text(
            format!("{}\n", task_subheadline(task)),
            metadata_style(title_color),
        )
        .technical();
        output.push(
            format!("{}\n", task.url.as_deref().unwrap_or(PLACEHOLDER)),
            TextStyle::role(TextRole::Body2)
                .with_weight(FontWeight::Medium)
                .with_color(details_color),
        );
        output
    }

    fn section(&self, section: &KeyValueSection, count: bool) -> StyledDocument {
        let details = (count && !section.items.is_empty()).then(|| section.items.len().to_string());
        render_section(section, details.as_deref(), FontStyle::Monospaced, self.options)
    }

    fn push_section(
        &self,
        components: &mut Vec<StyledDocument>,
        section: Option<KeyValueSection>,
        count: bool,
    ) {
        if let Some(section) = section {
            components.push(self.section(&section, count));
        }
    }

    fn headers(&self, title: &str, headers: &[Header]) -> StyledDocument {
        self.section(&KeyValueSection::headers(title, headers), true)
    }

    fn level_color(&self, level: LogLevel) -> Color {
        if self.options.color == ColorMode::Monochrome {
            return if level == LogLevel::Trace {
                Color::SecondaryLabel
            } else {
                Color::Label
            };
        }
        match level {
            LogLevel::Trace => Color::SecondaryLabel,
            LogLevel::Debug => Color::Label,
            LogLevel::Info => Color::Blue,
            LogLevel::Notice => Color::Indigo,
            LogLevel::Warning => Color::Orange,
            LogLevel::Error | LogLevel::Critical => Color::Red,
        }
    }
}

/// Batch export with the sharing options.
pub fn share(entities: &[Entity]) -> StyledDocument {
    TextRenderer::sharing().share(entities)
}

fn metadata_style(color: Color) -> TextStyle {
    TextStyle::new(
        TextRole::Subheadline,
        FontStyle::MonospacedDigital,
        FontWeight::Regular,
        TextWidth::Condensed,
        color,
    )
}

fn body_section(title: &str, size: u64, body: StyledDocument) -> StyledDocument {
    let title = match format_body_size(size) {
        Some(size) => format!("{title} ({size})"),
        None => title.to_string(),
    };
    let mut output = subheadline(&title);
    output.append(body);
    output.push("\n", TextStyle::role(TextRole::Body2));
    output
}

fn loaded(blob: Option<&Blob>) -> Option<(&Blob, Vec<u8>)> {
    let blob = blob?;
    let bytes = blob.load().filter(|bytes| !bytes.is_empty())?;
    Some((blob, bytes))
}
