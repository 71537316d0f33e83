//! Batch-scoped memoization of response-body rendering.
//!
//! Many log messages usually point at a handful of tasks, so a batch export
//! would otherwise format the same response body over and over. Before the
//! sequential join, [`prerender`] formats each distinct body once on a
//! dedicated `rayon` pool sized for the batch.
//!
//! Workers own disjoint contiguous slices of the job list and return their
//! results instead of writing to shared state; the results are merged into
//! the cache on the calling thread after every worker has joined. Each blob id
//! is queued at most once, so every key has exactly one writer.

use crate::document::StyledDocument;
use crate::format::BodyFormatter;
use crate::types::{Blob, BlobId, ContentType, DecodingError, Entity};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use tracing::{debug, trace, warn};

/// Rendered response bodies keyed by blob identity.
///
/// Entries are never overwritten: the first document stored for a blob wins.
#[derive(Debug, Default)]
pub struct RenderedBodyCache {
    bodies: HashMap<BlobId, StyledDocument>,
}

impl RenderedBodyCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached document for a blob.
    #[must_use]
    pub fn get(&self, id: &BlobId) -> Option<&StyledDocument> {
        self.bodies.get(id)
    }

    /// Whether the blob has been rendered.
    #[must_use]
    pub fn contains(&self, id: &BlobId) -> bool {
        self.bodies.contains_key(id)
    }

    /// Store a document unless the blob already has one. Returns whether it was stored.
    pub fn insert(&mut self, id: BlobId, document: StyledDocument) -> bool {
        match self.bodies.entry(id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(document);
                true
            },
        }
    }

    /// Number of cached bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// One distinct response body waiting to be formatted.
#[derive(Debug, Clone)]
pub(crate) struct RenderJob {
    pub blob: Blob,
    pub content_type: Option<ContentType>,
    pub error: Option<DecodingError>,
}

/// Worker pool sizing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PoolSize {
    pub max_workers: usize,
    pub min_parallel_jobs: usize,
}

impl PoolSize {
    /// `max_workers` once there are at least `min_parallel_jobs` jobs, else one.
    pub fn workers_for(self, jobs: usize) -> usize {
        if jobs >= self.min_parallel_jobs.max(1) {
            self.max_workers.clamp(1, jobs)
        } else {
            1
        }
    }
}

/// Format a body and tag it with its blob.
pub(crate) fn format_body(
    formatter: &BodyFormatter,
    id: &BlobId,
    bytes: &[u8],
    content_type: Option<&ContentType>,
    error: Option<&DecodingError>,
) -> StyledDocument {
    formatter.format(bytes, content_type, error).with_object_id(id)
}

/// Distinct, non-empty, not yet cached response bodies in entity order.
pub(crate) fn collect_jobs(entities: &[Entity], cache: &RenderedBodyCache) -> Vec<RenderJob> {
    let mut queued = HashSet::new();
    let mut jobs = Vec::new();
    for task in entities.iter().filter_map(Entity::task) {
        let Some(blob) = task.response_body.as_ref() else {
            continue;
        };
        if task.response_body_size == 0 || cache.contains(blob.id()) {
            continue;
        }
        if queued.insert(blob.id().clone()) {
            jobs.push(RenderJob {
                blob: blob.clone(),
                content_type: task.response_content_type(),
                error: task.decoding_error.clone(),
            });
        }
    }
    jobs
}

/// Jobs handled by worker `index` of `workers`.
pub(crate) const fn slice_bounds(index: usize, jobs: usize, workers: usize) -> Range<usize> {
    (index * jobs / workers)..((index + 1) * jobs / workers)
}

fn render_job(formatter: &BodyFormatter, job: &RenderJob) -> Option<(BlobId, StyledDocument)> {
    let id = job.blob.id();
    let Some(bytes) = job.blob.load().filter(|bytes| !bytes.is_empty()) else {
        trace!(blob = %id, "response body unavailable, leaving it for on-demand rendering");
        return None;
    };
    let document = format_body(
        formatter,
        id,
        &bytes,
        job.content_type.as_ref(),
        job.error.as_ref(),
    );
    Some((id.clone(), document))
}

/// Format every job, spreading them over the worker pool.
pub(crate) fn run_jobs(
    jobs: &[RenderJob],
    formatter: &BodyFormatter,
    pool: PoolSize,
) -> Vec<(BlobId, StyledDocument)> {
    let workers = pool.workers_for(jobs.len());
    debug!(jobs = jobs.len(), workers, "pre-rendering response bodies");

    if workers <= 1 {
        return render_slice(formatter, jobs);
    }

    let thread_pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("blotter-prerender-{index}"))
        .build()
    {
        Ok(thread_pool) => thread_pool,
        Err(err) => {
            warn!(error = %err, "could not start pre-render pool, formatting on this thread");
            return render_slice(formatter, jobs);
        },
    };

    let partitions: Vec<Vec<(BlobId, StyledDocument)>> = thread_pool.install(|| {
        (0..workers)
            .into_par_iter()
            .map(|index| render_slice(formatter, &jobs[slice_bounds(index, jobs.len(), workers)]))
            .collect()
    });
    partitions.into_iter().flatten().collect()
}

fn render_slice(formatter: &BodyFormatter, jobs: &[RenderJob]) -> Vec<(BlobId, StyledDocument)> {
    jobs.iter().filter_map(|job| render_job(formatter, job)).collect()
}

/// Pre-render the response bodies of `entities` into `cache`.
///
/// Returns the number of bodies added.
pub(crate) fn prerender(
    entities: &[Entity],
    cache: &mut RenderedBodyCache,
    formatter: &BodyFormatter,
    pool: PoolSize,
) -> usize {
    let jobs = collect_jobs(entities, cache);
    if jobs.is_empty() {
        return 0;
    }
    let rendered = run_jobs(&jobs, formatter, pool);
    let mut added = 0;
    for (id, document) in rendered {
        if cache.insert(id, document) {
            added += 1;
        }
    }
    debug!(added, cached = cache.len(), "merged pre-rendered bodies");
    added
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::style::RenderOptions;
    use crate::types::{Header, LogMessage, Response, Task};
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn task_with_body(id: &str, body: &'static [u8], calls: &Arc<AtomicUsize>) -> Arc<Task> {
        let counter = Arc::clone(calls);
        Arc::new(Task {
            response: Some(Response {
                status_code: Some(200),
                headers: vec![Header::new("Content-Type", "application/json")],
            }),
            response_body: Some(Blob::new(id, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Some(body.to_vec())
            })),
            response_body_size: body.len() as u64,
            ..Task::default()
        })
    }

    fn pool() -> PoolSize {
        PoolSize {
            max_workers: 32,
            min_parallel_jobs: 32,
        }
    }

    #[test]
    fn test_cache_is_write_once() {
        let mut cache = RenderedBodyCache::new();
        let id = BlobId::from("a");

        assert!(cache.insert(id.clone(), StyledDocument::new()));
        assert!(!cache.insert(id.clone(), StyledDocument::new()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_worker_count_policy() {
        assert_eq!(pool().workers_for(0), 1);
        assert_eq!(pool().workers_for(31), 1);
        assert_eq!(pool().workers_for(32), 32);
        assert_eq!(pool().workers_for(500), 32);
    }

    #[test]
    fn test_collect_jobs_deduplicates_and_skips_empty() {
        let calls = Arc::new(AtomicUsize::new(0));
        let shared = task_with_body("shared", b"{}", &calls);
        let mut empty = (*task_with_body("empty", b"", &calls)).clone();
        empty.response_body_size = 0;

        let entities = vec![
            Entity::Task(Arc::clone(&shared)),
            Entity::from(LogMessage {
                task: Some(Arc::clone(&shared)),
                ..LogMessage::default()
            }),
            Entity::from(empty),
            Entity::from(LogMessage::default()),
        ];

        let jobs = collect_jobs(&entities, &RenderedBodyCache::new());

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].blob.id().as_str(), "shared");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prerender_fetches_each_blob_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tasks: Vec<_> = (0..40)
            .map(|i| task_with_body(&format!("blob-{i}"), br#"{"ok":true}"#, &calls))
            .collect();
        let entities: Vec<Entity> = tasks
            .iter()
            .chain(tasks.iter())
            .map(|t| Entity::Task(Arc::clone(t)))
            .collect();
        let mut cache = RenderedBodyCache::new();
        let formatter = BodyFormatter::new(RenderOptions::SHARING);

        let added = prerender(&entities, &mut cache, &formatter, pool());

        assert_eq!(added, 40);
        assert_eq!(calls.load(Ordering::SeqCst), 40);
        assert_eq!(prerender(&entities, &mut cache, &formatter, pool()), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 40);
    }

    #[test]
    fn test_pool_results_keep_job_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let entities: Vec<Entity> = (0..45)
            .map(|i| Entity::Task(task_with_body(&format!("blob-{i:02}"), b"[]", &calls)))
            .collect();
        let jobs = collect_jobs(&entities, &RenderedBodyCache::new());

        let parallel = run_jobs(&jobs, &BodyFormatter::default(), pool());
        let sequential = run_jobs(
            &jobs,
            &BodyFormatter::default(),
            PoolSize {
                max_workers: 1,
                min_parallel_jobs: 32,
            },
        );

        let ids = |results: &[(BlobId, StyledDocument)]| -> Vec<String> {
            results.iter().map(|(id, _)| id.as_str().to_string()).collect()
        };
        assert_eq!(parallel.len(), 45);
        assert_eq!(ids(&parallel), ids(&sequential));
        assert_eq!(ids(&parallel)[44], "blob-44");
        assert_eq!(calls.load(Ordering::SeqCst), 90);
    }

    #[test]
    fn test_missing_bytes_leave_no_entry() {
        let task = Arc::new(Task {
            response_body: Some(Blob::new("gone", || None)),
            response_body_size: 10,
            ..Task::default()
        });
        let mut cache = RenderedBodyCache::new();

        let added = prerender(
            &[Entity::Task(task)],
            &mut cache,
            &BodyFormatter::default(),
            pool(),
        );

        assert_eq!(added, 0);
        assert!(cache.is_empty());
    }

    proptest! {
        #[test]
        fn test_slices_partition_jobs(jobs in 0usize..500, workers in 1usize..40) {
            let mut covered = 0;
            for index in 0..workers {
                let range = slice_bounds(index, jobs, workers);
                prop_assert_eq!(range.start, covered);
                covered = range.end;
            }
            prop_assert_eq!(covered, jobs);
        }
    }
}
