// Generation metrics
//
// Lock-free counters shared between the controller and the CLI

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters for the generation lifecycle
///
/// Uses atomic operations so a single `Arc<Metrics>` can be shared freely.
/// Summaries are logged on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Jobs accepted by the controller
    pub jobs_submitted: AtomicU64,

    pub jobs_completed: AtomicU64,

    pub jobs_cancelled: AtomicU64,

    pub jobs_failed: AtomicU64,

    /// Submissions refused because a job was already running
    pub busy_rejections: AtomicU64,

    /// Progress events that carried a preview image
    pub previews_delivered: AtomicU64,

    /// Wall time of completed jobs in milliseconds
    pub total_render_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    /// Create a new Metrics instance
    pub fn new() -> Self {
        Self {
            jobs_submitted: AtomicU64::new(0),
            jobs_completed: AtomicU64::new(0),
            jobs_cancelled: AtomicU64::new(0),
            jobs_failed: AtomicU64::new(0),
            busy_rejections: AtomicU64::new(0),
            previews_delivered: AtomicU64::new(0),
            total_render_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_submitted(&self) {
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed job and how long it took
    pub fn record_completed(&self, duration: Duration) {
        self.jobs_completed.fetch_add(1, Ordering::Relaxed);
        self.total_render_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_cancelled(&self) {
        self.jobs_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_busy_rejection(&self) {
        self.busy_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_preview(&self) {
        self.previews_delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average wall time of completed jobs in milliseconds
    pub fn avg_render_time_ms(&self) -> f64 {
        let total = self.total_render_time_ms.load(Ordering::Relaxed);
        let count = self.jobs_completed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Generation Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Jobs: {} submitted, {} completed, {} cancelled, {} failed, {} rejected as busy",
            self.jobs_submitted.load(Ordering::Relaxed),
            self.jobs_completed.load(Ordering::Relaxed),
            self.jobs_cancelled.load(Ordering::Relaxed),
            self.jobs_failed.load(Ordering::Relaxed),
            self.busy_rejections.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Render time: {:.2}s total (avg: {:.2}ms per image), previews: {}",
            self.total_render_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_render_time_ms(),
            self.previews_delivered.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
