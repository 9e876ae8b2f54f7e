use crate::models::{GradientSpec, RasterImage, SpecError};
use crate::services::gradient::{self, RenderError};
use crate::services::preview::PreviewScaler;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// Progress snapshot pushed to the preview queue
///
/// `preview`, when present, is already sized for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub percent: u8,
    pub preview: Option<RasterImage>,
}

impl ProgressEvent {
    pub fn new(percent: u8, preview: Option<RasterImage>) -> Self {
        Self {
            percent: percent.min(100),
            preview,
        }
    }
}

/// Terminal item pushed to the result queue; nothing follows it for that job
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed(RasterImage),
    Cancelled,
    Failed(String),
}

/// Cooperative cancellation capability shared between a controller and a job
///
/// Backed by a `watch` channel so every clone observes the same flag. Setting
/// it never interrupts work; the job polls it at its checkpoints.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    flag: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self { flag: Arc::new(flag) }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Receiver for async code that wants to await the request
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending halves of the two job queues
#[derive(Debug, Clone)]
pub struct JobChannels {
    pub progress: mpsc::UnboundedSender<ProgressEvent>,
    pub result: mpsc::UnboundedSender<JobOutcome>,
}

/// Receiving halves of the two job queues
#[derive(Debug)]
pub struct JobReceivers {
    pub progress: mpsc::UnboundedReceiver<ProgressEvent>,
    pub result: mpsc::UnboundedReceiver<JobOutcome>,
}

/// Create the progress and result queues for one job
pub fn job_channels() -> (JobChannels, JobReceivers) {
    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let (result_tx, result_rx) = mpsc::unbounded_channel();
    (
        JobChannels {
            progress: progress_tx,
            result: result_tx,
        },
        JobReceivers {
            progress: progress_rx,
            result: result_rx,
        },
    )
}

/// One two-phase render: a quick preview, then the full-resolution image
///
/// The job runs synchronously on whatever thread calls [`run`](Self::run)
/// (the controller uses tokio's blocking pool). It communicates only through
/// its queues and never waits on the consumer. Cancellation is checked before
/// each phase; once observed, the job sends [`JobOutcome::Cancelled`] and
/// emits nothing else.
///
/// Progress sequence on success: 10 (with quick preview), 20, 90 (with a
/// preview of the finished image when it is large), 100, then the image on
/// the result queue.
#[derive(Debug)]
pub struct GenerationJob {
    spec: GradientSpec,
    preview_size: (u32, u32),
    scaler: PreviewScaler,
    large_image_threshold: u64,
    token: CancellationToken,
    channels: JobChannels,
}

/// Why a job stopped before delivering an image
#[derive(Error, Debug)]
enum Interrupted {
    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Spec(#[from] SpecError),
}

impl GenerationJob {
    pub fn new(
        spec: GradientSpec,
        preview_size: (u32, u32),
        scaler: PreviewScaler,
        large_image_threshold: u64,
        token: CancellationToken,
        channels: JobChannels,
    ) -> Self {
        Self {
            spec,
            preview_size: (preview_size.0.max(1), preview_size.1.max(1)),
            scaler,
            large_image_threshold,
            token,
            channels,
        }
    }

    pub fn spec(&self) -> &GradientSpec {
        &self.spec
    }

    /// Execute the job to completion, cancellation or failure.
    ///
    /// The terminal outcome is both sent on the result queue and returned.
    pub fn run(self) -> JobOutcome {
        let start = Instant::now();
        tracing::info!(
            "Generation started: {}x{} {:?}",
            self.spec.width(),
            self.spec.height(),
            self.spec.kind()
        );

        let outcome = match self.execute() {
            Ok(image) => {
                tracing::info!(
                    "Generation completed in {:.2}s",
                    start.elapsed().as_secs_f32()
                );
                JobOutcome::Completed(image)
            }
            Err(Interrupted::Cancelled) => {
                tracing::warn!("Generation cancelled after {:.2}s", start.elapsed().as_secs_f32());
                JobOutcome::Cancelled
            }
            Err(error) => {
                tracing::error!("Generation failed: {}", error);
                JobOutcome::Failed(error.to_string())
            }
        };

        if self.channels.result.send(outcome.clone()).is_err() {
            tracing::debug!("Result queue closed before the outcome was delivered");
        }
        outcome
    }

    fn execute(&self) -> Result<RasterImage, Interrupted> {
        let (pw, ph) = self.preview_size;

        // Phase 1: quick preview, oversampled then shrunk to the display size
        self.checkpoint("quick preview")?;
        let (ow, oh) = self.scaler.oversampled(self.preview_size);
        let quick = gradient::render(&self.spec.with_size(ow, oh)?)?;
        self.emit(10, Some(PreviewScaler::resize(&quick, pw, ph)));

        // Phase 2: full resolution
        self.checkpoint("full render")?;
        self.emit(20, None);
        let full = gradient::render(&self.spec)?;

        self.checkpoint("finishing")?;
        if self.spec.pixel_count() > self.large_image_threshold {
            self.emit(90, Some(PreviewScaler::resize(&full, pw, ph)));
        } else {
            self.emit(90, None);
        }

        self.checkpoint("delivery")?;
        self.emit(100, None);

        Ok(full)
    }

    fn checkpoint(&self, stage: &str) -> Result<(), Interrupted> {
        if self.token.is_cancelled() {
            tracing::debug!("Cancellation observed before {}", stage);
            return Err(Interrupted::Cancelled);
        }
        tracing::debug!("Checkpoint passed: {}", stage);
        Ok(())
    }

    fn emit(&self, percent: u8, preview: Option<RasterImage>) {
        if self.channels.progress.send(ProgressEvent::new(percent, preview)).is_err() {
            tracing::debug!("Progress queue closed, dropping {}% event", percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, Direction};

    fn drain(rx: &mut mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn job(spec: GradientSpec, threshold: u64, token: CancellationToken) -> (GenerationJob, JobReceivers) {
        let (channels, receivers) = job_channels();
        let job = GenerationJob::new(
            spec,
            (20, 10),
            PreviewScaler::default(),
            threshold,
            token,
            channels,
        );
        (job, receivers)
    }

    fn spec(width: u32, height: u32) -> GradientSpec {
        GradientSpec::linear(Direction::LeftToRight, Color::BLACK, Color::WHITE, width, height).unwrap()
    }

    #[test]
    fn test_small_image_progress_sequence() {
        let (job, mut rx) = job(spec(64, 32), 1_000_000, CancellationToken::new());
        let outcome = job.run();

        let events = drain(&mut rx.progress);
        let percents: Vec<u8> = events.iter().map(|e| e.percent).collect();
        assert_eq!(percents, vec![10, 20, 90, 100]);
        assert_eq!(events[0].preview.as_ref().unwrap().dimensions(), (20, 10));
        assert!(events[1..].iter().all(|e| e.preview.is_none()));

        match outcome {
            JobOutcome::Completed(image) => assert_eq!(image.dimensions(), (64, 32)),
            other => panic!("Expected completion, got: {:?}", other),
        }
        assert!(matches!(rx.result.try_recv(), Ok(JobOutcome::Completed(_))));
    }

    #[test]
    fn test_large_image_emits_finished_preview() {
        // Threshold lowered so a small image counts as large
        let (job, mut rx) = job(spec(64, 32), 100, CancellationToken::new());
        job.run();

        let events = drain(&mut rx.progress);
        let ninety = events.iter().find(|e| e.percent == 90).unwrap();
        assert_eq!(ninety.preview.as_ref().unwrap().dimensions(), (20, 10));
    }

    #[test]
    fn test_cancelled_before_start_emits_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let (job, mut rx) = job(spec(64, 32), 1_000_000, token);

        assert_eq!(job.run(), JobOutcome::Cancelled);
        assert!(drain(&mut rx.progress).is_empty());
        assert_eq!(rx.result.try_recv().unwrap(), JobOutcome::Cancelled);
    }

    #[test]
    fn test_render_failure_is_reported() {
        let (job, mut rx) = job(spec(u32::MAX, u32::MAX), 1_000_000, CancellationToken::new());

        match job.run() {
            JobOutcome::Failed(message) => assert!(message.contains("exceeds")),
            other => panic!("Expected failure, got: {:?}", other),
        }
        let percents: Vec<u8> = drain(&mut rx.progress).iter().map(|e| e.percent).collect();
        assert_eq!(percents, vec![10, 20]);
    }

    #[test]
    fn test_token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        let rx = token.subscribe();
        assert!(!clone.is_cancelled());

        token.cancel();
        token.cancel();
        assert!(clone.is_cancelled());
        assert!(*rx.borrow());
    }

    #[test]
    fn test_closed_queues_do_not_panic() {
        let (job, receivers) = job(spec(8, 8), 1_000_000, CancellationToken::new());
        drop(receivers);
        assert!(matches!(job.run(), JobOutcome::Completed(_)));
    }
}
