//! GenerationController - owns the single active render job.
//!
//! The controller is driven by a polling consumer (the CLI, or a UI timer):
//!
//! 1. [`submit`](GenerationController::submit) starts a [`GenerationJob`] on
//!    tokio's blocking pool and returns immediately, or fails with
//!    [`ControllerError::Busy`].
//! 2. [`poll_events`](GenerationController::poll_events) drains whatever the
//!    job has queued so far without blocking.
//! 3. The job stays active until its terminal outcome has been polled, so a
//!    second submission is refused until the consumer has seen the result.
//!
//! The controller never schedules anything itself.

mod poll;

pub use poll::{ControllerEvent, PollEvents};

use crate::metrics::Metrics;
use crate::models::{GenerationSettings, GradientSpec, RasterImage};
use crate::services::generation::{
    CancellationToken, GenerationJob, JobOutcome, JobReceivers, job_channels,
};
use crate::services::preview::PreviewScaler;
use crate::state::{JobState, RenderJob, Status};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TryRecvError;

/// Errors returned synchronously by the controller
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    #[error("A render is already in progress")]
    Busy,
}

impl From<ControllerError> for Status {
    fn from(error: ControllerError) -> Self {
        match error {
            ControllerError::Busy => Status::Busy,
        }
    }
}

/// The running job together with the consumer ends of its queues
#[derive(Debug)]
struct ActiveJob {
    record: RenderJob,
    receivers: JobReceivers,
    started: Instant,
    /// Terminal outcome received but not yet handed out
    pending: Option<JobOutcome>,
}

impl ActiveJob {
    /// Move an outcome the job has already sent into `pending`.
    ///
    /// Returns whether a terminal outcome is now waiting to be handed out.
    fn receive_outcome(&mut self) -> bool {
        if self.pending.is_none() {
            self.pending = match self.receivers.result.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("Job {} stopped without reporting an outcome", self.record.id());
                    Some(JobOutcome::Failed("Generation stopped unexpectedly".to_string()))
                }
            };
        }
        self.pending.is_some()
    }
}

#[derive(Debug)]
pub struct GenerationController {
    runtime: Handle,
    scaler: PreviewScaler,
    settings: GenerationSettings,
    metrics: Arc<Metrics>,
    active: Option<ActiveJob>,
    finished: Option<RenderJob>,
    last_error: Option<String>,
    latest: Option<(GradientSpec, RasterImage)>,
    history: VecDeque<RasterImage>,
    next_id: u64,
}

impl GenerationController {
    /// Create a new GenerationController.
    ///
    /// # Arguments
    /// * `runtime` - Handle used to run jobs on the blocking pool
    /// * `scaler` - Preview sizing and resampling
    /// * `settings` - Large-image threshold and history bound
    /// * `metrics` - Shared counters
    pub fn new(
        runtime: Handle,
        scaler: PreviewScaler,
        settings: GenerationSettings,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            runtime,
            scaler,
            settings,
            metrics,
            active: None,
            finished: None,
            last_error: None,
            latest: None,
            history: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Start rendering `spec`, with previews of `preview_size` pixels.
    ///
    /// Returns immediately. Fails with [`ControllerError::Busy`] while another
    /// job is active; nothing is queued in that case.
    pub fn submit(&mut self, spec: GradientSpec, preview_size: (u32, u32)) -> Result<(), ControllerError> {
        if self.active.is_some() {
            tracing::warn!("Rejected {}x{} render: controller is busy", spec.width(), spec.height());
            self.metrics.record_busy_rejection();
            return Err(ControllerError::Busy);
        }

        let id = self.next_id;
        self.next_id += 1;

        let token = CancellationToken::new();
        let (channels, receivers) = job_channels();
        let job = GenerationJob::new(
            spec,
            preview_size,
            self.scaler,
            self.settings.large_image_threshold,
            token.clone(),
            channels,
        );

        // Detached: the job reports only through its queues
        drop(self.runtime.spawn_blocking(move || job.run()));

        tracing::info!(
            "Submitted job {}: {}x{}, preview {}x{}",
            id,
            spec.width(),
            spec.height(),
            preview_size.0,
            preview_size.1
        );
        self.metrics.record_submitted();
        self.active = Some(ActiveJob {
            record: RenderJob::start(id, spec, token),
            receivers,
            started: Instant::now(),
            pending: None,
        });
        Ok(())
    }

    /// Submit with a preview fitted to the consumer's viewport and zoom
    pub fn submit_for_viewport(
        &mut self,
        spec: GradientSpec,
        available_w: i64,
        available_h: i64,
        zoom: f64,
    ) -> Result<(), ControllerError> {
        let preview_size =
            self.scaler
                .target_size(available_w, available_h, spec.width(), spec.height(), zoom);
        self.submit(spec, preview_size)
    }

    /// Request cancellation of the active job.
    ///
    /// Idempotent; returns false when no job is active or the job has already
    /// sent its terminal outcome. The job stays active until its `Cancelled`
    /// outcome is polled.
    pub fn cancel(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.receive_outcome() {
            tracing::debug!("Job {} already finished, ignoring cancel", active.record.id());
            return false;
        }

        if !active.record.cancel_requested() {
            tracing::info!("Cancellation requested for job {}", active.record.id());
        }
        active.record.token().cancel();
        true
    }

    /// Non-blocking drain of everything the active job has queued.
    ///
    /// Progress events come first in emission order, followed by at most one
    /// terminal outcome. Iteration stops as soon as both queues are empty.
    pub fn poll_events(&mut self) -> PollEvents<'_> {
        PollEvents::new(self)
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// State of the active job, or of the last finished one
    pub fn state(&self) -> JobState {
        self.current_record()
            .map(RenderJob::state)
            .unwrap_or_default()
    }

    pub fn status(&self) -> Status {
        match self.current_record() {
            Some(record) => Status::of(record, self.last_error.as_deref()),
            None => Status::Idle,
        }
    }

    /// The most recent completed image
    pub fn latest_image(&self) -> Option<&RasterImage> {
        self.latest.as_ref().map(|(_, image)| image)
    }

    /// Previews delivered so far, oldest first, bounded by `history_limit`
    pub fn history(&self) -> impl ExactSizeIterator<Item = &RasterImage> + '_ {
        self.history.iter()
    }

    /// Whether `spec` differs from the spec of the latest completed image
    pub fn needs_render(&self, spec: &GradientSpec) -> bool {
        self.latest.as_ref().is_none_or(|(done, _)| done != spec)
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    fn current_record(&self) -> Option<&RenderJob> {
        self.active
            .as_ref()
            .map(|active| &active.record)
            .or(self.finished.as_ref())
    }

    fn remember_preview(&mut self, preview: &RasterImage) {
        self.metrics.record_preview();
        self.history.push_back(preview.clone());
        while self.history.len() > self.settings.history_limit {
            self.history.pop_front();
        }
    }

    /// Retire the active job after its terminal outcome has been handed out
    fn finish(&mut self, outcome: &JobOutcome) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        let state = active.record.finish(outcome);
        let elapsed = active.started.elapsed();

        match outcome {
            JobOutcome::Completed(image) => {
                self.metrics.record_completed(elapsed);
                self.latest = Some((*active.record.spec(), image.clone()));
                self.last_error = None;
            }
            JobOutcome::Cancelled => {
                self.metrics.record_cancelled();
                self.last_error = None;
            }
            JobOutcome::Failed(message) => {
                self.metrics.record_failed();
                self.last_error = Some(message.clone());
            }
        }

        tracing::info!(
            "Job {} finished as {} after {:.2}s",
            active.record.id(),
            state,
            elapsed.as_secs_f32()
        );
        self.finished = Some(active.record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, Direction};
    use std::time::Duration;

    fn controller() -> GenerationController {
        GenerationController::new(
            Handle::current(),
            PreviewScaler::default(),
            GenerationSettings::default(),
            Arc::new(Metrics::new()),
        )
    }

    fn spec(width: u32, height: u32) -> GradientSpec {
        GradientSpec::linear(Direction::LeftToRight, Color::BLACK, Color::WHITE, width, height).unwrap()
    }

    async fn drain_until_terminal(controller: &mut GenerationController) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        for _ in 0..2000 {
            events.extend(controller.poll_events());
            if matches!(events.last(), Some(ControllerEvent::Finished(_))) {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("Job did not finish, events so far: {}", events.len());
    }

    #[tokio::test]
    async fn test_idle_controller() {
        let mut controller = controller();
        assert_eq!(controller.state(), JobState::Idle);
        assert_eq!(controller.status(), Status::Idle);
        assert!(!controller.cancel());
        assert_eq!(controller.poll_events().count(), 0);
        assert!(controller.needs_render(&spec(4, 4)));
    }

    #[tokio::test]
    async fn test_completed_job_is_retired() {
        let mut controller = controller();
        controller.submit(spec(32, 16), (16, 8)).unwrap();
        assert!(controller.is_busy());

        let events = drain_until_terminal(&mut controller).await;
        match events.last() {
            Some(ControllerEvent::Finished(JobOutcome::Completed(image))) => {
                assert_eq!(image.dimensions(), (32, 16))
            }
            other => panic!("Expected completion, got: {:?}", other),
        }

        assert!(!controller.is_busy());
        assert_eq!(controller.state(), JobState::Completed);
        assert_eq!(controller.status().to_string(), "Generation Completed");
        assert!(!controller.needs_render(&spec(32, 16)));
        assert!(controller.needs_render(&spec(32, 17)));
        assert_eq!(controller.history().len(), 1);
        assert_eq!(controller.poll_events().count(), 0);
    }

    #[tokio::test]
    async fn test_busy_until_terminal_is_polled() {
        let mut controller = controller();
        controller.submit(spec(8, 8), (8, 8)).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Finished on the worker, but not yet observed
        let rejected = controller.submit(spec(8, 8), (8, 8)).unwrap_err();
        assert_eq!(rejected, ControllerError::Busy);
        assert_eq!(Status::from(rejected), Status::Busy);

        drain_until_terminal(&mut controller).await;
        assert!(controller.submit(spec(8, 8), (8, 8)).is_ok());
    }

    #[tokio::test]
    async fn test_failure_leaves_controller_ready() {
        let mut controller = controller();
        controller.submit(spec(u32::MAX, u32::MAX), (10, 10)).unwrap();

        let events = drain_until_terminal(&mut controller).await;
        assert!(matches!(
            events.last(),
            Some(ControllerEvent::Finished(JobOutcome::Failed(_)))
        ));
        assert_eq!(controller.state(), JobState::Failed);
        assert!(controller.status().to_string().starts_with("Failed: "));
        assert!(controller.latest_image().is_none());
        assert!(controller.submit(spec(4, 4), (4, 4)).is_ok());
    }
}
