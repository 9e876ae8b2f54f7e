// Job lifecycle state
//
// This module holds the RenderJob record owned by the GenerationController and
// the state machine it moves through. It also renders user-facing status text.
// Nothing here is shared with the worker thread; the job only sees its spec,
// its cancellation token and its queues.

use crate::models::GradientSpec;
use crate::services::generation::{CancellationToken, JobOutcome};
use std::fmt;

/// Lifecycle of one render job
///
/// ```text
/// Idle -> Running -> Completed
///                 -> Cancelled
///                 -> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl JobState {
    pub fn is_running(&self) -> bool {
        matches!(self, JobState::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Cancelled | JobState::Failed)
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Idle, JobState::Running)
                | (JobState::Running, JobState::Completed)
                | (JobState::Running, JobState::Cancelled)
                | (JobState::Running, JobState::Failed)
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Idle => "idle",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Cancelled => "cancelled",
            JobState::Failed => "failed",
        };
        f.write_str(name)
    }
}

impl From<&JobOutcome> for JobState {
    fn from(outcome: &JobOutcome) -> Self {
        match outcome {
            JobOutcome::Completed(_) => JobState::Completed,
            JobOutcome::Cancelled => JobState::Cancelled,
            JobOutcome::Failed(_) => JobState::Failed,
        }
    }
}

/// The controller's record of one in-flight or finished generation
#[derive(Debug, Clone)]
pub struct RenderJob {
    id: u64,
    spec: GradientSpec,
    token: CancellationToken,
    state: JobState,
    percent: u8,
}

impl RenderJob {
    /// A new record, already moved from `Idle` to `Running`
    pub fn start(id: u64, spec: GradientSpec, token: CancellationToken) -> Self {
        let mut job = Self {
            id,
            spec,
            token,
            state: JobState::Idle,
            percent: 0,
        };
        job.transition(JobState::Running);
        job
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn spec(&self) -> &GradientSpec {
        &self.spec
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Move to `next` if the state machine allows it.
    ///
    /// Returns false and leaves the state untouched otherwise.
    pub fn transition(&mut self, next: JobState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                "Ignoring invalid job transition {} -> {} (job {})",
                self.state,
                next,
                self.id
            );
            return false;
        }
        tracing::debug!("Job {}: {} -> {}", self.id, self.state, next);
        self.state = next;
        true
    }

    pub fn record_progress(&mut self, percent: u8) {
        if self.state.is_running() {
            self.percent = self.percent.max(percent.min(100));
        }
    }

    /// Apply a terminal outcome and return the resulting state
    pub fn finish(&mut self, outcome: &JobOutcome) -> JobState {
        if self.transition(JobState::from(outcome)) && self.state == JobState::Completed {
            self.percent = 100;
        }
        self.state
    }
}

/// User-facing status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Generating(u8),
    Busy,
    Cancelling,
    Cancelled,
    Failed(String),
    Completed,
}

impl Status {
    /// Status describing a job record
    pub fn of(job: &RenderJob, last_error: Option<&str>) -> Self {
        match job.state() {
            JobState::Idle => Status::Idle,
            JobState::Running if job.cancel_requested() => Status::Cancelling,
            JobState::Running => Status::Generating(job.percent()),
            JobState::Completed => Status::Completed,
            JobState::Cancelled => Status::Cancelled,
            JobState::Failed => Status::Failed(last_error.unwrap_or("unknown error").to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => f.write_str("Ready"),
            Status::Generating(0) => f.write_str("Starting generation..."),
            Status::Generating(percent) => write!(f, "Generating... {}%", percent),
            Status::Busy => f.write_str("Already generating an image, please wait or cancel"),
            Status::Cancelling => f.write_str("Cancelling..."),
            Status::Cancelled => f.write_str("Generation cancelled"),
            Status::Failed(message) => write!(f, "Failed: {}", message),
            Status::Completed => f.write_str("Generation Completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, Direction};

    fn record() -> RenderJob {
        let spec =
            GradientSpec::linear(Direction::LeftToRight, Color::BLACK, Color::WHITE, 4, 4).unwrap();
        RenderJob::start(1, spec, CancellationToken::new())
    }

    #[test]
    fn test_transitions() {
        assert!(JobState::Idle.can_transition_to(JobState::Running));
        assert!(JobState::Running.can_transition_to(JobState::Cancelled));
        assert!(!JobState::Idle.can_transition_to(JobState::Completed));
        assert!(!JobState::Completed.can_transition_to(JobState::Running));
        assert!(!JobState::Cancelled.can_transition_to(JobState::Failed));
    }

    #[test]
    fn test_start_is_running() {
        let job = record();
        assert_eq!(job.state(), JobState::Running);
        assert_eq!(Status::of(&job, None), Status::Generating(0));
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut job = record();
        job.record_progress(20);
        job.record_progress(10);
        assert_eq!(job.percent(), 20);
        assert_eq!(Status::of(&job, None).to_string(), "Generating... 20%");
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut job = record();
        assert_eq!(job.finish(&JobOutcome::Cancelled), JobState::Cancelled);
        assert_eq!(job.finish(&JobOutcome::Failed("late".into())), JobState::Cancelled);
        assert!(job.state().is_terminal());

        job.record_progress(90);
        assert_eq!(job.percent(), 0);
    }

    #[test]
    fn test_cancel_request_shows_in_status() {
        let job = record();
        job.token().cancel();
        assert_eq!(Status::of(&job, None), Status::Cancelling);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(Status::Failed("out of memory".into()).to_string(), "Failed: out of memory");
        assert_eq!(Status::Completed.to_string(), "Generation Completed");
        assert_eq!(Status::Cancelled.to_string(), "Generation cancelled");
        assert!(Status::Busy.to_string().contains("Already generating"));
    }
}
