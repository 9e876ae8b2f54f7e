use super::GenerationController;
use crate::services::generation::{JobOutcome, ProgressEvent};

/// One item drained from the controller's queues
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    Progress(ProgressEvent),
    /// Terminal outcome; nothing else follows it for that job
    Finished(JobOutcome),
}

/// Lazy, non-blocking drain returned by
/// [`GenerationController::poll_events`].
///
/// Yields queued progress events in order, then the terminal outcome once it
/// has arrived and every progress event sent before it has been yielded.
/// Retiring the job happens when the terminal item is yielded, so dropping
/// the iterator early loses nothing.
pub struct PollEvents<'a> {
    controller: &'a mut GenerationController,
    done: bool,
}

impl<'a> PollEvents<'a> {
    pub(super) fn new(controller: &'a mut GenerationController) -> Self {
        Self {
            controller,
            done: false,
        }
    }

    fn next_progress(&mut self) -> Option<ProgressEvent> {
        let active = self.controller.active.as_mut()?;
        let event = active.receivers.progress.try_recv().ok()?;
        active.record.record_progress(event.percent);
        Some(event)
    }
}

impl Iterator for PollEvents<'_> {
    type Item = ControllerEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(event) = self.next_progress() {
            if let Some(preview) = &event.preview {
                self.controller.remember_preview(preview);
            }
            return Some(ControllerEvent::Progress(event));
        }

        let Some(active) = self.controller.active.as_mut() else {
            self.done = true;
            return None;
        };

        if active.pending.is_none() {
            if !active.receive_outcome() {
                self.done = true;
                return None;
            }

            // The job sends all progress before its outcome
            if let Some(event) = self.next_progress() {
                if let Some(preview) = &event.preview {
                    self.controller.remember_preview(preview);
                }
                return Some(ControllerEvent::Progress(event));
            }
        }

        let outcome = self.controller.active.as_mut()?.pending.take()?;
        self.controller.finish(&outcome);
        self.done = true;
        Some(ControllerEvent::Finished(outcome))
    }
}
