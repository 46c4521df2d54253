use std::sync::Arc;

use backend::{ApiError, EnrollmentApi};
use chrono::{DateTime, Utc};
use learn_core::model::{EnrollmentId, LessonId, LessonProgressUpdate};
use learn_core::playback::to_whole_percentage;
use learn_core::{Clock, PlaybackSample, ProgressSettings};
use tokio::select;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

/// The last progress value the backend acknowledged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedProgress {
    pub percentage: f64,
    pub position: f64,
    pub saved_at: DateTime<Utc>,
}

/// Result of a single save tick.
#[derive(Debug)]
pub enum SaveOutcome {
    /// The change since the last save did not exceed the threshold.
    Skipped,
    Saved(SavedProgress),
    /// The backend refused or could not be reached. Logged and dropped.
    Failed(ApiError),
}

/// Pushes video playback progress upstream on a fixed period.
#[derive(Clone)]
pub struct ProgressReporter {
    enrollments: Arc<dyn EnrollmentApi>,
    settings: ProgressSettings,
    clock: Clock,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(
        enrollments: Arc<dyn EnrollmentApi>,
        settings: ProgressSettings,
        clock: Clock,
    ) -> Self {
        Self {
            enrollments,
            settings,
            clock,
        }
    }

    #[must_use]
    pub fn settings(&self) -> ProgressSettings {
        self.settings
    }

    /// One save tick: send `sample` if it moved more than the threshold away from
    /// `last_saved`.
    ///
    /// Failures are logged here and never retried; callers keep their previous
    /// `last_saved` value.
    pub async fn report(
        &self,
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
        sample: PlaybackSample,
        last_saved: f64,
    ) -> SaveOutcome {
        let percentage = sample.percentage();
        if !self.settings.should_save(percentage, last_saved) {
            return SaveOutcome::Skipped;
        }

        let update = LessonProgressUpdate {
            progress_percentage: to_whole_percentage(percentage),
            last_position: sample.current_time,
        };
        match self
            .enrollments
            .update_lesson_progress(enrollment_id, lesson_id, update)
            .await
        {
            Ok(()) => {
                debug!(%enrollment_id, %lesson_id, percentage, "lesson progress saved");
                SaveOutcome::Saved(SavedProgress {
                    percentage,
                    position: sample.current_time,
                    saved_at: self.clock.now(),
                })
            }
            Err(error) => {
                warn!(%enrollment_id, %lesson_id, %error, "failed to save lesson progress");
                SaveOutcome::Failed(error)
            }
        }
    }

    /// Spawn the save loop for one active video lesson.
    ///
    /// `initial_percentage` is the lesson's last known progress and serves as the
    /// first comparison point. The first tick fires one full period after start.
    /// Ticks before the first recorded sample are skipped, so a video that is
    /// opened but never played leaves the stored progress alone.
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn start(
        &self,
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
        initial_percentage: f64,
    ) -> ReportingHandle {
        let (samples_tx, samples_rx) = watch::channel(None::<PlaybackSample>);
        let (saved_tx, saved_rx) = watch::channel(None);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let reporter = self.clone();
        let period = self.settings.save_interval();

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last_saved = initial_percentage;
            debug!(%enrollment_id, %lesson_id, ?period, "progress save loop started");

            loop {
                select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        let latest = *samples_rx.borrow();
                        let Some(sample) = latest else {
                            continue;
                        };
                        let outcome = reporter
                            .report(enrollment_id, lesson_id, sample, last_saved)
                            .await;
                        if let SaveOutcome::Saved(saved) = outcome {
                            last_saved = saved.percentage;
                            saved_tx.send_replace(Some(saved));
                        }
                    }
                }
            }
            debug!(%enrollment_id, %lesson_id, "progress save loop stopped");
        });

        ReportingHandle {
            lesson_id,
            samples: samples_tx,
            saved: saved_rx,
            stop: Some(stop_tx),
            task: Some(task),
        }
    }
}

/// Owns a running save loop. Dropping the handle stops the loop.
///
/// A request already in flight is allowed to finish; the loop exits right after.
#[derive(Debug)]
pub struct ReportingHandle {
    lesson_id: LessonId,
    samples: watch::Sender<Option<PlaybackSample>>,
    saved: watch::Receiver<Option<SavedProgress>>,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ReportingHandle {
    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    /// Feed the latest playback position; only the newest sample is kept.
    pub fn record(&self, sample: PlaybackSample) {
        self.samples.send_replace(Some(sample));
    }

    #[must_use]
    pub fn last_saved(&self) -> Option<SavedProgress> {
        *self.saved.borrow()
    }

    /// Receiver that changes after every acknowledged save.
    #[must_use]
    pub fn saved(&self) -> watch::Receiver<Option<SavedProgress>> {
        self.saved.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Signal the loop to stop and wait for it to exit.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ReportingHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::InMemoryBackend;
    use learn_core::time::fixed_clock;
    use std::time::Duration;

    fn reporter(backend: &InMemoryBackend) -> ProgressReporter {
        ProgressReporter::new(
            Arc::new(backend.clone()),
            ProgressSettings::default(),
            fixed_clock(),
        )
    }

    #[tokio::test]
    async fn below_threshold_makes_no_call() {
        let backend = InMemoryBackend::new();
        let outcome = reporter(&backend)
            .report(
                EnrollmentId::new(1),
                LessonId::new(1),
                PlaybackSample::new(5.0, 100.0),
                0.0,
            )
            .await;
        assert!(matches!(outcome, SaveOutcome::Skipped));
        assert!(backend.calls().unwrap().is_empty());
    }

    #[tokio::test]
    async fn just_above_threshold_sends_rounded_percentage_and_position() {
        let backend = InMemoryBackend::new();
        let outcome = reporter(&backend)
            .report(
                EnrollmentId::new(1),
                LessonId::new(1),
                PlaybackSample::new(5.0001, 100.0),
                0.0,
            )
            .await;
        // Unknown enrollment in the fake is still recorded before it is rejected.
        assert!(matches!(outcome, SaveOutcome::Failed(_)));
        let updates = backend.progress_updates().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].progress_percentage, 5);
        assert!((updates[0].last_position - 5.0001).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_loop() {
        let backend = InMemoryBackend::new();
        let handle = reporter(&backend).start(EnrollmentId::new(1), LessonId::new(1), 0.0);
        handle.record(PlaybackSample::new(50.0, 100.0));
        drop(handle);

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert!(backend.calls().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_without_samples_send_nothing() {
        let backend = InMemoryBackend::new();
        let handle = reporter(&backend).start(EnrollmentId::new(1), LessonId::new(1), 40.0);

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert!(backend.calls().unwrap().is_empty());
        assert!(handle.last_saved().is_none());
    }
}
