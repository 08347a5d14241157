use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::Config;
use crate::inference::{ClassificationResult, FrameClassifier, InferenceError, classify_frame};
use crate::media::{MediaError, SegmentError, VideoDecoder, last_frame, latest_segment};

use super::state::LiveState;

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Segment(#[from] SegmentError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// What a single polling cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Published(ClassificationResult),
    NoSegment,
    NoFrame(PathBuf),
    Failed,
}

/// Background worker classifying the newest live segment.
///
/// Once spawned it runs on its own thread until the process exits. Every
/// cycle either publishes a fresh result to [`LiveState`] or leaves it as it
/// was; errors are logged and the next cycle starts after the usual interval.
pub struct LivePoller {
    classifier: Arc<dyn FrameClassifier>,
    decoder: Arc<dyn VideoDecoder>,
    state: LiveState,
    segments_dir: PathBuf,
    segment_extension: String,
    interval: Duration,
}

impl LivePoller {
    pub fn new(
        classifier: Arc<dyn FrameClassifier>,
        decoder: Arc<dyn VideoDecoder>,
        state: LiveState,
        config: &Config,
    ) -> Self {
        Self {
            classifier,
            decoder,
            state,
            segments_dir: config.segments_dir.clone(),
            segment_extension: config.segment_extension.clone(),
            interval: config.poll_interval,
        }
    }

    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        log::info!(
            "Starting live poller on {} every {:?}",
            self.segments_dir.display(),
            self.interval
        );
        thread::Builder::new()
            .name("live-poller".to_string())
            .spawn(move || self.run())
    }

    fn run(self) {
        loop {
            self.poll_once();
            thread::sleep(self.interval);
        }
    }

    /// Runs one cycle. Errors and panics are logged and reported as
    /// [`PollOutcome::Failed`]; the shared state is only touched on success.
    pub fn poll_once(&self) -> PollOutcome {
        let cycle = panic::catch_unwind(AssertUnwindSafe(|| self.classify_latest_segment()));
        match cycle {
            Ok(Ok(PollOutcome::Published(result))) => {
                self.state.publish(result);
                log::info!(
                    "New classification: {} (confidence: {:.2})",
                    result.label,
                    result.confidence
                );
                PollOutcome::Published(result)
            }
            Ok(Ok(outcome)) => {
                log::debug!("Live poll skipped: {:?}", outcome);
                outcome
            }
            Ok(Err(e)) => {
                log::error!("Error processing live segment: {}", e);
                PollOutcome::Failed
            }
            Err(_) => {
                log::error!("Live poll cycle panicked (recovered)");
                PollOutcome::Failed
            }
        }
    }

    fn classify_latest_segment(&self) -> Result<PollOutcome, PollError> {
        let Some(segment) = latest_segment(&self.segments_dir, &self.segment_extension)? else {
            return Ok(PollOutcome::NoSegment);
        };

        let frame = {
            let mut source = self.decoder.open(&segment)?;
            last_frame(source.as_mut())?
        };
        let Some(frame) = frame else {
            return Ok(PollOutcome::NoFrame(segment));
        };

        let result = classify_frame(self.classifier.as_ref(), &frame)?;
        Ok(PollOutcome::Published(result))
    }
}
