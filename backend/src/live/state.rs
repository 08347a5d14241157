use std::sync::{Arc, RwLock};

use chrono::Utc;
use shared::ClassLabel;

use crate::inference::ClassificationResult;

/// Latest classification of the live feed. Cloning shares the same cell.
///
/// Values are replaced whole under the lock, so readers never see a partial
/// update. A poisoned lock still holds a complete value and is read through.
#[derive(Clone)]
pub struct LiveState {
    inner: Arc<RwLock<ClassificationResult>>,
}

impl LiveState {
    /// Starts at `NormalVideos` with zero confidence, stamped now.
    pub fn new() -> Self {
        Self::with_initial(ClassificationResult::new(
            ClassLabel::NormalVideos,
            0.0,
            Utc::now(),
        ))
    }

    pub fn with_initial(initial: ClassificationResult) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn snapshot(&self) -> ClassificationResult {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn publish(&self, result: ClassificationResult) {
        match self.inner.write() {
            Ok(mut guard) => *guard = result,
            Err(poisoned) => *poisoned.into_inner() = result,
        }
    }
}

impl Default for LiveState {
    fn default() -> Self {
        Self::new()
    }
}
