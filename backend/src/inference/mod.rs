pub mod model;
pub mod preprocess;

use chrono::{DateTime, Utc};
use image::RgbImage;
use shared::{ClassLabel, LiveClassification};

pub use model::{FrameClassifier, InferenceError, Model, top_prediction};
pub use preprocess::preprocess_frame;

/// Outcome of classifying one frame. `confidence` is the top softmax score,
/// not a calibrated probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub label: ClassLabel,
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}

impl ClassificationResult {
    pub fn new(label: ClassLabel, confidence: f32, timestamp: DateTime<Utc>) -> Self {
        Self {
            label,
            confidence,
            timestamp,
        }
    }

    pub fn to_live_response(&self) -> LiveClassification {
        LiveClassification {
            result: self.label,
            confidence: self.confidence,
            timestamp: self.timestamp.timestamp_micros() as f64 / 1_000_000.0,
        }
    }
}

/// Preprocess, run and arg-max a single frame.
pub fn classify_frame(
    classifier: &dyn FrameClassifier,
    frame: &RgbImage,
) -> Result<ClassificationResult, InferenceError> {
    let batch = preprocess_frame(frame)?;
    let scores = classifier.predict(&batch)?;
    let (label, confidence) = top_prediction(&scores)?;
    Ok(ClassificationResult::new(label, confidence, Utc::now()))
}
