use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, EnumString, FromRepr};

/// Verdict reported when a video yields no classifiable frames.
pub const UNABLE_TO_CLASSIFY: &str = "unable to classify the content.";

/// Anomaly classes in the model's output order. The discriminant is the
/// output index, so the declaration order must match training.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[repr(usize)]
pub enum ClassLabel {
    Abuse,
    Arrest,
    Arson,
    Assault,
    Burglary,
    Explosion,
    Fighting,
    #[default]
    NormalVideos,
    RoadAccident,
    Robbery,
    Shooting,
    Shoplifting,
    Stealing,
    Vandalism,
}

impl ClassLabel {
    pub fn from_index(index: usize) -> Option<Self> {
        Self::from_repr(index)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_normal(self) -> bool {
        self == ClassLabel::NormalVideos
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

/// Body of `GET /live-classification`. `timestamp` is seconds since the Unix epoch.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LiveClassification {
    pub result: ClassLabel,
    pub confidence: f32,
    pub timestamp: f64,
}

/// Body of a successful `POST /classify`: a label name or [`UNABLE_TO_CLASSIFY`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClassifyResponse {
    pub result: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
