use std::collections::BTreeMap;
use std::fmt;

use shared::{ClassLabel, ClassifyResponse, UNABLE_TO_CLASSIFY};

/// Final answer for one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Label(ClassLabel),
    Unclassifiable,
}

impl Verdict {
    pub fn into_response(self) -> ClassifyResponse {
        ClassifyResponse {
            result: self.to_string(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Label(label) => write!(f, "{}", label),
            Verdict::Unclassifiable => f.write_str(UNABLE_TO_CLASSIFY),
        }
    }
}

/// Majority vote over per-frame labels.
///
/// `NormalVideos` only wins when every frame agrees on it; otherwise the most
/// frequent anomaly is reported, with ties going to the lowest class index.
pub fn aggregate(labels: &[ClassLabel]) -> Verdict {
    if labels.is_empty() {
        return Verdict::Unclassifiable;
    }

    let mut counts: BTreeMap<ClassLabel, usize> = BTreeMap::new();
    for label in labels.iter().filter(|label| !label.is_normal()) {
        *counts.entry(*label).or_default() += 1;
    }

    // BTreeMap walks labels in class-index order; only a strictly larger count replaces.
    let mut best: Option<(ClassLabel, usize)> = None;
    for (label, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((label, count));
        }
    }

    match best {
        Some((label, _)) => Verdict::Label(label),
        None => Verdict::Label(ClassLabel::NormalVideos),
    }
}
