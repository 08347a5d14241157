use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::ClassLabel;
use uuid::Uuid;

use super::ClassifyError;
use super::aggregate::{Verdict, aggregate};
use crate::inference::{FrameClassifier, classify_frame};
use crate::media::{FrameSource, VideoDecoder, read_image};

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_filename(filename: &str) -> Self {
        let is_video = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                VIDEO_EXTENSIONS
                    .iter()
                    .any(|video| ext.eq_ignore_ascii_case(video))
            });
        if is_video { MediaKind::Video } else { MediaKind::Image }
    }
}

/// Uploaded bytes on disk, removed when the guard goes out of scope.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Creates `<dir>/<uuid>-<sanitized name>` and returns it opened for writing.
    pub fn create(dir: &Path, original_name: &str) -> io::Result<(Self, File)> {
        let name = format!("{}-{}", Uuid::new_v4(), sanitize_filename(original_name));
        let path = dir.join(name);
        let file = File::create(&path)?;
        Ok((Self { path }, file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove upload {}: {}", self.path.display(), e),
        }
    }
}

/// Reduces a client-supplied name to `[A-Za-z0-9._-]` without leading dots.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Classifies uploaded images and videos.
#[derive(Clone)]
pub struct UploadClassifier {
    classifier: Arc<dyn FrameClassifier>,
    decoder: Arc<dyn VideoDecoder>,
    sample_stride: u64,
}

impl UploadClassifier {
    pub fn new(
        classifier: Arc<dyn FrameClassifier>,
        decoder: Arc<dyn VideoDecoder>,
        sample_stride: u64,
    ) -> Self {
        Self {
            classifier,
            decoder,
            sample_stride: sample_stride.max(1),
        }
    }

    /// Stores `data` as a scratch file in `dir`, classifies it and removes it again.
    pub fn classify_upload(
        &self,
        dir: &Path,
        filename: &str,
        kind: MediaKind,
        data: &[u8],
    ) -> Result<Verdict, ClassifyError> {
        let (scratch, mut file) = ScratchFile::create(dir, filename)?;
        file.write_all(data)?;
        file.flush()?;
        drop(file);
        self.classify_file(scratch.path(), kind)
    }

    pub fn classify_file(&self, path: &Path, kind: MediaKind) -> Result<Verdict, ClassifyError> {
        let labels = match kind {
            MediaKind::Image => {
                let frame = read_image(path)?;
                vec![classify_frame(self.classifier.as_ref(), &frame)?.label]
            }
            MediaKind::Video => {
                let mut source = self.decoder.open(path)?;
                sample_labels(source.as_mut(), self.classifier.as_ref(), self.sample_stride)?
            }
        };
        Ok(aggregate(&labels))
    }
}

/// Classifies every `stride`-th frame, counting frames from one.
pub fn sample_labels(
    source: &mut dyn FrameSource,
    classifier: &dyn FrameClassifier,
    stride: u64,
) -> Result<Vec<ClassLabel>, ClassifyError> {
    let mut frame_count = 0u64;
    let mut labels = Vec::new();
    while let Some(frame) = source.next_frame()? {
        frame_count += 1;
        if frame_count % stride == 0 {
            labels.push(classify_frame(classifier, &frame)?.label);
        }
    }
    Ok(labels)
}
