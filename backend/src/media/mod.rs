pub mod segments;
pub mod video;

use std::path::{Path, PathBuf};

use image::RgbImage;

pub use segments::{SegmentError, latest_segment};
pub use video::{FrameSource, OpenCvDecoder, VideoDecoder, VideoReader, last_frame};

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Failed to open video {path}")]
    Open { path: PathBuf },
    #[error("Video decode error: {0}")]
    Decode(#[from] opencv::Error),
    #[error("Decoded frame buffer does not match {width}x{height}")]
    FrameBuffer { width: u32, height: u32 },
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decodes a still image from disk into RGB.
pub fn read_image(path: &Path) -> Result<RgbImage, MediaError> {
    let image = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    Ok(image.to_rgb8())
}
