use std::path::{Path, PathBuf};

use image::RgbImage;
use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use super::MediaError;

/// Sequential frame reader. `Ok(None)` marks the end of the stream.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, MediaError>;
}

/// Opens video files for decoding.
pub trait VideoDecoder: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, MediaError>;
}

/// [`VideoDecoder`] backed by OpenCV's `VideoCapture`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCvDecoder;

impl VideoDecoder for OpenCvDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, MediaError> {
        Ok(Box::new(VideoReader::open(path)?))
    }
}

pub struct VideoReader {
    capture: VideoCapture,
    path: PathBuf,
}

impl VideoReader {
    pub fn open(path: &Path) -> Result<Self, MediaError> {
        let open_error = || MediaError::Open {
            path: path.to_path_buf(),
        };
        let path_str = path.to_str().ok_or_else(open_error)?;

        let capture = VideoCapture::from_file(path_str, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(open_error());
        }

        Ok(Self {
            capture,
            path: path.to_path_buf(),
        })
    }
}

impl FrameSource for VideoReader {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, MediaError> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        bgr_mat_to_rgb(&frame).map(Some)
    }
}

impl Drop for VideoReader {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            log::warn!("Failed to release capture for {}: {}", self.path.display(), e);
        }
    }
}

fn bgr_mat_to_rgb(frame: &Mat) -> Result<RgbImage, MediaError> {
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(frame, &mut rgb, imgproc::COLOR_BGR2RGB)?;

    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let data = rgb.data_bytes()?.to_vec();
    RgbImage::from_raw(width, height, data).ok_or(MediaError::FrameBuffer { width, height })
}

/// Drains the source and keeps the final decodable frame.
pub fn last_frame(source: &mut dyn FrameSource) -> Result<Option<RgbImage>, MediaError> {
    let mut last = None;
    while let Some(frame) = source.next_frame()? {
        last = Some(frame);
    }
    Ok(last)
}
