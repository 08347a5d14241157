use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::Array4;

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 64;
pub const INPUT_CHANNELS: usize = 3;

/// One-item `NHWC` batch ready for the classifier.
pub type FrameBatch = Array4<f32>;

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("Invalid frame: {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },
}

/// Resizes a frame to the model input size and applies the MobileNet rescale
/// (`x / 127.5 - 1`, so pixels land in `[-1, 1]`).
pub fn preprocess_frame(frame: &RgbImage) -> Result<FrameBatch, PreprocessError> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(PreprocessError::InvalidFrame { width, height });
    }

    let resized = imageops::resize(frame, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let side = INPUT_SIZE as usize;
    let mut batch = FrameBatch::zeros((1, side, side, INPUT_CHANNELS));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for channel in 0..INPUT_CHANNELS {
            batch[[0, y as usize, x as usize, channel]] = rescale(pixel[channel]);
        }
    }

    Ok(batch)
}

fn rescale(value: u8) -> f32 {
    value as f32 / 127.5 - 1.0
}
