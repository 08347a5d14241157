//! Fakes for the model and the video decoder.
//!
//! Test frames are solid images whose red channel is `label index * 10`;
//! [`LabelFromRed`] reads that value back out of the preprocessed batch.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use image::{Rgb, RgbImage};
use shared::ClassLabel;
use strum::EnumCount;

use crate::inference::preprocess::FrameBatch;
use crate::inference::{FrameClassifier, InferenceError};
use crate::media::{FrameSource, MediaError, VideoDecoder};

pub fn frame_for(label: ClassLabel) -> RgbImage {
    RgbImage::from_pixel(32, 24, Rgb([(label.index() * 10) as u8, 0, 0]))
}

pub fn frames_of(label: ClassLabel, count: usize) -> Vec<RgbImage> {
    vec![frame_for(label); count]
}

pub struct LabelFromRed;

impl LabelFromRed {
    pub const CONFIDENCE: f32 = 0.9;
}

impl FrameClassifier for LabelFromRed {
    fn predict(&self, batch: &FrameBatch) -> Result<Vec<f32>, InferenceError> {
        let red = (batch[[0, 0, 0, 0]] + 1.0) * 127.5;
        let index = ((red / 10.0).round() as usize).min(ClassLabel::COUNT - 1);

        let rest = (1.0 - Self::CONFIDENCE) / (ClassLabel::COUNT - 1) as f32;
        let mut scores = vec![rest; ClassLabel::COUNT];
        scores[index] = Self::CONFIDENCE;
        Ok(scores)
    }
}

/// Panics on its first prediction, then behaves like [`LabelFromRed`].
#[derive(Default)]
pub struct PanicsOnce {
    panicked: AtomicBool,
}

impl FrameClassifier for PanicsOnce {
    fn predict(&self, batch: &FrameBatch) -> Result<Vec<f32>, InferenceError> {
        if !self.panicked.swap(true, Ordering::SeqCst) {
            panic!("simulated backend failure");
        }
        LabelFromRed.predict(batch)
    }
}

pub struct ScriptedFrames {
    frames: std::vec::IntoIter<RgbImage>,
}

impl ScriptedFrames {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for ScriptedFrames {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, MediaError> {
        Ok(self.frames.next())
    }
}

/// Decoder that plays the same frames for whatever path it is given.
pub struct ScriptedDecoder {
    frames: Vec<RgbImage>,
}

impl ScriptedDecoder {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self { frames }
    }
}

impl VideoDecoder for ScriptedDecoder {
    fn open(&self, _path: &Path) -> Result<Box<dyn FrameSource>, MediaError> {
        Ok(Box::new(ScriptedFrames::new(self.frames.clone())))
    }
}

pub struct FailingDecoder;

impl VideoDecoder for FailingDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, MediaError> {
        Err(MediaError::Open {
            path: path.to_path_buf(),
        })
    }
}

/// Fails the first `failures` opens, then plays the scripted frames.
pub struct FlakyDecoder {
    failures: AtomicUsize,
    frames: Vec<RgbImage>,
}

impl FlakyDecoder {
    pub fn new(failures: usize, frames: Vec<RgbImage>) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            frames,
        }
    }

    pub fn remaining_failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }
}

impl VideoDecoder for FlakyDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, MediaError> {
        let failed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return FailingDecoder.open(path);
        }
        Ok(Box::new(ScriptedFrames::new(self.frames.clone())))
    }
}
