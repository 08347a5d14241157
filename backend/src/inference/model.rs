use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use shared::ClassLabel;
use strum::EnumCount;
use tch::{CModule, Device, Kind, Tensor};

use super::preprocess::{FrameBatch, INPUT_CHANNELS, INPUT_SIZE, PreprocessError};

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Preprocessing error: {0}")]
    Preprocessing(#[from] PreprocessError),
    #[error("Model error: {0}")]
    Model(#[from] tch::TchError),
    #[error("Model returned {actual} scores, expected {expected}")]
    OutputShape { expected: usize, actual: usize },
    #[error("Input batch is not contiguous")]
    NonContiguousInput,
    #[error("Model returned only NaN scores")]
    NanScores,
}

/// Anything that turns a preprocessed batch into per-class probabilities,
/// indexed like [`ClassLabel`].
pub trait FrameClassifier: Send + Sync {
    fn predict(&self, batch: &FrameBatch) -> Result<Vec<f32>, InferenceError>;
}

/// TorchScript export of the anomaly classifier. Loaded once; calls are
/// serialised through the module lock.
#[derive(Clone)]
pub struct Model {
    module: Arc<Mutex<CModule>>,
    device: Device,
}

impl Model {
    /// Loads the artifact and runs a warm-up pass to check that the output
    /// width matches the label set.
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        let device = Device::cuda_if_available();
        log::info!("Loading model from {} on {:?}", model_path.display(), device);

        let module = CModule::load_on_device(model_path, device)?;
        let model = Self {
            module: Arc::new(Mutex::new(module)),
            device,
        };

        let side = INPUT_SIZE as usize;
        let probe = FrameBatch::zeros((1, side, side, INPUT_CHANNELS));
        let scores = model.predict(&probe)?;
        if scores.len() != ClassLabel::COUNT {
            return Err(InferenceError::OutputShape {
                expected: ClassLabel::COUNT,
                actual: scores.len(),
            });
        }

        Ok(model)
    }
}

impl FrameClassifier for Model {
    fn predict(&self, batch: &FrameBatch) -> Result<Vec<f32>, InferenceError> {
        let (n, h, w, c) = batch.dim();
        let data = batch.as_slice().ok_or(InferenceError::NonContiguousInput)?;
        let input = Tensor::f_from_slice(data)?
            .f_view([n as i64, h as i64, w as i64, c as i64])?
            .f_to_device(self.device)?;

        // The module is still usable after a panic in another caller.
        let output = {
            let module = self.module.lock().unwrap_or_else(PoisonError::into_inner);
            tch::no_grad(|| module.forward_ts(&[input]))?
        };

        let output_flat = output
            .f_softmax(-1, Kind::Float)?
            .f_to_device(Device::Cpu)?
            .f_view([-1])?;
        let num_elements = output_flat.f_size()?.first().copied().unwrap_or(0) as usize;
        let mut output_vec = vec![0.0f32; num_elements];
        output_flat.f_copy_data(&mut output_vec, num_elements)?;
        Ok(output_vec)
    }
}

/// Arg-max over the scores. Ties keep the lowest index.
pub fn top_prediction(scores: &[f32]) -> Result<(ClassLabel, f32), InferenceError> {
    let mismatch = || InferenceError::OutputShape {
        expected: ClassLabel::COUNT,
        actual: scores.len(),
    };
    if scores.len() != ClassLabel::COUNT {
        return Err(mismatch());
    }

    let (index, confidence) = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .fold(None, |best: Option<(usize, f32)>, (i, score)| match best {
            Some((_, top)) if score <= top => best,
            _ => Some((i, score)),
        })
        .ok_or(InferenceError::NanScores)?;

    let label = ClassLabel::from_index(index).ok_or_else(mismatch)?;
    Ok((label, confidence))
}
