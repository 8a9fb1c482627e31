pub mod metadata;

use std::path::Path;
use std::sync::{Arc, Mutex};

use ndarray::Array4;
use tch::{CModule, Device, Tensor};

use metadata::ModelMetadata;

/// Category names in the exact order the model emits probabilities.
/// Index position here must match the training-time label order; the
/// adapter re-checks the output length on every prediction.
pub const CLASS_LABELS: [&str; 4] = ["desert", "forest", "meadow", "mountain"];

#[derive(Debug, thiserror::Error)]
pub enum ClassifierLoadError {
    #[error("failed to read model metadata: {0}")]
    Metadata(#[from] std::io::Error),
    #[error("malformed model metadata: {0}")]
    MetadataFormat(#[from] serde_json::Error),
    #[error("failed to load TorchScript module: {0}")]
    Torch(#[from] tch::TchError),
    #[error("model declares {declared} classes but the label set has {expected}")]
    ClassCountMismatch { declared: usize, expected: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("tensor has shape {got:?}, model expects (1, {height}, {width}, 3)")]
    BadShape {
        got: Vec<usize>,
        height: u32,
        width: u32,
    },
    #[error("model produced {got} probabilities for {expected} classes")]
    ClassCountMismatch { got: usize, expected: usize },
    #[error("model error: {0}")]
    Model(#[from] tch::TchError),
}

/// Seam between the request pipeline and the inference runtime. The process
/// wires in [`TorchClassifier`]; tests substitute a canned implementation.
pub trait Classifier: Send + Sync {
    fn input_height(&self) -> u32;
    fn input_width(&self) -> u32;

    /// Maps a `(1, H, W, 3)` tensor with values in `[0, 1]` to one softmax
    /// probability per entry of [`CLASS_LABELS`].
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

#[derive(Clone)]
pub struct TorchClassifier {
    module: Arc<Mutex<CModule>>,
    input_height: u32,
    input_width: u32,
}

impl TorchClassifier {
    /// Loads `model.pt` and its metadata sidecar from `model_dir`. Called
    /// once at startup; any failure here is fatal for the process.
    pub fn load(model_dir: &Path) -> Result<Self, ClassifierLoadError> {
        let metadata = ModelMetadata::load(&model_dir.join("metadata.json"))?;
        if metadata.class_count != CLASS_LABELS.len() {
            return Err(ClassifierLoadError::ClassCountMismatch {
                declared: metadata.class_count,
                expected: CLASS_LABELS.len(),
            });
        }

        let device = Device::cuda_if_available();
        let mut module = CModule::load_on_device(model_dir.join("model.pt"), device)?;
        // Inference only; freezes dropout/batch-norm so outputs are repeatable.
        module.set_eval();
        log::debug!(
            "Loaded TorchScript module from {} (input {}x{}, {} classes) on {:?}",
            model_dir.display(),
            metadata.input_width,
            metadata.input_height,
            metadata.class_count,
            device
        );

        Ok(Self {
            module: Arc::new(Mutex::new(module)),
            input_height: metadata.input_height,
            input_width: metadata.input_width,
        })
    }
}

impl Classifier for TorchClassifier {
    fn input_height(&self) -> u32 {
        self.input_height
    }

    fn input_width(&self) -> u32 {
        self.input_width
    }

    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let (batch, height, width, channels) = input.dim();
        if batch != 1
            || height != self.input_height as usize
            || width != self.input_width as usize
            || channels != 3
        {
            return Err(InferenceError::BadShape {
                got: input.shape().to_vec(),
                height: self.input_height,
                width: self.input_width,
            });
        }

        let pixels: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_slice(&pixels).view([1, height as i64, width as i64, 3]);

        let output = self.module.lock().unwrap().forward_ts(&[&tensor])?;
        let probabilities = output.softmax(-1, tch::Kind::Float);
        let flat = probabilities.to_kind(tch::Kind::Float).view([-1]);
        let count = flat.size()[0] as usize;
        let mut output_vec = vec![0.0f32; count];
        flat.copy_data(&mut output_vec, count);

        if output_vec.len() != CLASS_LABELS.len() {
            return Err(InferenceError::ClassCountMismatch {
                got: output_vec.len(),
                expected: CLASS_LABELS.len(),
            });
        }
        Ok(output_vec)
    }
}
