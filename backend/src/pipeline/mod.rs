pub mod decode;
pub mod format;
pub mod preprocess;

use shared::Prediction;

use crate::classifier::{Classifier, InferenceError};
use decode::DecodeError;
use format::FormatError;

/// A failure in any post-validation step of one request. Always local to
/// that request; the process keeps serving.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// The request pipeline after upload validation: decode, preprocess,
/// predict, format. Each step is fallible and short-circuits.
pub fn run(classifier: &dyn Classifier, bytes: &[u8]) -> Result<Prediction, PipelineError> {
    let image = decode::decode_image(bytes)?;
    let tensor = preprocess::preprocess(&image, classifier.input_height(), classifier.input_width());
    let probabilities = classifier.predict(&tensor)?;
    let prediction = format::format_prediction(&probabilities, &image)?;
    Ok(prediction)
}
