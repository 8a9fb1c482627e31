use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::ClassifierLoadError;

/// Sidecar document written next to the TorchScript weights by the model
/// export step. TorchScript does not expose the traced input shape, so this
/// file is the model's declared input contract.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelMetadata {
    pub input_height: u32,
    pub input_width: u32,
    pub class_count: usize,
}

impl ModelMetadata {
    pub fn load(path: &Path) -> Result<Self, ClassifierLoadError> {
        let raw = fs::read_to_string(path)?;
        let metadata: ModelMetadata = serde_json::from_str(&raw)?;
        Ok(metadata)
    }
}
