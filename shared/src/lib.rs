use serde::{Deserialize, Serialize};

/// Outcome of one classification request, ready for rendering.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Prediction {
    /// The submitted image re-encoded as a `data:image/jpeg;base64,...` URL,
    /// usable directly as an `<img>` source.
    pub image_data_url: String,
    pub label: String,
    pub confidence: f32,
    pub class_labels: Vec<String>,
}
