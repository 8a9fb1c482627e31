use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};
use shared::Prediction;

use crate::classifier::CLASS_LABELS;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("failed to re-encode image for display: {0}")]
    Encode(#[from] image::ImageError),
    #[error("classifier produced no probabilities")]
    EmptyProbabilities,
}

/// Index of the largest probability; exact ties resolve to the lowest index.
pub fn argmax(probabilities: &[f32]) -> Option<usize> {
    if probabilities.is_empty() {
        return None;
    }
    let mut best = 0;
    for (index, &p) in probabilities.iter().enumerate().skip(1) {
        if p > probabilities[best] {
            best = index;
        }
    }
    Some(best)
}

/// Base64 of the image re-encoded as JPEG, entirely in memory. JPEG carries
/// no alpha channel, so the image is flattened to RGB first.
pub fn encode_jpeg_base64(image: &DynamicImage) -> Result<String, FormatError> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)?;
    Ok(STANDARD.encode(&buffer))
}

/// Picks the top class and assembles the render-ready outcome around the
/// ORIGINAL (pre-resize) image.
pub fn format_prediction(
    probabilities: &[f32],
    image: &DynamicImage,
) -> Result<Prediction, FormatError> {
    let index = argmax(probabilities).ok_or(FormatError::EmptyProbabilities)?;
    let encoded = encode_jpeg_base64(image)?;

    Ok(Prediction {
        image_data_url: format!("data:image/jpeg;base64,{encoded}"),
        label: CLASS_LABELS[index].to_string(),
        confidence: probabilities[index],
        class_labels: CLASS_LABELS.iter().map(|label| label.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.2, 0.6, 0.1]), Some(2));
    }

    #[test]
    fn argmax_breaks_ties_toward_lowest_index() {
        assert_eq!(argmax(&[0.5, 0.5, 0.0, 0.0]), Some(0));
    }

    #[test]
    fn argmax_of_empty_is_none() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn data_url_round_trip_preserves_dimensions() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 10, Rgb([200, 100, 50])));
        let prediction = format_prediction(&[0.7, 0.1, 0.1, 0.1], &image).unwrap();

        assert!(prediction.image_data_url.starts_with("data:image/jpeg;base64,"));
        let payload = prediction
            .image_data_url
            .strip_prefix("data:image/jpeg;base64,")
            .unwrap();
        let decoded_bytes = STANDARD.decode(payload).unwrap();
        let decoded = image::load_from_memory(&decoded_bytes).unwrap();
        assert_eq!(decoded.width(), 20);
        assert_eq!(decoded.height(), 10);
    }

    #[test]
    fn prediction_carries_label_confidence_and_class_list() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));
        let prediction = format_prediction(&[0.05, 0.05, 0.8, 0.1], &image).unwrap();

        assert_eq!(prediction.label, "meadow");
        assert!((prediction.confidence - 0.8).abs() < f32::EPSILON);
        assert_eq!(prediction.class_labels, CLASS_LABELS.map(String::from).to_vec());
    }

    #[test]
    fn empty_probabilities_error_instead_of_panicking() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));
        assert!(matches!(
            format_prediction(&[], &image),
            Err(FormatError::EmptyProbabilities)
        ));
    }
}
