use image::DynamicImage;
use image::imageops::{self, FilterType};
use ndarray::Array4;

/// Turns a decoded image of arbitrary size and color mode into the
/// `(1, H, W, 3)` float tensor the classifier was trained on, values
/// scaled to `[0, 1]`.
///
/// Order matters for reproducibility: RGB conversion, then a Lanczos3
/// force-resize to `(width, height)` (never crop or pad), then the `1/255`
/// scale, then the leading batch axis.
pub fn preprocess(image: &DynamicImage, height: u32, width: u32) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let resized = imageops::resize(&rgb, width, height, FilterType::Lanczos3);

    let mut tensor = Array4::<f32>::zeros((1, height as usize, width as usize, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for channel in 0..3 {
            tensor[[0, y as usize, x as usize, channel]] = f32::from(pixel[channel]) / 255.0;
        }
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn output_shape_is_fixed_regardless_of_input_dimensions() {
        for (w, h) in [(1, 1), (300, 400), (640, 480), (31, 997)] {
            let tensor = preprocess(&solid(w, h, [0, 0, 0]), 128, 160);
            assert_eq!(tensor.dim(), (1, 128, 160, 3));
        }
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let tensor = preprocess(&solid(37, 53, [255, 0, 128]), 64, 64);
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn solid_color_maps_to_expected_channel_values() {
        let tensor = preprocess(&solid(300, 400, [255, 0, 0]), 32, 32);
        for y in 0..32 {
            for x in 0..32 {
                assert!((tensor[[0, y, x, 0]] - 1.0).abs() < 1e-3);
                assert!(tensor[[0, y, x, 1]].abs() < 1e-3);
                assert!(tensor[[0, y, x, 2]].abs() < 1e-3);
            }
        }
    }

    #[test]
    fn alpha_images_are_flattened_to_three_channels() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 10, Rgba([0, 255, 0, 200])));
        let tensor = preprocess(&rgba, 16, 16);
        assert_eq!(tensor.dim(), (1, 16, 16, 3));
        assert!((tensor[[0, 8, 8, 1]] - 1.0).abs() < 1e-3);
    }
}
