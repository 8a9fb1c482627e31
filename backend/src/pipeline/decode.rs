use image::DynamicImage;

/// Raster formats accepted for upload, compared case-insensitively against
/// the substring after the last dot of the filename.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unsupported or corrupt image data: {0}")]
    Malformed(#[from] image::ImageError),
}

/// A filename without a dot, or whose last suffix is not allow-listed,
/// is rejected before any decode is attempted.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, suffix)) => {
            let suffix = suffix.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&suffix.as_str())
        }
        None => false,
    }
}

/// Decodes uploaded bytes fully in memory; nothing touches the filesystem.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    Ok(image::load_from_memory(bytes)?)
}
