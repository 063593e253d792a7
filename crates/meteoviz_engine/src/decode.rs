use std::io::Cursor;

use image::io::Reader as ImageReader;
use thiserror::Error;

use crate::ImageInfo;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unrecognised image format")]
    UnknownFormat,
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode fetched bytes fully so a truncated or corrupt body is caught before
/// the image is reported displayable.
pub fn inspect_image(bytes: &[u8]) -> Result<ImageInfo, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format().ok_or(DecodeError::UnknownFormat)?;
    let decoded = reader.decode()?;
    Ok(ImageInfo {
        format: format!("{format:?}").to_ascii_lowercase(),
        width: decoded.width(),
        height: decoded.height(),
        byte_len: bytes.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut buf, ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn reports_png_dimensions() {
        let bytes = png_bytes(4, 3);
        let info = inspect_image(&bytes).unwrap();
        assert_eq!(info.format, "png");
        assert_eq!((info.width, info.height), (4, 3));
        assert_eq!(info.byte_len, bytes.len() as u64);
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = inspect_image(b"<html>not an image</html>").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownFormat));
    }

    #[test]
    fn rejects_truncated_png() {
        let bytes = png_bytes(32, 32);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(inspect_image(truncated).is_err());
    }
}
