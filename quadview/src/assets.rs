use std::path::{Path, PathBuf};

use thiserror::Error;

/// Tightly packed RGB8 pixels with their decoded dimensions.
#[derive(Debug)]
pub struct PixelData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decodes an image file into RGB8.
///
/// The decoder result is checked here so a bad file fails setup instead of
/// reaching the GPU upload.
pub fn decode_rgb8(path: impl AsRef<Path>) -> Result<PixelData, AssetError> {
    let path = path.as_ref();

    let image = image::open(path)
        .map_err(|source| AssetError::DecodeFailed {
            path: path.to_owned(),
            source,
        })?
        .to_rgb8();

    let (width, height) = image.dimensions();

    Ok(PixelData {
        width,
        height,
        pixels: image.into_raw(),
    })
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot decode image {path:?}")]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_checkerboard(path: &Path) {
        let image = image::RgbImage::from_fn(8, 8, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgb([255, 255, 255])
            } else {
                image::Rgb([32, 64, 96])
            }
        });

        image.save(path).unwrap();
    }

    #[test]
    fn decoding_is_deterministic() {
        let path = std::env::temp_dir().join("quadview_decode_test.png");
        write_checkerboard(&path);

        let first = decode_rgb8(&path).unwrap();
        let second = decode_rgb8(&path).unwrap();

        assert_eq!((first.width, first.height), (8, 8));
        assert_eq!((second.width, second.height), (8, 8));
        assert_eq!(first.pixels.len(), 8 * 8 * 3);
        assert_eq!(first.pixels, second.pixels);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_reported() {
        let err = decode_rgb8("assets/does_not_exist.png").unwrap_err();

        let AssetError::DecodeFailed { path, .. } = err;
        assert_eq!(path, Path::new("assets/does_not_exist.png"));
    }
}
