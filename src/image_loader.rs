use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::error::CarouselError;
use crate::models::ImageSource;

/// RGBA8 pixels ready to become a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let format = image::guess_format(&bytes).ok();

    // Animated GIFs show their first frame.
    if format == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(Cursor::new(bytes))
            .with_context(|| format!("Failed to decode GIF: {:?}", path))?;
        let mut frames = decoder.into_frames();
        if let Some(frame) = frames.next() {
            let frame = frame.context("Failed to decode GIF frame")?;
            return Ok(DynamicImage::ImageRgba8(frame.into_buffer()));
        }
        return Err(anyhow!("GIF has no frames: {:?}", path));
    }

    match format {
        Some(fmt) => image::load_from_memory_with_format(&bytes, fmt)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
        None => image::load_from_memory(&bytes)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
    }
}

/// Decode and shrink to fit inside `max_width × max_height`, keeping aspect.
pub fn decode_slide(path: &Path, max_width: u32, max_height: u32) -> Result<DecodedImage> {
    let img = open_image(path)?;
    let resized = if img.width() > max_width || img.height() > max_height {
        img.thumbnail(max_width.max(1), max_height.max(1))
    } else {
        img
    };
    let (width, height) = resized.dimensions();
    Ok(DecodedImage {
        rgba: resized.to_rgba8().into_raw(),
        width: width.max(1),
        height: height.max(1),
    })
}

/// Decode any carousel source. Only local files are supported.
pub fn decode_source(
    source: &ImageSource,
    max_width: u32,
    max_height: u32,
) -> std::result::Result<DecodedImage, CarouselError> {
    match source {
        ImageSource::Path(path) => {
            decode_slide(path, max_width, max_height).map_err(|err| CarouselError::Decode {
                path: path.clone(),
                message: format!("{err:#}"),
            })
        }
        ImageSource::Url(url) => Err(CarouselError::UnsupportedSource(url.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_pixel(width, height, Rgba([0x1a, 0x80, 0xff, 0xff]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_decode_small_image_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "small.png", 8, 4);

        let decoded = decode_slide(&path, 64, 64).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 4));
        assert_eq!(decoded.rgba.len(), 8 * 4 * 4);
        assert_eq!(&decoded.rgba[..4], &[0x1a, 0x80, 0xff, 0xff]);
    }

    #[test]
    fn test_decode_large_image_fits_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "wide.png", 400, 100);

        let decoded = decode_slide(&path, 200, 200).unwrap();
        assert!(decoded.width <= 200);
        assert!(decoded.height <= 200);
        assert_eq!(decoded.width, 200);
        assert_eq!(decoded.height, 50);
    }

    #[test]
    fn test_decode_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.png");
        let err = decode_source(&ImageSource::Path(missing.clone()), 10, 10).unwrap_err();
        match err {
            CarouselError::Decode { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_remote_sources_unsupported() {
        let err = decode_source(&ImageSource::parse("https://example.com/a.png"), 10, 10)
            .unwrap_err();
        assert!(matches!(err, CarouselError::UnsupportedSource(_)));
    }

    #[test]
    fn test_garbage_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(decode_slide(&path, 10, 10).is_err());
    }
}
