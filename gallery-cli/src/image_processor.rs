use gallery_core::{ImageRecord, ThumbnailSize};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, GenericImageView};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

const JPEG_QUALITY: u8 = 95;
const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode thumbnail {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a usable file name: {}", .0.display())]
    InvalidName(PathBuf),
}

/// Decodes `path`, writes its thumbnail into `thumbnails_dir` and returns the
/// record for the original image.
pub fn process_image(
    path: &Path,
    thumbnails_dir: &Path,
    bounds: ThumbnailSize,
) -> Result<ImageRecord, ProcessError> {
    tracing::debug!("Processing image: {}", path.display());

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ProcessError::InvalidName(path.to_path_buf()))?
        .to_string();

    let img = image::open(path).map_err(|source| ProcessError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = img.dimensions();
    let thumbnail = create_thumbnail(&img, bounds);

    let record = ImageRecord::new(filename, width, height);
    save_thumbnail(&thumbnail, &thumbnails_dir.join(&record.thumbnail))?;

    Ok(record)
}

/// Target size for a thumbnail. Landscape images take the full box width,
/// everything else the full box height, and the other side follows the
/// aspect ratio. If that side still overflows a non-square box, both sides
/// shrink together.
pub fn thumbnail_dimensions(width: u32, height: u32, bounds: ThumbnailSize) -> (u32, u32) {
    let aspect_ratio = f64::from(width) / f64::from(height.max(1));
    let (max_width, max_height) = (f64::from(bounds.width), f64::from(bounds.height));

    let (thumb_width, thumb_height) = if aspect_ratio > 1.0 {
        (max_width, (max_width / aspect_ratio).round())
    } else {
        ((max_height * aspect_ratio).round(), max_height)
    };

    let scale = (max_width / thumb_width.max(1.0))
        .min(max_height / thumb_height.max(1.0))
        .min(1.0);

    (
        ((thumb_width * scale).round() as u32).max(1),
        ((thumb_height * scale).round() as u32).max(1),
    )
}

fn create_thumbnail(img: &DynamicImage, bounds: ThumbnailSize) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (thumb_width, thumb_height) = thumbnail_dimensions(width, height, bounds);

    // Only shrink; `resize` fits inside the box and keeps the aspect ratio
    if width > thumb_width || height > thumb_height {
        img.resize(bounds.width, bounds.height, FilterType::Lanczos3)
    } else {
        img.clone()
    }
}

fn save_thumbnail(img: &DynamicImage, path: &Path) -> Result<(), ProcessError> {
    let encode_err = |source| ProcessError::Encode {
        path: path.to_path_buf(),
        source,
    };

    if is_jpeg_file(path) {
        let file = File::create(path).map_err(|source| ProcessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
        DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(encoder)
            .map_err(encode_err)
    } else {
        img.save(path).map_err(encode_err)
    }
}

pub fn is_image_file(path: &Path) -> bool {
    extension(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_jpeg_file(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("jpg" | "jpeg"))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}
