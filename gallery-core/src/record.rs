use serde::{Deserialize, Serialize};

use crate::layout::THUMBNAILS_DIR;

pub const THUMBNAIL_PREFIX: &str = "thumb_";

/// One successfully processed source image.
///
/// Dimensions are those of the original file, not the thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub filename: String,
    pub thumbnail: String,
    pub width: u32,
    pub height: u32,
}

impl ImageRecord {
    pub fn new(filename: String, width: u32, height: u32) -> Self {
        Self {
            thumbnail: thumbnail_name(&filename),
            filename,
            width,
            height,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Thumbnail location relative to the gallery root, as referenced by the page.
    pub fn thumbnail_path(&self) -> String {
        format!("{THUMBNAILS_DIR}/{}", self.thumbnail)
    }

    /// Percent-encoded thumbnail URL, relative to the gallery root.
    pub fn thumbnail_url(&self) -> String {
        format!("{THUMBNAILS_DIR}/{}", urlencoding::encode(&self.thumbnail))
    }
}

pub fn thumbnail_name(filename: &str) -> String {
    format!("{THUMBNAIL_PREFIX}{filename}")
}
