use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GalleryError, Result};

pub const DEFAULT_THUMBNAIL_SIZE: u32 = 400;
pub const DEFAULT_COLUMNS: u32 = 3;
pub const DEFAULT_IMAGES_PER_PAGE: usize = 12;
pub const DEFAULT_TITLE: &str = "Image Gallery";

/// Bounding box a thumbnail must fit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self::square(DEFAULT_THUMBNAIL_SIZE)
    }
}

impl fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Accepts `"WIDTHxHEIGHT"` or a single number for a square box.
impl FromStr for ThumbnailSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid thumbnail dimension '{part}': {e}"))
        };

        match s.split_once(|c: char| c == 'x' || c == 'X') {
            Some((width, height)) => Ok(Self::new(parse(width)?, parse(height)?)),
            None => Ok(Self::square(parse(s)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryBuildConfig {
    pub title: String,
    pub thumbnail_max_size: ThumbnailSize,
    /// Accepted for compatibility; the CSS grid is responsive and ignores it.
    pub columns: u32,
    pub images_per_page: usize,
}

impl Default for GalleryBuildConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            thumbnail_max_size: ThumbnailSize::default(),
            columns: DEFAULT_COLUMNS,
            images_per_page: DEFAULT_IMAGES_PER_PAGE,
        }
    }
}

impl GalleryBuildConfig {
    pub fn validate(&self) -> Result<()> {
        if self.thumbnail_max_size.width == 0 || self.thumbnail_max_size.height == 0 {
            return Err(GalleryError::InvalidConfig(format!(
                "thumbnail size must be non-zero, got {}",
                self.thumbnail_max_size
            )));
        }

        if self.images_per_page == 0 {
            return Err(GalleryError::InvalidConfig(
                "images per page must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_box_and_square_sizes() {
        assert_eq!("640x480".parse::<ThumbnailSize>(), Ok(ThumbnailSize::new(640, 480)));
        assert_eq!("200X100".parse::<ThumbnailSize>(), Ok(ThumbnailSize::new(200, 100)));
        assert_eq!("300".parse::<ThumbnailSize>(), Ok(ThumbnailSize::square(300)));
        assert!("x200".parse::<ThumbnailSize>().is_err());
        assert!("wide".parse::<ThumbnailSize>().is_err());
    }

    #[test]
    fn default_config_is_valid() {
        let config = GalleryBuildConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thumbnail_max_size, ThumbnailSize::new(400, 400));
        assert_eq!(config.images_per_page, 12);
    }

    #[test]
    fn rejects_zero_page_size_and_empty_box() {
        let config = GalleryBuildConfig {
            images_per_page: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GalleryError::InvalidConfig(_))
        ));

        let config = GalleryBuildConfig {
            thumbnail_max_size: ThumbnailSize::new(0, 100),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_config_falls_back_to_defaults() {
        let config: GalleryBuildConfig =
            serde_json::from_str(r#"{"images_per_page": 3}"#).unwrap();
        assert_eq!(config.images_per_page, 3);
        assert_eq!(config.title, DEFAULT_TITLE);
    }
}
