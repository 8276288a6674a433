pub mod config;
pub mod error;
pub mod layout;
pub mod likes;
pub mod page;
pub mod record;

pub use config::{GalleryBuildConfig, ThumbnailSize};
pub use error::{GalleryError, Result};
pub use layout::OutputLayout;
pub use likes::LikeStore;
pub use record::ImageRecord;
