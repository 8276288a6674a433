use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "index.html";
pub const LIKES_FILE: &str = "likes.json";
pub const THUMBNAILS_DIR: &str = "thumbnails";

/// Where everything lives inside a built gallery directory.
///
/// ```text
/// <root>/
/// ├── index.html
/// ├── likes.json
/// ├── <original images>
/// └── thumbnails/thumb_<original filename>
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn likes_path(&self) -> PathBuf {
        self.root.join(LIKES_FILE)
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.root.join(THUMBNAILS_DIR)
    }

    pub fn thumbnail_path(&self, thumbnail_name: &str) -> PathBuf {
        self.thumbnails_dir().join(thumbnail_name)
    }

    pub fn original_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }
}
