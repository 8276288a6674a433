use gallery_core::OutputLayout;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub layout: OutputLayout,
    /// Held across each read-merge-persist of the like store so concurrent
    /// `POST /save-likes` requests apply one after another.
    pub likes_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(gallery_dir: PathBuf) -> Self {
        Self {
            layout: OutputLayout::new(gallery_dir),
            likes_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn likes_path(&self) -> PathBuf {
        self.layout.likes_path()
    }
}
