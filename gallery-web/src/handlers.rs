use axum::{extract::State, Json};
use gallery_core::LikeStore;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// Current like counts, re-read from disk on every request.
pub async fn get_likes(State(state): State<AppState>) -> Result<Json<LikeStore>, ApiError> {
    let path = state.likes_path();
    let likes = tokio::task::spawn_blocking(move || LikeStore::read(&path)).await??;

    tracing::debug!("Serving {} like counts", likes.len());
    Ok(Json(likes))
}

/// Merges the client's full like map into the store. Incoming values
/// overwrite stored ones key by key; nothing is incremented server-side.
pub async fn save_likes(
    State(state): State<AppState>,
    Json(incoming): Json<LikeStore>,
) -> Result<Json<Value>, ApiError> {
    let _guard = state.likes_lock.lock().await;

    let path = state.likes_path();
    let received = incoming.len();
    let stored = tokio::task::spawn_blocking(move || {
        let mut likes = LikeStore::read(&path)?;
        likes.merge(incoming);
        likes.persist(&path)?;
        Ok::<_, gallery_core::GalleryError>(likes.len())
    })
    .await??;

    tracing::info!("Saved likes: {} received, {} stored", received, stored);
    Ok(Json(json!({})))
}
