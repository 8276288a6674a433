use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::config::GalleryBuildConfig;
use crate::error::{GalleryError, Result};
use crate::layout::OutputLayout;
use crate::likes::LikeStore;
use crate::record::ImageRecord;

const TEMPLATE: &str = include_str!("../templates/gallery.html");

/// Tiles above this aspect ratio span two grid columns.
pub const WIDE_ASPECT_RATIO: f64 = 1.7;

/// Horizontal swipe needed in the lightbox, in pixels or pixels per millisecond.
pub const SWIPE_DISTANCE_PX: u32 = 50;
pub const SWIPE_VELOCITY_PX_PER_MS: f64 = 0.5;

/// Page arithmetic shared by the renderer and the page script. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    item_count: usize,
    per_page: usize,
}

impl Pagination {
    pub fn new(item_count: usize, per_page: usize) -> Self {
        Self {
            item_count,
            per_page: per_page.max(1),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.item_count.div_ceil(self.per_page)
    }

    /// Page requests outside `1..=total_pages` land on the nearest valid page.
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages().max(1))
    }

    pub fn page_of(&self, index: usize) -> usize {
        index / self.per_page + 1
    }

    pub fn page_range(&self, page: usize) -> Range<usize> {
        let page = self.clamp(page);
        let start = ((page - 1) * self.per_page).min(self.item_count);
        let end = (start + self.per_page).min(self.item_count);
        start..end
    }

    pub fn has_prev(&self, page: usize) -> bool {
        self.clamp(page) > 1
    }

    pub fn has_next(&self, page: usize) -> bool {
        self.clamp(page) < self.total_pages()
    }
}

/// Lightbox "next" with wraparound. `count` must be non-zero.
pub fn next_index(index: usize, count: usize) -> usize {
    (index + 1) % count
}

/// Lightbox "previous" with wraparound. `count` must be non-zero.
pub fn prev_index(index: usize, count: usize) -> usize {
    (index + count - 1) % count
}

pub fn is_wide(record: &ImageRecord) -> bool {
    record.aspect_ratio() > WIDE_ASPECT_RATIO
}

/// Per-image data embedded in the page script.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TileData<'a> {
    index: usize,
    filename: &'a str,
    thumbnail: String,
    #[serde(skip)]
    thumbnail_url: String,
    width: u32,
    height: u32,
    aspect_ratio: f64,
    wide: bool,
    page: usize,
    prev: usize,
    next: usize,
}

/// Renders the complete gallery document.
pub fn render(records: &[ImageRecord], likes: &LikeStore, config: &GalleryBuildConfig) -> String {
    let count = records.len();
    let pagination = Pagination::new(count, config.images_per_page);

    let tiles: Vec<TileData> = records
        .iter()
        .enumerate()
        .map(|(index, record)| TileData {
            index,
            filename: &record.filename,
            thumbnail: record.thumbnail_path(),
            thumbnail_url: record.thumbnail_url(),
            width: record.width,
            height: record.height,
            aspect_ratio: record.aspect_ratio(),
            wide: is_wide(record),
            page: pagination.page_of(index),
            prev: prev_index(index, count),
            next: next_index(index, count),
        })
        .collect();

    let like_counts: BTreeMap<&str, u64> = records
        .iter()
        .map(|record| (record.filename.as_str(), likes.count(&record.filename)))
        .collect();

    let tiles_html = tiles
        .iter()
        .map(|tile| render_tile(tile, like_counts.get(tile.filename).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join("\n");

    let disabled = |flag: bool| if flag { "" } else { " disabled" };

    fill(
        TEMPLATE,
        &[
            ("title", html_escape(&config.title)),
            ("image_count", count.to_string()),
            ("tiles", tiles_html),
            ("total_pages", pagination.total_pages().to_string()),
            ("prev_disabled", disabled(pagination.has_prev(1)).to_string()),
            ("next_disabled", disabled(pagination.has_next(1)).to_string()),
            ("images_per_page", pagination.per_page.to_string()),
            ("images_json", script_json(&tiles, "[]")),
            ("likes_json", script_json(&like_counts, "{}")),
            ("swipe_distance", SWIPE_DISTANCE_PX.to_string()),
            ("swipe_velocity", SWIPE_VELOCITY_PX_PER_MS.to_string()),
        ],
    )
}

/// Writes `index.html` into the output root and copies every original next
/// to it so the lightbox can load full-resolution files.
pub fn write_gallery(
    layout: &OutputLayout,
    source_dir: &Path,
    records: &[ImageRecord],
    likes: &LikeStore,
    config: &GalleryBuildConfig,
) -> Result<PathBuf> {
    fs::create_dir_all(layout.root()).map_err(GalleryError::io(layout.root()))?;

    let index_path = layout.index_path();
    fs::write(&index_path, render(records, likes, config)).map_err(GalleryError::io(&index_path))?;

    for record in records {
        let source = source_dir.join(&record.filename);
        let target = layout.original_path(&record.filename);

        if is_same_file(&source, &target) {
            continue;
        }

        fs::copy(&source, &target).map_err(GalleryError::io(&source))?;
    }

    tracing::info!(
        "Wrote {} with {} images",
        index_path.display(),
        records.len()
    );

    Ok(index_path)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn render_tile(tile: &TileData, likes: u64) -> String {
    let mut classes = vec!["gallery-item"];
    if tile.wide {
        classes.push("wide");
    }
    if tile.page == 1 {
        classes.push("visible");
    }

    format!(
        r#"        <div class="{classes}" data-index="{index}" data-page="{page}" onclick="openLightbox({index})">
            <img src="{thumbnail}" alt="{filename}" loading="lazy">
            <button class="like-button" onclick="event.stopPropagation(); likeImage({index})" aria-label="Like">&hearts; <span class="like-count">{likes}</span></button>
        </div>"#,
        classes = classes.join(" "),
        index = tile.index,
        page = tile.page,
        thumbnail = html_escape(&tile.thumbnail_url),
        filename = html_escape(tile.filename),
        likes = likes,
    )
}

/// Substitutes `{{name}}` markers in a single pass, so substituted text is
/// never rescanned. Unknown markers are left untouched.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// JSON safe for inlining inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| fallback.to_string())
        .replace("</", "<\\/")
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
