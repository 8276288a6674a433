use anyhow::{Context, Result};
use gallery_core::{page, GalleryBuildConfig, ImageRecord, LikeStore, OutputLayout};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::image_processor::{is_image_file, process_image, ProcessError};

pub struct BuildReport {
    pub records: Vec<ImageRecord>,
    pub failures: Vec<ProcessError>,
    pub index_path: PathBuf,
}

pub fn execute(input: PathBuf, output: PathBuf, config: GalleryBuildConfig) -> Result<()> {
    let report = build_gallery(&input, &output, &config)?;

    println!("✓ Gallery created successfully in {}", output.display());
    println!(
        "Images: {} processed, {} skipped",
        report.records.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  ✗ {failure}");
    }
    println!("Open {} or run gallery-web --dir {}", report.index_path.display(), output.display());

    Ok(())
}

/// Runs the whole pipeline: scan, thumbnails, likes, page. Files that fail to
/// decode are logged and skipped; everything else is fatal.
pub fn build_gallery(
    input: &Path,
    output: &Path,
    config: &GalleryBuildConfig,
) -> Result<BuildReport> {
    config.validate()?;

    let image_paths = collect_image_paths(input)?;
    if image_paths.is_empty() {
        anyhow::bail!("No images found in {}", input.display());
    }

    let layout = OutputLayout::new(output);
    let thumbnails_dir = layout.thumbnails_dir();
    fs::create_dir_all(&thumbnails_dir)
        .with_context(|| format!("Failed to create {}", thumbnails_dir.display()))?;

    tracing::info!(
        "Building gallery from {} images in {}",
        image_paths.len(),
        input.display()
    );

    let pb = ProgressBar::new(image_paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("█▓▒░ "),
    );
    pb.set_message("Generating thumbnails...");

    // Each file writes its own thumbnail, so files are independent. The
    // collected order still matches the sorted scan order.
    let results: Vec<_> = image_paths
        .par_iter()
        .map(|path| {
            let result = process_image(path, &thumbnails_dir, config.thumbnail_max_size);
            pb.inc(1);
            result
        })
        .collect();

    pb.finish_with_message("Thumbnails complete");

    let mut records = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for result in results {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Skipping image: {}", e);
                failures.push(e);
            }
        }
    }

    let likes_path = layout.likes_path();
    let likes = LikeStore::load(&likes_path, records.iter().map(|r| r.filename.as_str()));

    let index_path = page::write_gallery(&layout, input, &records, &likes, config)?;
    likes.persist(&likes_path)?;

    Ok(BuildReport {
        records,
        failures,
        index_path,
    })
}

/// Top-level image files of `input`, sorted by file name.
fn collect_image_paths(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", input.display());
    }

    let mut image_paths = Vec::new();

    for entry in WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Cannot read directory entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && is_image_file(entry.path()) {
            image_paths.push(entry.into_path());
        }
    }

    Ok(image_paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn write_image(dir: &Path, name: &str, width: u32, height: u32) {
        ImageBuffer::from_pixel(width, height, Rgb([90u8, 160, 220]))
            .save(dir.join(name))
            .unwrap();
    }

    fn small_config() -> GalleryBuildConfig {
        GalleryBuildConfig {
            thumbnail_max_size: gallery_core::ThumbnailSize::square(64),
            images_per_page: 2,
            ..Default::default()
        }
    }

    #[test]
    fn corrupt_file_is_skipped_and_build_completes() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_image(input.path(), "a.jpg", 200, 100);
        fs::write(input.path().join("b.jpg"), b"garbage").unwrap();
        write_image(input.path(), "c.png", 100, 200);

        let report = build_gallery(input.path(), output.path(), &small_config()).unwrap();

        let names: Vec<_> = report.records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["a.jpg", "c.png"]);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0], ProcessError::Decode { .. }));

        let layout = OutputLayout::new(output.path());
        assert_eq!(report.index_path, layout.index_path());
        assert!(layout.index_path().exists());
        assert!(layout.thumbnail_path("thumb_a.jpg").exists());
        assert!(layout.thumbnail_path("thumb_c.png").exists());
        assert!(!layout.thumbnail_path("thumb_b.jpg").exists());
        assert!(layout.original_path("a.jpg").exists());
        assert!(!layout.original_path("b.jpg").exists());

        let likes: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(layout.likes_path()).unwrap()).unwrap();
        assert_eq!(likes, serde_json::json!({ "a.jpg": 0, "c.png": 0 }));
    }

    #[test]
    fn records_follow_sorted_file_names() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for name in ["zeta.png", "alpha.png", "mid.gif", "Beta.jpeg"] {
            write_image(input.path(), name, 30, 20);
        }

        let report = build_gallery(input.path(), output.path(), &small_config()).unwrap();

        let names: Vec<_> = report.records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["Beta.jpeg", "alpha.png", "mid.gif", "zeta.png"]);

        let html = fs::read_to_string(&report.index_path).unwrap();
        let first = html.find(r#"alt="Beta.jpeg""#).unwrap();
        let last = html.find(r#"alt="zeta.png""#).unwrap();
        assert!(first < last);
    }

    #[test]
    fn ignores_non_images_and_subdirectories() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_image(input.path(), "keep.png", 10, 10);
        fs::write(input.path().join("notes.txt"), "hello").unwrap();
        fs::create_dir(input.path().join("nested")).unwrap();
        write_image(&input.path().join("nested"), "deep.png", 10, 10);

        let report = build_gallery(input.path(), output.path(), &small_config()).unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].filename, "keep.png");
        assert!(report.failures.is_empty());
    }

    #[test]
    fn rebuild_keeps_existing_like_counts() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_image(input.path(), "a.png", 10, 10);
        let layout = OutputLayout::new(output.path());
        fs::write(layout.likes_path(), r#"{"a.png": 9, "old.png": 1}"#).unwrap();

        let report = build_gallery(input.path(), output.path(), &small_config()).unwrap();

        let likes = LikeStore::read(&layout.likes_path()).unwrap();
        assert_eq!(likes.count("a.png"), 9);
        assert_eq!(likes.count("old.png"), 1);

        let html = fs::read_to_string(report.index_path).unwrap();
        assert!(html.contains(r#"<span class="like-count">9</span>"#));
    }

    #[test]
    fn missing_or_empty_input_is_fatal() {
        let output = TempDir::new().unwrap();
        let empty = TempDir::new().unwrap();

        assert!(build_gallery(&empty.path().join("nope"), output.path(), &small_config()).is_err());
        assert!(build_gallery(empty.path(), output.path(), &small_config()).is_err());
    }

    #[test]
    fn invalid_config_is_rejected_before_any_work() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_image(input.path(), "a.png", 10, 10);
        let config = GalleryBuildConfig {
            images_per_page: 0,
            ..Default::default()
        };

        assert!(build_gallery(input.path(), output.path(), &config).is_err());
        assert!(!OutputLayout::new(output.path()).index_path().exists());
    }
}
