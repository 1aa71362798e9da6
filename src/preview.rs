//! Post-run preview: a contact sheet of the first few artifacts.
//!
//! The preview reads the output directory, never writes to it. Selected
//! artifacts are scaled to a common height and laid out in a single row on a
//! white sheet:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  ┌────────┐  ┌────────┐  ┌────────┐  ┌────────┐          │
//! │  │ beach_ │  │ beach_ │  │ beach_ │  │ beach_ │          │
//! │  │ foggy  │  │ rainy  │  │ snowy  │  │ sunny… │          │
//! │  └────────┘  └────────┘  └────────┘  └────────┘          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Tile labels (the artifact file names) travel with the sheet as
//! [`SheetTile`] metadata and are printed as a legend by the CLI.
//!
//! Showing the sheet is behind the [`PreviewDisplay`] trait. [`SheetViewer`]
//! saves it as PNG outside the output directory and can hand it to the
//! platform image viewer.

use crate::config::PreviewConfig;
use crate::imaging::{BackendError, ImageBackend};
use crate::naming::is_hidden;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageError, ImageFormat, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Space (pixels) around and between tiles.
pub const TILE_GAP: u32 = 8;

const SHEET_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load preview image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Failed to display preview: {0}")]
    Display(String),
}

/// One labelled image on a contact sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTile {
    pub label: String,
    /// Left edge on the sheet.
    pub x: u32,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactSheet {
    pub image: RgbImage,
    pub tiles: Vec<SheetTile>,
}

impl ContactSheet {
    pub fn labels(&self) -> Vec<&str> {
        self.tiles.iter().map(|t| t.label.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    /// Nothing to show: the output directory is missing or empty.
    Empty,
    Shown {
        files: Vec<PathBuf>,
        labels: Vec<String>,
    },
}

/// Somewhere a contact sheet can be shown.
pub trait PreviewDisplay {
    fn show(&self, sheet: &ContactSheet) -> Result<(), PreviewError>;
}

/// Saves the sheet as PNG and optionally opens it in the system viewer.
pub struct SheetViewer {
    path: PathBuf,
    open_viewer: bool,
}

impl SheetViewer {
    pub fn new(path: PathBuf, open_viewer: bool) -> Self {
        Self { path, open_viewer }
    }

    pub fn from_config(config: &PreviewConfig) -> Self {
        Self::new(config.resolved_sheet_path(), config.open_viewer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

/// Start `cmd` without waiting on it. Returns whether it started.
///
/// A headless machine has no viewer; that is only a warning.
fn launch_detached(mut cmd: Command) -> bool {
    match cmd.spawn() {
        Ok(child) => {
            log::debug!("image viewer started (pid {})", child.id());
            // Never waited on: the viewer outlives this process.
            drop(child);
            true
        }
        Err(e) => {
            log::warn!("could not launch image viewer: {e}");
            false
        }
    }
}

impl PreviewDisplay for SheetViewer {
    fn show(&self, sheet: &ContactSheet) -> Result<(), PreviewError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        sheet
            .image
            .save_with_format(&self.path, ImageFormat::Png)
            .map_err(|e| match e {
                ImageError::IoError(io) => PreviewError::Io(io),
                other => PreviewError::Display(other.to_string()),
            })?;
        log::debug!("preview sheet written to {}", self.path.display());

        if self.open_viewer {
            launch_detached(viewer_command(&self.path));
        }
        Ok(())
    }
}

/// The first `max` non-hidden entries of `dir` in file-name order.
///
/// A missing directory yields no files.
pub fn select_preview_files(dir: &Path, max: usize) -> Result<Vec<PathBuf>, PreviewError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if is_hidden(&entry.file_name().to_string_lossy()) || !entry.path().is_file() {
            continue;
        }
        files.push(entry.path());
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files.truncate(max);
    Ok(files)
}

/// Width of a tile scaled to `tile_height`, keeping the aspect ratio.
fn scaled_width(width: u32, height: u32, tile_height: u32) -> u32 {
    let scaled = (width as f64 * tile_height as f64 / height.max(1) as f64).round() as u32;
    scaled.max(1)
}

/// Lay `images` out in one row, each scaled to `tile_height`.
pub fn compose_contact_sheet(images: &[(String, DynamicImage)], tile_height: u32) -> ContactSheet {
    let tile_height = tile_height.max(1);
    let mut tiles = Vec::with_capacity(images.len());
    let mut scaled = Vec::with_capacity(images.len());
    let mut x = TILE_GAP;

    for (label, image) in images {
        let width = scaled_width(image.width(), image.height(), tile_height);
        scaled.push(imageops::resize(
            &image.to_rgb8(),
            width,
            tile_height,
            FilterType::Lanczos3,
        ));
        tiles.push(SheetTile {
            label: label.clone(),
            x,
            width,
        });
        x += width + TILE_GAP;
    }

    let mut sheet = RgbImage::from_pixel(x, tile_height + 2 * TILE_GAP, SHEET_BACKGROUND);
    for (tile, pixels) in tiles.iter().zip(&scaled) {
        imageops::replace(&mut sheet, pixels, tile.x as i64, TILE_GAP as i64);
    }

    ContactSheet {
        image: sheet,
        tiles,
    }
}

/// Show the first few artifacts in `output_dir` side by side.
pub fn visualize_sample(
    output_dir: &Path,
    config: &PreviewConfig,
    backend: &impl ImageBackend,
    display: &impl PreviewDisplay,
) -> Result<PreviewOutcome, PreviewError> {
    let files = select_preview_files(output_dir, config.max_images)?;
    if files.is_empty() {
        log::info!("no images in {} to preview", output_dir.display());
        return Ok(PreviewOutcome::Empty);
    }

    let mut images = Vec::with_capacity(files.len());
    for path in &files {
        let image = backend.decode(path).map_err(|source| PreviewError::Decode {
            path: path.clone(),
            source,
        })?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        images.push((label, image));
    }

    let sheet = compose_contact_sheet(&images, config.tile_height);
    display.show(&sheet)?;

    Ok(PreviewOutcome::Shown {
        labels: sheet.tiles.into_iter().map(|t| t.label).collect(),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustBackend;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::{create_test_jpeg, list_names, write_garbage};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Display that keeps every sheet it is given.
    #[derive(Default)]
    struct RecordingDisplay {
        shown: Mutex<Vec<ContactSheet>>,
    }

    impl RecordingDisplay {
        fn count(&self) -> usize {
            self.shown.lock().unwrap().len()
        }
    }

    impl PreviewDisplay for RecordingDisplay {
        fn show(&self, sheet: &ContactSheet) -> Result<(), PreviewError> {
            self.shown.lock().unwrap().push(sheet.clone());
            Ok(())
        }
    }

    fn touch_all(dir: &Path, names: &[String]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[test]
    fn missing_output_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let display = RecordingDisplay::default();
        let outcome = visualize_sample(
            &tmp.path().join("nope"),
            &PreviewConfig::default(),
            &MockBackend::new(),
            &display,
        )
        .unwrap();
        assert_eq!(outcome, PreviewOutcome::Empty);
        assert_eq!(display.count(), 0);
    }

    #[test]
    fn empty_output_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let display = RecordingDisplay::default();
        let outcome = visualize_sample(
            tmp.path(),
            &PreviewConfig::default(),
            &MockBackend::new(),
            &display,
        )
        .unwrap();
        assert_eq!(outcome, PreviewOutcome::Empty);
        assert_eq!(display.count(), 0);
    }

    #[test]
    fn shows_first_four_of_many_in_name_order() {
        let tmp = TempDir::new().unwrap();
        let names: Vec<String> = (0..10)
            .flat_map(|i| {
                ["foggy", "rainy", "snowy", "sunny_glare"]
                    .map(|w| format!("img{i:02}_{w}.jpg"))
            })
            .collect();
        assert_eq!(names.len(), 40);
        touch_all(tmp.path(), &names);
        let backend = MockBackend::with_images(
            names
                .iter()
                .map(|n| (n.as_str(), DynamicImage::new_rgb8(30, 20)))
                .collect(),
        );
        let display = RecordingDisplay::default();

        let outcome =
            visualize_sample(tmp.path(), &PreviewConfig::default(), &backend, &display).unwrap();

        let PreviewOutcome::Shown { files, labels } = outcome else {
            panic!("expected a preview");
        };
        assert_eq!(files.len(), 4);
        assert_eq!(
            labels,
            vec![
                "img00_foggy.jpg",
                "img00_rainy.jpg",
                "img00_snowy.jpg",
                "img00_sunny_glare.jpg",
            ]
        );
        assert_eq!(display.count(), 1);
        assert_eq!(display.shown.lock().unwrap()[0].tiles.len(), 4);
    }

    #[test]
    fn fewer_files_than_limit_shows_all() {
        let tmp = TempDir::new().unwrap();
        let names = vec!["a_rainy.png".to_string(), "a_snowy.png".to_string()];
        touch_all(tmp.path(), &names);
        fs::write(tmp.path().join(".hidden.png"), b"").unwrap();
        fs::create_dir(tmp.path().join("subdir")).unwrap();
        let backend = MockBackend::with_images(vec![
            ("a_rainy.png", DynamicImage::new_rgb8(10, 10)),
            ("a_snowy.png", DynamicImage::new_rgb8(10, 10)),
        ]);
        let display = RecordingDisplay::default();

        let outcome =
            visualize_sample(tmp.path(), &PreviewConfig::default(), &backend, &display).unwrap();
        assert!(matches!(outcome, PreviewOutcome::Shown { files, .. } if files.len() == 2));
    }

    #[test]
    fn undecodable_selection_is_a_typed_error() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a_foggy.jpg"), 16, 16);
        write_garbage(&tmp.path().join("a_rainy.jpg"));
        let display = RecordingDisplay::default();

        let err = visualize_sample(
            tmp.path(),
            &PreviewConfig::default(),
            &RustBackend::new(),
            &display,
        )
        .unwrap_err();

        assert!(
            matches!(&err, PreviewError::Decode { path, .. } if path.ends_with("a_rainy.jpg")),
            "{err:?}"
        );
        assert_eq!(display.count(), 0);
    }

    #[test]
    fn contact_sheet_layout() {
        let images = vec![
            ("wide".to_string(), DynamicImage::new_rgb8(100, 50)),
            ("tall".to_string(), DynamicImage::new_rgb8(30, 60)),
        ];
        let sheet = compose_contact_sheet(&images, 40);

        assert_eq!(sheet.labels(), vec!["wide", "tall"]);
        assert_eq!(
            sheet.tiles,
            vec![
                SheetTile {
                    label: "wide".into(),
                    x: TILE_GAP,
                    width: 80
                },
                SheetTile {
                    label: "tall".into(),
                    x: TILE_GAP + 80 + TILE_GAP,
                    width: 20
                },
            ]
        );
        assert_eq!(
            sheet.image.dimensions(),
            (80 + 20 + 3 * TILE_GAP, 40 + 2 * TILE_GAP)
        );
        // Gap stays background, tiles are painted
        assert_eq!(sheet.image.get_pixel(0, 0), &SHEET_BACKGROUND);
        assert_eq!(
            sheet.image.get_pixel(TILE_GAP + 5, TILE_GAP + 5),
            &Rgb([0, 0, 0])
        );
    }

    #[test]
    fn scaled_width_never_zero() {
        assert_eq!(scaled_width(1, 1000, 240), 1);
        assert_eq!(scaled_width(640, 480, 240), 320);
    }

    #[test]
    fn sheet_viewer_writes_png_outside_output_dir() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("output");
        fs::create_dir(&output).unwrap();
        create_test_jpeg(&output.join("beach_rainy.jpg"), 64, 48);
        create_test_jpeg(&output.join("beach_snowy.jpg"), 64, 48);
        let before = list_names(&output);

        let viewer = SheetViewer::new(tmp.path().join("sheets/preview.png"), false);
        let config = PreviewConfig {
            tile_height: 24,
            ..Default::default()
        };
        visualize_sample(&output, &config, &RustBackend::new(), &viewer).unwrap();

        assert_eq!(list_names(&output), before);
        let sheet = image::open(viewer.path()).unwrap();
        assert_eq!(
            (sheet.width(), sheet.height()),
            (32 + 32 + 3 * TILE_GAP, 24 + 2 * TILE_GAP)
        );
    }

    #[test]
    fn sheet_viewer_uses_temp_dir_by_default() {
        let viewer = SheetViewer::from_config(&PreviewConfig::default());
        assert!(viewer.path().starts_with(std::env::temp_dir()));
    }

    #[test]
    fn missing_viewer_is_not_an_error() {
        assert!(!launch_detached(Command::new("/nonexistent/image-viewer")));
    }

    #[cfg(unix)]
    #[test]
    fn viewer_is_launched_without_waiting() {
        let started = std::time::Instant::now();
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        assert!(launch_detached(cmd));
        assert!(started.elapsed() < std::time::Duration::from_secs(4));
    }
}
