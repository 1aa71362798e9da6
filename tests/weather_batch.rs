//! End-to-end batch run over a small input folder: one good photo and one
//! file that is not an image.

use image::{ImageEncoder, Rgb, RgbImage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc;
use tempfile::TempDir;
use weather_gen::config::GeneratorConfig;
use weather_gen::effects::Registry;
use weather_gen::imaging::{ImageBackend, RustBackend};
use weather_gen::output::format_process_event;
use weather_gen::preview::{ContactSheet, PreviewDisplay, PreviewError, PreviewOutcome};
use weather_gen::process::{FileOutcome, SkipReason};
use weather_gen::{preview, process};

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    image::codecs::jpeg::JpegEncoder::new(std::io::BufWriter::new(file))
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

fn setup() -> (TempDir, GeneratorConfig) {
    let tmp = TempDir::new().unwrap();
    let config = GeneratorConfig {
        input_dir: tmp.path().join("input-test"),
        output_dir: tmp.path().join("output"),
        seed: Some(7),
        ..Default::default()
    };
    std::fs::create_dir_all(&config.input_dir).unwrap();
    write_jpeg(&config.input_dir.join("beach.jpg"), 160, 120);
    std::fs::write(config.input_dir.join("corrupt.dat"), b"\x00\x01 not an image").unwrap();
    (tmp, config)
}

fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[derive(Default)]
struct Recorder {
    sheets: Mutex<Vec<ContactSheet>>,
}

impl PreviewDisplay for Recorder {
    fn show(&self, sheet: &ContactSheet) -> Result<(), PreviewError> {
        self.sheets.lock().unwrap().push(sheet.clone());
        Ok(())
    }
}

#[test]
fn beach_and_corrupt_file() {
    let (_tmp, config) = setup();
    let registry = Registry::default();
    let (tx, rx) = mpsc::channel();

    let report = process::process(
        &config,
        &registry,
        &mut process::make_rng(config.seed),
        Some(tx),
    )
    .unwrap();

    // Console transcript
    let lines: Vec<String> = rx.iter().flat_map(|e| format_process_event(&e)).collect();
    assert_eq!(
        lines,
        vec![
            format!("Found 2 images in {}", config.input_dir.display()),
            "Applying rainy to beach.jpg...".to_string(),
            "Applying snowy to beach.jpg...".to_string(),
            "Applying foggy to beach.jpg...".to_string(),
            "Applying sunny_glare to beach.jpg...".to_string(),
            String::new(),
            format!(
                "Success! Augmented images saved to: {}",
                config.output_dir.display()
            ),
        ]
    );

    // Exactly four artifacts, none for the corrupt file
    assert_eq!(
        sorted_names(&config.output_dir),
        vec![
            "beach_foggy.jpg",
            "beach_rainy.jpg",
            "beach_snowy.jpg",
            "beach_sunny_glare.jpg",
        ]
    );
    assert!(matches!(
        &report.files[1].outcome,
        FileOutcome::Skipped {
            reason: SkipReason::Undecodable(_)
        }
    ));

    // Each artifact decodes at the source dimensions
    let backend = RustBackend::new();
    for name in sorted_names(&config.output_dir) {
        let img = backend.decode(&config.output_dir.join(&name)).unwrap();
        assert_eq!((img.width(), img.height()), (160, 120), "{name}");
    }

    // Preview shows all four, alphabetically
    let recorder = Recorder::default();
    let outcome =
        preview::visualize_sample(&config.output_dir, &config.preview, &backend, &recorder)
            .unwrap();
    let PreviewOutcome::Shown { labels, .. } = outcome else {
        panic!("expected a preview");
    };
    assert_eq!(
        labels,
        vec![
            "beach_foggy.jpg",
            "beach_rainy.jpg",
            "beach_snowy.jpg",
            "beach_sunny_glare.jpg",
        ]
    );
    assert_eq!(recorder.sheets.lock().unwrap().len(), 1);
}

#[test]
fn rerun_with_same_seed_reproduces_artifacts() {
    let (_tmp, config) = setup();
    let registry = Registry::default();

    process::process(&config, &registry, &mut StdRng::seed_from_u64(7), None).unwrap();
    let first: Vec<Vec<u8>> = sorted_names(&config.output_dir)
        .iter()
        .map(|n| std::fs::read(config.output_dir.join(n)).unwrap())
        .collect();

    process::process(&config, &registry, &mut StdRng::seed_from_u64(7), None).unwrap();
    let second: Vec<Vec<u8>> = sorted_names(&config.output_dir)
        .iter()
        .map(|n| std::fs::read(config.output_dir.join(n)).unwrap())
        .collect();

    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[test]
fn empty_input_folder_previews_nothing() {
    let tmp = TempDir::new().unwrap();
    let config = GeneratorConfig {
        input_dir: tmp.path().join("input-test"),
        output_dir: tmp.path().join("output"),
        ..Default::default()
    };
    std::fs::create_dir_all(&config.input_dir).unwrap();

    let report =
        process::process(&config, &Registry::default(), &mut StdRng::seed_from_u64(1), None)
            .unwrap();
    assert_eq!(report.found(), 0);

    let recorder = Recorder::default();
    let outcome = preview::visualize_sample(
        &config.output_dir,
        &config.preview,
        &RustBackend::new(),
        &recorder,
    )
    .unwrap();
    assert_eq!(outcome, PreviewOutcome::Empty);
    assert!(recorder.sheets.lock().unwrap().is_empty());
}
