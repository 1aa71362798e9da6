//! Batch processing: every input image through every weather pipeline.
//!
//! ## Flow
//!
//! ```text
//! input-test/                     output/
//! ├── beach.jpg   ──┬─ rainy ──→  ├── beach_rainy.jpg
//! │                 ├─ snowy ──→  ├── beach_snowy.jpg
//! │                 ├─ foggy ──→  ├── beach_foggy.jpg
//! │                 └─ sunny ──→  └── beach_sunny_glare.jpg
//! └── corrupt.dat ──→ skipped (undecodable)
//! ```
//!
//! Entries are visited in file-name order and pipelines in registry order.
//! Each pipeline starts from the freshly decoded source, never from another
//! pipeline's output.
//!
//! ## Failure policy
//!
//! | Failure | Outcome |
//! |---|---|
//! | entry is a directory | [`SkipReason::NotAFile`], continue |
//! | input cannot be decoded | [`SkipReason::Undecodable`], continue |
//! | artifact extension has no encoder | [`ArtifactOutcome::Failed`], continue |
//! | I/O error writing an artifact | [`ProcessError::Io`], abort |

use crate::config::GeneratorConfig;
use crate::effects::Registry;
use crate::imaging::{BackendError, ImageBackend, Quality, RustBackend, to_working};
use crate::naming::{artifact_name, is_hidden};
use crate::weather::Weather;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(BackendError),
}

impl From<BackendError> for ProcessError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Io(io) => ProcessError::Io(io),
            other => ProcessError::Imaging(other),
        }
    }
}

/// Progress notifications, sent in the order the work happens.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// Input directory listed; `count` includes entries that will be skipped.
    Found { count: usize, input_dir: PathBuf },
    /// A pipeline is about to run on one input.
    Applying { weather: Weather, filename: String },
    Skipped { filename: String, reason: SkipReason },
    ArtifactFailed { artifact: String, reason: String },
    Finished { output_dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NotAFile,
    Undecodable(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotAFile => write!(f, "not a regular file"),
            SkipReason::Undecodable(reason) => write!(f, "could not decode ({reason})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactOutcome {
    Written {
        weather: Weather,
        path: PathBuf,
    },
    Failed {
        weather: Weather,
        path: PathBuf,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Processed { artifacts: Vec<ArtifactOutcome> },
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub filename: String,
    pub outcome: FileOutcome,
}

/// Structured result of one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub files: Vec<FileReport>,
}

impl ProcessReport {
    pub fn found(&self) -> usize {
        self.files.len()
    }

    pub fn processed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Processed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.found() - self.processed()
    }

    fn artifacts(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.files.iter().flat_map(|f| match &f.outcome {
            FileOutcome::Processed { artifacts } => artifacts.as_slice(),
            FileOutcome::Skipped { .. } => &[][..],
        })
    }

    pub fn written(&self) -> Vec<&Path> {
        self.artifacts()
            .filter_map(|a| match a {
                ArtifactOutcome::Written { path, .. } => Some(path.as_path()),
                ArtifactOutcome::Failed { .. } => None,
            })
            .collect()
    }

    pub fn failed_artifacts(&self) -> usize {
        self.artifacts()
            .filter(|a| matches!(a, ArtifactOutcome::Failed { .. }))
            .count()
    }
}

/// RNG for a run: seeded when a seed is configured, OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn emit(progress: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is printing.
        let _ = tx.send(event);
    }
}

/// Non-hidden entries of `dir` in file-name order. A missing directory has none.
fn list_inputs(dir: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    if !dir.exists() {
        log::warn!("input directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if is_hidden(&entry.file_name().to_string_lossy()) {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Process the configured input directory with the pure Rust backend.
pub fn process(
    config: &GeneratorConfig,
    registry: &Registry,
    rng: &mut impl Rng,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessReport, ProcessError> {
    process_images(config, registry, &RustBackend::new(), rng, progress)
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_images(
    config: &GeneratorConfig,
    registry: &Registry,
    backend: &impl ImageBackend,
    rng: &mut impl Rng,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessReport, ProcessError> {
    config.ensure_output_dir()?;
    let quality = Quality::new(config.output.jpeg_quality);

    let inputs = list_inputs(&config.input_dir)?;
    emit(
        &progress,
        ProcessEvent::Found {
            count: inputs.len(),
            input_dir: config.input_dir.clone(),
        },
    );

    let mut files = Vec::with_capacity(inputs.len());
    for path in inputs {
        let filename = display_name(&path);

        let decoded = if path.is_file() {
            backend
                .decode(&path)
                .map_err(|e| SkipReason::Undecodable(e.to_string()))
        } else {
            Err(SkipReason::NotAFile)
        };
        let image = match decoded {
            Ok(image) => image,
            Err(reason) => {
                log::warn!("skipping {filename}: {reason}");
                emit(
                    &progress,
                    ProcessEvent::Skipped {
                        filename: filename.clone(),
                        reason: reason.clone(),
                    },
                );
                files.push(FileReport {
                    filename,
                    outcome: FileOutcome::Skipped { reason },
                });
                continue;
            }
        };

        let (source, layout) = to_working(&image);
        let mut artifacts = Vec::with_capacity(registry.pipelines().len());
        for pipeline in registry.pipelines() {
            let weather = pipeline.weather;
            emit(
                &progress,
                ProcessEvent::Applying {
                    weather,
                    filename: filename.clone(),
                },
            );

            let augmented = layout.restore(pipeline.apply(&source, rng));
            let out_path = config.output_dir.join(artifact_name(&filename, weather));
            match backend.encode(&augmented, &out_path, quality) {
                Ok(()) => artifacts.push(ArtifactOutcome::Written {
                    weather,
                    path: out_path,
                }),
                Err(err) if err.is_io() => return Err(err.into()),
                Err(err) => {
                    log::error!("failed to write {}: {err}", out_path.display());
                    emit(
                        &progress,
                        ProcessEvent::ArtifactFailed {
                            artifact: display_name(&out_path),
                            reason: err.to_string(),
                        },
                    );
                    artifacts.push(ArtifactOutcome::Failed {
                        weather,
                        path: out_path,
                        reason: err.to_string(),
                    });
                }
            }
        }
        files.push(FileReport {
            filename,
            outcome: FileOutcome::Processed { artifacts },
        });
    }

    emit(
        &progress,
        ProcessEvent::Finished {
            output_dir: config.output_dir.clone(),
        },
    );

    Ok(ProcessReport {
        input_dir: config.input_dir.clone(),
        output_dir: config.output_dir.clone(),
        files,
    })
}
