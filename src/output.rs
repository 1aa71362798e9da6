//! CLI output formatting for every command.
//!
//! Each `format_*` function returns display lines without printing, so the
//! exact console text is unit-testable; the matching `print_*` function writes
//! those lines to stdout.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! Found 2 images in input-test
//! Applying rainy to beach.jpg...
//! Applying snowy to beach.jpg...
//! Applying foggy to beach.jpg...
//! Applying sunny_glare to beach.jpg...
//!
//! Success! Augmented images saved to: output
//! ```
//!
//! Skipped inputs print nothing here; they are reported through the log at
//! `warn` level.
//!
//! ## Preview
//!
//! ```text
//! Preview (4 images) → /tmp/weather-gen-preview.png
//!     001 beach_foggy.jpg
//!     002 beach_rainy.jpg
//!     003 beach_snowy.jpg
//!     004 beach_sunny_glare.jpg
//! ```
//!
//! ## Effects
//!
//! ```text
//! 001 rainy → {stem}_rainy{ext}
//!     RandomRain (p = 1)
//!     MotionBlur (p = 0.2)
//! ```

use crate::effects::Registry;
use crate::preview::PreviewOutcome;
use crate::process::ProcessEvent;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Process output
// ============================================================================

/// Format a single process progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Found { count, input_dir } => {
            vec![format!("Found {} images in {}", count, input_dir.display())]
        }
        ProcessEvent::Applying { weather, filename } => {
            vec![format!("Applying {} to {}...", weather, filename)]
        }
        ProcessEvent::Skipped { .. } => Vec::new(),
        ProcessEvent::ArtifactFailed { artifact, reason } => {
            vec![format!("{}Could not write {}: {}", indent(1), artifact, reason)]
        }
        ProcessEvent::Finished { output_dir } => vec![
            String::new(),
            format!(
                "Success! Augmented images saved to: {}",
                output_dir.display()
            ),
        ],
    }
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview output
// ============================================================================

/// Format the preview result: where the sheet went and a legend of its tiles.
pub fn format_preview(outcome: &PreviewOutcome, output_dir: &Path, sheet: &Path) -> Vec<String> {
    match outcome {
        PreviewOutcome::Empty => vec![format!(
            "No images to preview in {}",
            output_dir.display()
        )],
        PreviewOutcome::Shown { labels, .. } => {
            let mut lines = vec![format!(
                "Preview ({} images) \u{2192} {}",
                labels.len(),
                sheet.display()
            )];
            for (i, label) in labels.iter().enumerate() {
                lines.push(format!("{}{} {}", indent(1), format_index(i + 1), label));
            }
            lines
        }
    }
}

pub fn print_preview(outcome: &PreviewOutcome, output_dir: &Path, sheet: &Path) {
    for line in format_preview(outcome, output_dir, sheet) {
        println!("{}", line);
    }
}

// ============================================================================
// Effects output
// ============================================================================

/// Format the registry: each weather with its artifact suffix and steps.
pub fn format_registry(registry: &Registry) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, pipeline) in registry.pipelines().iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {{stem}}_{}{{ext}}",
            format_index(i + 1),
            pipeline.weather,
            pipeline.weather
        ));
        for step in &pipeline.steps {
            lines.push(format!(
                "{}{} (p = {})",
                indent(1),
                step.name(),
                step.probability().value()
            ));
        }
    }
    lines
}

pub fn print_registry(registry: &Registry) {
    for line in format_registry(registry) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
