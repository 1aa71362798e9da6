use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use weather_gen::config::{self, GeneratorConfig};
use weather_gen::effects::Registry;
use weather_gen::imaging::RustBackend;
use weather_gen::preview::{self, SheetViewer};
use weather_gen::{output, process};

#[derive(Parser)]
#[command(name = "weather-gen")]
#[command(about = "Batch-apply synthetic weather effects to a folder of images")]
#[command(long_about = "\
Batch-apply synthetic weather effects to a folder of images

Every readable image in the input folder is written to the output folder once
per weather type, then a contact sheet of the first few results is shown.

  input-test/               output/
  ├── beach.jpg      →      ├── beach_rainy.jpg
  └── corrupt.dat           ├── beach_snowy.jpg
      (skipped)             ├── beach_foggy.jpg
                            └── beach_sunny_glare.jpg

Settings are read from ./weather-gen.toml when present (see 'weather-gen
gen-config'); flags override the file. Set RUST_LOG=info or debug for
diagnostics.")]
#[command(version)]
struct Cli {
    /// Input folder [default: input-test]
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Output folder [default: output]
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Config file (must exist) instead of ./weather-gen.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible effects
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Skip the contact-sheet preview
    #[arg(long, global = true)]
    no_preview: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Process the input folder, then preview the results (the default)
    Run,
    /// Process the input folder only
    Process,
    /// Preview what is already in the output folder
    Preview,
    /// List weather pipelines and their steps
    Effects,
    /// Print a stock weather-gen.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Command::Run) {
        Command::Run => {
            let config = resolve_config(&cli)?;
            run_process(&config)?;
            if config.preview.enabled {
                run_preview(&config)?;
            }
        }
        Command::Process => {
            let config = resolve_config(&cli)?;
            run_process(&config)?;
        }
        Command::Preview => {
            let config = resolve_config(&cli)?;
            run_preview(&config)?;
        }
        Command::Effects => {
            let config = resolve_config(&cli)?;
            output::print_registry(&Registry::from_config(&config.effects));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "[{style}{}{style:#} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// Config file (explicit or `./weather-gen.toml`) with CLI flags on top.
fn resolve_config(cli: &Cli) -> Result<GeneratorConfig, config::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_required_config(path)?,
        None => config::load_config(Path::new(config::DEFAULT_CONFIG_FILE))?,
    };
    if let Some(input) = &cli.input {
        config.input_dir = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.no_preview {
        config.preview.enabled = false;
    }
    log::debug!("resolved config: {config:?}");
    Ok(config)
}

fn run_process(config: &GeneratorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::from_config(&config.effects);
    let mut rng = process::make_rng(config.seed);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    let result = process::process(config, &registry, &mut rng, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    let report = result?;
    log::info!(
        "{} found, {} processed, {} skipped, {} artifacts written, {} failed",
        report.found(),
        report.processed(),
        report.skipped(),
        report.written().len(),
        report.failed_artifacts()
    );
    Ok(())
}

fn run_preview(config: &GeneratorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let viewer = SheetViewer::from_config(&config.preview);
    let outcome = preview::visualize_sample(
        &config.output_dir,
        &config.preview,
        &RustBackend::new(),
        &viewer,
    )?;
    output::print_preview(&outcome, &config.output_dir, viewer.path());
    Ok(())
}
