//! Measurement report for an image and its annotation file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use medmark::config::{AppConfig, ConfigError};
use medmark::data::{ImageSource, LoadError, LoadedImage, SourceRegistry};
use medmark::render::RenderSpace;
use medmark::{Editor, EditorError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

#[derive(Parser, Debug)]
#[command(name = "medmark", about = "Print the measurements stored in an annotation file")]
struct Cli {
    /// Image the annotations were made on
    image: PathBuf,

    /// Annotation file (full or pivot-only JSON)
    annotations: PathBuf,

    /// Configuration file; defaults to the user config directory
    #[arg(long, env = "MEDMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Pixel spacing in millimetres, overriding the spacing a DICOM file carries
    #[arg(long)]
    spacing: Option<f64>,

    /// Also list pivot points
    #[arg(long)]
    pivots: bool,
}

/// Registry wrapper that stamps a fixed pixel spacing on every image when one is given.
struct WithSpacing<'a> {
    inner: &'a SourceRegistry,
    spacing: Option<f64>,
}

impl ImageSource for WithSpacing<'_> {
    fn id(&self) -> &'static str {
        "cli"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[]
    }

    fn load(&self, path: &Path) -> Result<LoadedImage, LoadError> {
        let image = self.inner.load(path)?;
        Ok(match self.spacing {
            Some(mm) => image.with_pixel_spacing(mm, mm),
            None => image,
        })
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::load_from_default_path().unwrap_or_default()),
    }
}

fn init_logging(config: &AppConfig) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(config.preferences.log_level.to_level_filter());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config);

    let registry = SourceRegistry::new();
    let source = WithSpacing {
        inner: &registry,
        spacing: cli.spacing,
    };

    let mut editor = Editor::new(config);
    editor.open_image(&source, &cli.image)?;
    editor.import_from_file(&cli.annotations)?;

    let scene = editor.scene(RenderSpace::Source);
    println!("{}", cli.image.display());
    if let Some(metadata) = editor.image().and_then(|image| image.metadata.as_deref()) {
        for line in metadata.lines() {
            println!("  {}", line);
        }
    }
    println!("  points: {}", scene.points.len());
    for line in &scene.lines {
        println!("  line {}-{}: {}", line.key.a(), line.key.b(), line.label);
    }
    for angle in &scene.angles {
        let (a, b, c) = angle.key.as_tuple();
        println!("  angle {}-{}-{}: {}", a, b, c, angle.label);
    }
    if cli.pivots {
        for entry in editor.pivot_summary() {
            println!("  pivot {}", entry);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("medmark: {}", e);
            ExitCode::FAILURE
        }
    }
}
