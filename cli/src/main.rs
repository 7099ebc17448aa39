use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use floorplan::PlanError;
use floorplan::codec::{self, ImportOptions};
use floorplan::config::EditorConfig;
use floorplan::engine::EngineCore;
use floorplan::render::RenderSnapshot;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("--fallback-scale must be a positive number, got {0}")]
    InvalidFallback(f64),
}

#[derive(Parser, Debug)]
#[command(name = "floorplan", about = "Inspect, validate and migrate floor-plan layout files")]
struct Cli {
    /// Append furniture dimensions to labels.
    #[arg(long, global = true)]
    show_dimensions: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the scale and a summary of every entity.
    Inspect(FileArgs),
    /// Check that a layout imports cleanly.
    Validate(FileArgs),
    /// Rewrite any accepted layout version as canonical JSON.
    Migrate(MigrateArgs),
}

#[derive(Args, Debug)]
struct FileArgs {
    file: PathBuf,

    #[command(flatten)]
    fallback: FallbackArgs,
}

#[derive(Args, Debug)]
struct MigrateArgs {
    file: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(long, short)]
    out: Option<PathBuf>,

    #[command(flatten)]
    fallback: FallbackArgs,
}

#[derive(Args, Debug, Default)]
struct FallbackArgs {
    /// Accept furniture without a scale by assuming the fallback scale.
    #[arg(long)]
    use_fallback_scale: bool,

    /// Fallback pixels per foot; implies --use-fallback-scale.
    #[arg(long)]
    fallback_scale: Option<f64>,
}

impl FallbackArgs {
    fn enabled(&self) -> bool {
        self.use_fallback_scale || self.fallback_scale.is_some()
    }

    fn apply(&self, mut config: EditorConfig) -> Result<EditorConfig, CliError> {
        if let Some(scale) = self.fallback_scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(CliError::InvalidFallback(scale));
            }
            config.fallback_pixels_per_foot = scale;
        }
        Ok(config)
    }

    fn options(&self, config: &EditorConfig) -> ImportOptions {
        ImportOptions { fallback_pixels_per_foot: self.enabled().then_some(config.fallback_pixels_per_foot) }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Plan(e)) => {
            eprintln!("error [{}]: {e}", e.error_code());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = EditorConfig::from_env()?;
    config.show_dimensions |= cli.show_dimensions;

    match cli.command {
        Command::Inspect(args) => run_inspect(config, &args),
        Command::Validate(args) => run_validate(config, &args),
        Command::Migrate(args) => run_migrate(config, &args),
    }
}

/// Read and import a layout into a fresh editor session.
fn load(config: EditorConfig, file: &Path, fallback: &FallbackArgs) -> Result<EngineCore, CliError> {
    let config = fallback.apply(config)?;
    let text = fs::read_to_string(file)?;
    let mut core = EngineCore::new(config);
    core.import_json(&text, fallback.enabled())?;
    Ok(core)
}

fn run_inspect(config: EditorConfig, args: &FileArgs) -> Result<(), CliError> {
    let core = load(config, &args.file, &args.fallback)?;
    for line in describe(&core.snapshot()) {
        println!("{line}");
    }
    Ok(())
}

fn run_validate(config: EditorConfig, args: &FileArgs) -> Result<(), CliError> {
    let config = args.fallback.apply(config)?;
    let text = fs::read_to_string(&args.file)?;
    let layout = codec::import(&text, &args.fallback.options(&config))?;
    let fallback = if layout.used_fallback_scale { ", fallback scale applied" } else { "" };
    println!(
        "ok: {} ({:?} format, {} polygons, {} objects{fallback})",
        args.file.display(),
        layout.format,
        layout.polygons.len(),
        layout.objects.len(),
    );
    Ok(())
}

fn run_migrate(config: EditorConfig, args: &MigrateArgs) -> Result<(), CliError> {
    let core = load(config, &args.file, &args.fallback)?;
    let rendered = core.export_json()?;
    match &args.out {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))?;
            tracing::info!(from = %args.file.display(), to = %path.display(), "layout migrated");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Human-readable summary of a session snapshot.
fn describe(snapshot: &RenderSnapshot) -> Vec<String> {
    let mut lines = Vec::new();
    match snapshot.pixels_per_foot {
        Some(ppf) => lines.push(format!("scale: {ppf} px/ft")),
        None => lines.push("scale: uncalibrated".to_owned()),
    }

    lines.push(format!("polygons: {}", snapshot.polygons.len()));
    for polygon in &snapshot.polygons {
        lines.push(format!(
            "  {}: {} vertices, centroid ({:.1}, {:.1})",
            polygon.label,
            polygon.vertices.len(),
            polygon.centroid.x,
            polygon.centroid.y,
        ));
    }

    lines.push(format!("objects: {}", snapshot.objects.len()));
    for object in &snapshot.objects {
        lines.push(format!(
            "  {}: at ({:.1}, {:.1}), {:.1} x {:.1} px, rotated {} deg",
            object.display_text,
            object.top_left.x,
            object.top_left.y,
            object.size.width,
            object.size.height,
            object.rotation_degrees,
        ));
    }
    lines
}
