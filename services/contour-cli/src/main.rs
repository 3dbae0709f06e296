//! Contour stamping command-line tool.
//!
//! `march` reads an image, contours it with N worker threads and writes the
//! result. `init-templates` writes a default set of sixteen contour tiles.

mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use contour_engine::{io, ContourPipeline, ContourTemplateSet, Step, DEFAULT_STEP};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use config::FlagOverrides;

#[derive(Parser, Debug)]
#[command(name = "contour-cli")]
#[command(about = "Parallel marching-squares contour stamper")]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Contour an image
    March(MarchArgs),

    /// Write the default contour templates as <DIR>/<code>.ppm
    InitTemplates(InitArgs),
}

#[derive(Args, Debug)]
struct MarchArgs {
    /// Input image
    input: PathBuf,

    /// Output image (format from extension, PPM by default)
    output: PathBuf,

    /// Number of worker threads
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    workers: u32,

    /// Template directory holding 0.ppm .. 15.ppm
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Horizontal sampling step
    #[arg(long)]
    step_x: Option<usize>,

    /// Vertical sampling step
    #[arg(long)]
    step_y: Option<usize>,

    /// Brightness at or below which a sample is dark
    #[arg(long)]
    threshold: Option<u8>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the run report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Directory to write the templates into
    dir: PathBuf,

    /// Template width
    #[arg(long, default_value_t = DEFAULT_STEP)]
    step_x: usize,

    /// Template height
    #[arg(long, default_value_t = DEFAULT_STEP)]
    step_y: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    let result = match cli.command {
        Command::March(args) => march(args),
        Command::InitTemplates(args) => init_templates(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("contour-cli failed: {e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.with_thread_names(true).json().init(),
    }
}

fn march(args: MarchArgs) -> Result<()> {
    let flags = FlagOverrides {
        templates: args.templates,
        step_x: args.step_x,
        step_y: args.step_y,
        threshold: args.threshold,
    };
    let config = config::resolve(args.config.as_deref(), &flags)?;
    let template_dir = config.template_dir.clone();

    let pipeline = ContourPipeline::from_config(config, args.workers as usize)
        .with_context(|| format!("Failed to load templates from {}", template_dir.display()))?;

    let image = io::read_image(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    info!(input = %args.input.display(), dims = %image.dimensions(), "Loaded input image");

    let output = pipeline.run(image).context("Contour pass failed")?;

    io::write_image(&output.image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(output = %args.output.display(), total_ms = output.report.total_ms, "Wrote contoured image");

    if let Some(path) = &args.report {
        write_report(path, &output.report)?;
    }
    Ok(())
}

fn write_report(path: &Path, report: &contour_engine::RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(())
}

fn init_templates(args: InitArgs) -> Result<()> {
    let step = Step::new(args.step_x, args.step_y);
    if step.x == 0 || step.y == 0 {
        anyhow::bail!("template size must be positive, got {}x{}", step.x, step.y);
    }
    let templates = ContourTemplateSet::render_default(step)?;
    templates
        .write_dir(&args.dir)
        .with_context(|| format!("Failed to write templates to {}", args.dir.display()))?;
    info!(dir = %args.dir.display(), step_x = step.x, step_y = step.y, "Wrote default templates");
    Ok(())
}
