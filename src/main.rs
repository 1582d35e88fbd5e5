use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use env_logger::Env;
use log::{error, info};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;

use plantlabel::batch::{run_batch, BatchError, BatchOptions, OutputFormat};
use plantlabel::scad::render_scad;
use plantlabel::svg::{render_svg, LabelColors};
use plantlabel::{generate_label, resolve, ContentSet, LabelError, RawLabelParams, ShowFlags};

/// Generate 3D printable plant labels
#[derive(Debug, Parser)]
#[command(name = "plantlabel", version, about)]
struct Cli {
    /// JSON file with label defaults (any subset of the label parameters)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Log level filter (overrides RUST_LOG), e.g. "info" or "debug"
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// One label per row of a plant list CSV
    Batch(BatchArgs),
    /// A single label from command-line fields, printed to stdout
    Render(RenderArgs),
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// CSV file with plant data
    #[arg(long, default_value = "plant list.csv", value_hint = ValueHint::FilePath)]
    csv: PathBuf,
    /// Output directory for generated files
    #[arg(long, default_value = "generated_labels", value_hint = ValueHint::DirPath)]
    output_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Stl)]
    format: OutputFormat,
    /// Keep the temporary .scad files of an STL run
    #[arg(long)]
    keep_scad: bool,
    /// OpenSCAD executable
    #[arg(long, default_value = "openscad", value_hint = ValueHint::ExecutablePath)]
    openscad: PathBuf,
    /// Seconds before a single OpenSCAD render is abandoned
    #[arg(long, default_value_t = 120)]
    timeout: u64,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[arg(long, default_value = "")]
    common_name: String,
    #[arg(long, default_value = "")]
    scientific_name: String,
    #[arg(long, default_value = "")]
    nickname: String,
    /// Water level, 0-4
    #[arg(long, default_value_t = 2)]
    water: u8,
    /// Light level, 0-4
    #[arg(long, default_value_t = 2)]
    light: u8,
    /// Show the cactus (let soil dry between waterings)
    #[arg(long)]
    dry: bool,
    #[arg(long)]
    spike: bool,
    #[arg(long)]
    holes: bool,
    #[arg(long)]
    no_frame: bool,
    /// Label width in mm
    #[arg(long)]
    width: Option<f64>,
    /// Label height in mm
    #[arg(long)]
    height: Option<f64>,
    #[arg(long, value_enum, default_value_t = RenderFormat::Scad)]
    format: RenderFormat,
}

/// Text formats `render` can print; STL needs a file and goes through `batch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RenderFormat {
    Scad,
    Svg,
    Json,
}

#[derive(Debug, Error)]
enum RenderError {
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn load_defaults(path: Option<&PathBuf>) -> Result<RawLabelParams, BatchError> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let params = serde_json::from_str(&text)?;
            info!("Label defaults loaded from {}", path.display());
            Ok(params)
        }
        None => Ok(RawLabelParams::default()),
    }
}

fn run_render(args: RenderArgs, defaults: RawLabelParams) -> Result<String, RenderError> {
    let params = RawLabelParams {
        width: args.width.unwrap_or(defaults.width),
        height: args.height.unwrap_or(defaults.height),
        ..defaults
    };
    let content = ContentSet {
        common_name: args.common_name,
        scientific_name: args.scientific_name,
        nickname: args.nickname,
        water_level: args.water,
        light_level: args.light,
        show: ShowFlags {
            dry_soil: args.dry,
            spike: args.spike,
            holes: args.holes,
            frame: !args.no_frame,
            ..ShowFlags::default()
        },
    };

    let config = resolve(&params)?;
    let scene = generate_label(&config, &content)?;
    Ok(match args.format {
        RenderFormat::Scad => render_scad(&scene),
        RenderFormat::Svg => render_svg(&scene, &LabelColors::default(), false),
        RenderFormat::Json => serde_json::to_string_pretty(&scene)?,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env = Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(level) = &cli.log_level {
        builder.parse_filters(level);
    }
    builder.init();

    let defaults = match load_defaults(cli.config.as_ref()) {
        Ok(defaults) => defaults,
        Err(e) => {
            error!("Could not load label defaults: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Batch(args) => {
            let options = BatchOptions {
                csv: args.csv,
                output_dir: args.output_dir,
                format: args.format,
                keep_scad: args.keep_scad,
                openscad: args.openscad,
                timeout: Duration::from_secs(args.timeout),
                defaults,
                colors: LabelColors::default(),
            };
            match run_batch(&options) {
                Ok(summary) if summary.is_success() => {
                    info!("Ready for 3D printing! Check '{}'", options.output_dir.display());
                    ExitCode::SUCCESS
                }
                Ok(_) => {
                    error!("No labels were generated, see the errors above");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    error!("Generation failed: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Render(args) => match run_render(args, defaults) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        },
    }
}
