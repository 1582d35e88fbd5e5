//! Batch driver - one label file per row of a plant list CSV.
//!
//! A failing row is logged and counted; the remaining rows still run.

pub mod openscad;
pub mod record;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::error::LabelError;
use crate::layout::{generate_label, resolve};
use crate::scad::render_scad;
use crate::svg::{render_svg, LabelColors};
use crate::types::{LabelScene, RawLabelParams};
pub use openscad::OpenScad;
pub use record::{PlantRecord, OPTIONAL_COLUMNS, REQUIRED_COLUMNS};

/// Scratch directory (inside the output dir) for .scad files during STL runs
pub const TEMP_DIR_NAME: &str = "temp_scad";

/// Errors from a batch run or from a single row
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("row {row}: {source}")]
    Label {
        row: usize,
        #[source]
        source: LabelError,
    },
    #[error("OpenSCAD not available ({0}); install it from https://openscad.org/downloads.html")]
    OpenScadUnavailable(String),
    #[error("OpenSCAD failed on {file}: {stderr}")]
    OpenScadFailed { file: String, stderr: String },
    #[error("OpenSCAD timed out after {secs}s on {file}")]
    OpenScadTimeout { file: String, secs: u64 },
}

/// What each row turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Printable mesh, rendered by OpenSCAD
    Stl,
    /// OpenSCAD program
    Scad,
    /// Flat top-view preview
    Svg,
    /// Positioned scene as JSON
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Stl => "stl",
            OutputFormat::Scad => "scad",
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
        }
    }
}

/// Render one scene in a text format; `None` for STL, which needs OpenSCAD
pub fn render_scene(
    scene: &LabelScene,
    format: OutputFormat,
    colors: &LabelColors,
) -> Result<Option<String>, BatchError> {
    Ok(match format {
        OutputFormat::Scad => Some(render_scad(scene)),
        OutputFormat::Svg => Some(render_svg(scene, colors, false)),
        OutputFormat::Json => Some(serde_json::to_string_pretty(scene)?),
        OutputFormat::Stl => None,
    })
}

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub csv: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Keep the intermediate .scad files of an STL run
    pub keep_scad: bool,
    pub openscad: PathBuf,
    pub timeout: Duration,
    /// Label parameters rows do not override
    pub defaults: RawLabelParams,
    pub colors: LabelColors,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            csv: PathBuf::from("plant list.csv"),
            output_dir: PathBuf::from("generated_labels"),
            format: OutputFormat::Stl,
            keep_scad: false,
            openscad: PathBuf::from("openscad"),
            timeout: Duration::from_secs(120),
            defaults: RawLabelParams::default(),
            colors: LabelColors::default(),
        }
    }
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub successful: usize,
    pub failed: usize,
    /// Files written, in row order
    pub outputs: Vec<PathBuf>,
}

impl BatchSummary {
    /// A run counts as successful when at least one label was written
    pub fn is_success(&self) -> bool {
        self.successful > 0
    }
}

/// Generate one label file per row of `options.csv`.
///
/// Fails as a whole only when the run cannot start: unreadable CSV, missing
/// required columns, no OpenSCAD for an STL run, or an unwritable output
/// directory.
pub fn run_batch(options: &BatchOptions) -> Result<BatchSummary, BatchError> {
    let openscad = if options.format == OutputFormat::Stl {
        let openscad = OpenScad::new(&options.openscad, options.timeout);
        info!("OpenSCAD found: {}", openscad.version()?);
        Some(openscad)
    } else {
        None
    };

    let mut reader = csv::Reader::from_path(&options.csv)?;
    check_columns(reader.headers()?)?;
    let rows: Vec<Result<PlantRecord, csv::Error>> = reader.deserialize().collect();
    info!("Loaded {} plants from {}", rows.len(), options.csv.display());

    fs::create_dir_all(&options.output_dir)?;
    let temp_dir = options.output_dir.join(TEMP_DIR_NAME);
    if openscad.is_some() {
        fs::create_dir_all(&temp_dir)?;
    }

    let mut summary = BatchSummary::default();
    let mut stems: HashSet<String> = HashSet::new();
    let total = rows.len();

    for (index, row) in rows.into_iter().enumerate() {
        let row_number = index + 1;
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                error!("[{}/{}] unreadable row: {}", row_number, total, e);
                summary.failed += 1;
                continue;
            }
        };
        info!("[{}/{}] Processing: {}", row_number, total, record.common_name);

        let stem = unique_stem(&mut stems, &record.common_name, row_number);
        let result = match &openscad {
            Some(openscad) => process_stl(&record, row_number, &stem, options, openscad, &temp_dir),
            None => process_text(&record, row_number, &stem, options),
        };

        match result {
            Ok(path) => {
                info!("Created {}", path.display());
                summary.successful += 1;
                summary.outputs.push(path);
            }
            Err(e) => {
                error!("[{}/{}] {} failed: {}", row_number, total, record.common_name, e);
                summary.failed += 1;
            }
        }
    }

    if openscad.is_some() {
        if options.keep_scad {
            info!("SCAD files kept in {}", temp_dir.display());
        } else if let Err(e) = fs::remove_dir_all(&temp_dir) {
            warn!("Could not clean up {}: {}", temp_dir.display(), e);
        }
    }

    info!(
        "Generation complete: {} successful, {} failed, output in {}",
        summary.successful,
        summary.failed,
        options.output_dir.display()
    );
    Ok(summary)
}

fn check_columns(headers: &csv::StringRecord) -> Result<(), BatchError> {
    let present: Vec<&str> = headers.iter().map(str::trim).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !present.contains(*col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(BatchError::MissingColumns(missing));
    }
    for col in OPTIONAL_COLUMNS {
        if !present.contains(&col) {
            info!("Note: '{}' column not found, using defaults", col);
        }
    }
    Ok(())
}

/// File stem for a row, suffixed `_2`, `_3`, ... when an earlier row took it
fn unique_stem(issued: &mut HashSet<String>, common_name: &str, row: usize) -> String {
    let mut stem = record::sanitize_filename(common_name);
    if stem.is_empty() {
        stem = format!("label_{}", row);
    }
    if issued.insert(stem.clone()) {
        return stem;
    }
    let unique = (2..)
        .map(|n| format!("{}_{}", stem, n))
        .find(|candidate| !issued.contains(candidate))
        .unwrap_or_else(|| format!("{}_{}", stem, row));
    warn!("Duplicate file name '{}', writing '{}' instead", stem, unique);
    issued.insert(unique.clone());
    unique
}

fn build_scene(
    record: &PlantRecord,
    row: usize,
    defaults: &RawLabelParams,
) -> Result<LabelScene, BatchError> {
    let label_err = |source| BatchError::Label { row, source };
    let (params, content) = record.to_label(defaults).map_err(label_err)?;
    let config = resolve(&params).map_err(label_err)?;
    generate_label(&config, &content).map_err(label_err)
}

fn process_text(
    record: &PlantRecord,
    row: usize,
    stem: &str,
    options: &BatchOptions,
) -> Result<PathBuf, BatchError> {
    let scene = build_scene(record, row, &options.defaults)?;
    let text = render_scene(&scene, options.format, &options.colors)?.unwrap_or_default();
    let path = options
        .output_dir
        .join(format!("{}.{}", stem, options.format.extension()));
    fs::write(&path, text)?;
    Ok(path)
}

fn process_stl(
    record: &PlantRecord,
    row: usize,
    stem: &str,
    options: &BatchOptions,
    openscad: &OpenScad,
    temp_dir: &Path,
) -> Result<PathBuf, BatchError> {
    let scene = build_scene(record, row, &options.defaults)?;
    let scad_path = temp_dir.join(format!("{}.scad", stem));
    fs::write(&scad_path, render_scad(&scene))?;
    let stl_path = options.output_dir.join(format!("{}.stl", stem));
    info!("Rendering {}...", stl_path.display());
    openscad.render_stl(&scad_path, &stl_path)?;
    Ok(stl_path)
}
