//! rondel: measure and compare circular objects in photographs.
//!
//! `measure` runs the pipeline on one image and prints the result;
//! `compare` runs it on two images independently and prints the
//! difference report. Both write the annotated verification images
//! when an output path is given.
//!
//! # Usage
//!
//! ```text
//! rondel measure [OPTIONS] <IMAGE_PATH>
//! rondel compare [OPTIONS] <IMAGE_PATH_1> <IMAGE_PATH_2>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rondel_pipeline::{
    Calibration, Measurement, MeasurementOutcome, MeasurementResult, PipelineConfig,
    PipelineError,
};

/// Circular-object diameter measurement from photographs.
#[derive(Parser)]
#[command(name = "rondel", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Measure the object diameter in a single image.
    Measure {
        /// Path to the input image (PNG, JPEG, BMP, WebP).
        image_path: PathBuf,

        /// Write the annotated verification image to this path.
        #[arg(long)]
        annotated: Option<PathBuf>,

        #[command(flatten)]
        params: PipelineArgs,
    },
    /// Measure two images independently and compare the results.
    Compare {
        /// Path to the first input image.
        image_path_1: PathBuf,

        /// Path to the second input image.
        image_path_2: PathBuf,

        /// Write the first annotated verification image to this path.
        #[arg(long)]
        annotated_1: Option<PathBuf>,

        /// Write the second annotated verification image to this path.
        #[arg(long)]
        annotated_2: Option<PathBuf>,

        #[command(flatten)]
        params: PipelineArgs,
    },
}

/// Pipeline parameters shared by both subcommands.
#[derive(Args)]
struct PipelineArgs {
    /// Binary threshold (foreground iff intensity > threshold).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Bilateral filter neighborhood diameter (odd).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_BILATERAL_DIAMETER)]
    diameter: u32,

    /// Bilateral filter intensity-difference sigma.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_COLOR_SIGMA)]
    sigma_color: u32,

    /// Bilateral filter spatial-distance sigma.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SPACE_SIGMA)]
    sigma_space: u32,

    /// Calibration: fitted-radius pixels corresponding to --calibration-mm.
    #[arg(long, default_value_t = Calibration::DEFAULT_PIXELS)]
    calibration_px: f64,

    /// Calibration: millimeters corresponding to --calibration-px.
    #[arg(long, default_value_t = Calibration::DEFAULT_MILLIMETERS)]
    calibration_mm: f64,
}

impl PipelineArgs {
    fn to_config(&self) -> PipelineConfig {
        PipelineConfig {
            threshold: self.threshold,
            bilateral_diameter: self.diameter,
            color_sigma: self.sigma_color,
            space_sigma: self.sigma_space,
            calibration: Calibration {
                pixels: self.calibration_px,
                millimeters: self.calibration_mm,
            },
            ..PipelineConfig::default()
        }
    }
}

/// Read and measure one image. File-read failures surface through the
/// same decode-error channel as corrupt image data.
fn run_measurement(path: &Path, config: &PipelineConfig) -> MeasurementResult {
    let bytes = std::fs::read(path)
        .map_err(|e| PipelineError::ImageDecode(image::ImageError::IoError(e)))?;
    rondel_pipeline::measure(&bytes, config)
}

/// Save the annotated image when an output path was requested.
fn save_annotated(measurement: &Measurement, path: Option<&Path>) -> Result<(), String> {
    let Some(path) = path else {
        return Ok(());
    };
    measurement
        .annotated
        .save(path)
        .map_err(|e| format!("Error writing {}: {e}", path.display()))
}

fn print_measurement(measurement: &Measurement) {
    println!("Pixels: {:.2}", measurement.total_pixels);
    match &measurement.outcome {
        MeasurementOutcome::Measured {
            circle,
            diameter_mm,
        } => {
            println!("Diameter: {diameter_mm:.2} mm");
            println!(
                "Fitted circle: center ({:.2}, {:.2}), radius {:.2} px, rms residual {:.2} px",
                circle.center.x, circle.center.y, circle.radius, circle.rms_residual,
            );
        }
        MeasurementOutcome::NoObjectFound => println!("Diameter: no measurement (no object found)"),
        MeasurementOutcome::DegenerateBoundary => {
            println!("Diameter: no measurement (boundary too degenerate to fit)");
        }
    }
}

fn run_measure(image_path: &Path, annotated: Option<&Path>, config: &PipelineConfig) -> ExitCode {
    match run_measurement(image_path, config) {
        Ok(measurement) => {
            print_measurement(&measurement);
            if let Err(msg) = save_annotated(&measurement, annotated) {
                eprintln!("{msg}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error measuring {}: {e}", image_path.display());
            ExitCode::FAILURE
        }
    }
}

fn run_compare(
    paths: (&Path, &Path),
    annotated: (Option<&Path>, Option<&Path>),
    config: &PipelineConfig,
) -> ExitCode {
    // The two measurements are fully independent; run them in parallel.
    let results = std::thread::scope(|s| {
        let first = s.spawn(|| run_measurement(paths.0, config));
        let second = s.spawn(|| run_measurement(paths.1, config));
        (first.join(), second.join())
    });
    let (Ok(first), Ok(second)) = results else {
        eprintln!("internal error: a measurement thread panicked");
        return ExitCode::FAILURE;
    };

    let report = rondel_pipeline::ComparisonReport::from_results(&first, &second);
    println!("{}", rondel_report::to_text(&report));

    for (result, out) in [(&first, annotated.0), (&second, annotated.1)] {
        if let Ok(measurement) = result
            && let Err(msg) = save_annotated(measurement, out)
        {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    }

    // A comparison is still useful when one side failed, but flag it.
    if first.is_err() && second.is_err() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Measure {
            image_path,
            annotated,
            params,
        } => {
            let config = params.to_config();
            if let Err(e) = config.validate() {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
            run_measure(&image_path, annotated.as_deref(), &config)
        }
        Command::Compare {
            image_path_1,
            image_path_2,
            annotated_1,
            annotated_2,
            params,
        } => {
            let config = params.to_config();
            if let Err(e) = config.validate() {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
            run_compare(
                (&image_path_1, &image_path_2),
                (annotated_1.as_deref(), annotated_2.as_deref()),
                &config,
            )
        }
    }
}
