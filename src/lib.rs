//! Widerlabel: WIDER Face annotations to YOLO and Pascal VOC.
//!
//! WIDER Face ships its boxes in a flat text format: an image path, a box
//! count, then one `x y w h ...` line per face. Widerlabel parses that
//! format once and feeds each image record to two independent writers, one
//! producing normalized YOLO label files and one producing VOC XML
//! documents. A separate filter pass trims an annotation file down to the
//! images actually present on disk.
//!
//! # Modules
//!
//! - [`wider`]: annotation records and the line parser
//! - [`yolo`], [`voc`]: per-image output writers
//! - [`filter`], [`conversion`], [`pipeline`]: the passes
//! - [`error`]: error types for widerlabel operations

pub mod config;
pub mod conversion;
pub mod error;
pub mod filter;
pub mod image_size;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod sink;
pub mod voc;
pub mod wider;
pub mod yolo;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;

pub use error::WiderError;

use config::{create_output_dir, PartialConfig};
use image_size::HeaderSizeResolver;
use voc::VocWriter;
use yolo::YoloLabelWriter;

/// The widerlabel CLI application.
#[derive(Parser)]
#[command(name = "widerlabel")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Format of the summary printed on stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text, global = true)]
    report: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Keep only annotation records whose image exists.
    Filter(FilterArgs),
    /// Write YOLO labels and VOC XML for every annotated image.
    Convert(ConvertArgs),
    /// Filter, then convert the filtered file.
    Run(RunArgs),
}

/// Arguments for the filter subcommand.
#[derive(clap::Args)]
struct FilterArgs {
    /// WIDER annotation file to read.
    #[arg(long, env = "WIDER_ANNOTATIONS")]
    annotations: PathBuf,

    /// Directory the image paths in the annotation file are relative to.
    #[arg(long, env = "WIDER_IMAGES")]
    images: PathBuf,

    /// Filtered annotation file to write.
    #[arg(long, env = "WIDER_FILTERED")]
    output: PathBuf,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// WIDER annotation file to read.
    #[arg(long, env = "WIDER_ANNOTATIONS")]
    annotations: PathBuf,

    /// Directory the image paths in the annotation file are relative to.
    #[arg(long, env = "WIDER_IMAGES")]
    images: PathBuf,

    /// Output directory for YOLO label files.
    #[arg(long, env = "WIDER_YOLO_DIR")]
    yolo_dir: PathBuf,

    /// Output directory for VOC XML files.
    #[arg(long, env = "WIDER_VOC_DIR")]
    voc_dir: PathBuf,
}

/// Arguments for the run subcommand.
///
/// Every path may come from `--config`; flags override the file.
#[derive(clap::Args)]
struct RunArgs {
    /// YAML file with annotations, images, filtered, yolo_dir and voc_dir.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, env = "WIDER_ANNOTATIONS")]
    annotations: Option<PathBuf>,

    #[arg(long, env = "WIDER_IMAGES")]
    images: Option<PathBuf>,

    /// Where the filtered annotation file is written before conversion.
    #[arg(long, env = "WIDER_FILTERED")]
    filtered: Option<PathBuf>,

    #[arg(long, env = "WIDER_YOLO_DIR")]
    yolo_dir: Option<PathBuf>,

    #[arg(long, env = "WIDER_VOC_DIR")]
    voc_dir: Option<PathBuf>,
}

/// Run the widerlabel CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), WiderError> {
    let cli = Cli::parse();
    logging::init_logging(logging::level_for(cli.verbose, cli.quiet));

    match cli.command {
        Some(Commands::Filter(args)) => run_filter(args, cli.report),
        Some(Commands::Convert(args)) => run_convert(args, cli.report),
        Some(Commands::Run(args)) => run_pipeline(args, cli.report),
        None => {
            println!("widerlabel {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert WIDER Face annotations to YOLO and Pascal VOC.");
            println!();
            println!("Run 'widerlabel --help' for usage information.");
            Ok(())
        }
    }
}

fn run_filter(args: FilterArgs, format: ReportFormat) -> Result<(), WiderError> {
    let report = filter::filter_annotations(&args.annotations, &args.images, &args.output)?;
    print_report(&report, format)
}

fn run_convert(args: ConvertArgs, format: ReportFormat) -> Result<(), WiderError> {
    create_output_dir(&args.yolo_dir)?;
    create_output_dir(&args.voc_dir)?;

    let yolo = YoloLabelWriter::new(args.yolo_dir);
    let voc = VocWriter::new(args.voc_dir);
    let report = conversion::convert_annotations(
        &args.annotations,
        &args.images,
        &HeaderSizeResolver,
        &[&yolo, &voc],
    )?;
    print_report(&report, format)
}

fn run_pipeline(args: RunArgs, format: ReportFormat) -> Result<(), WiderError> {
    let base = match &args.config {
        Some(path) => PartialConfig::from_yaml_file(path)?,
        None => PartialConfig::default(),
    };
    let config = base
        .merge(PartialConfig {
            annotations: args.annotations,
            images: args.images,
            filtered: args.filtered,
            yolo_dir: args.yolo_dir,
            voc_dir: args.voc_dir,
        })
        .resolve()?;

    let report = pipeline::run_pipeline(&config, &HeaderSizeResolver)?;
    print_report(&report, format)
}

fn print_report<R>(report: &R, format: ReportFormat) -> Result<(), WiderError>
where
    R: Serialize + std::fmt::Display,
{
    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        ReportFormat::Text => print!("{}", report),
    }
    Ok(())
}
