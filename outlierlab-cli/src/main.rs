//! OutlierLab CLI: analyze, inspect, and config commands.
//!
//! Commands:
//! - `analyze`: run the outlier analysis, print tables, write plots and artifacts
//! - `inspect`: list sheets, headers, and row count of an input file
//! - `init-config`: write a default TOML config

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use outlierlab_core::data::open_source;
use outlierlab_core::distribution::PpReference;
use outlierlab_core::regions::RegionScope;
use outlierlab_runner::{
    init_tracing, render_report, run_analysis, save_artifacts, write_plots, AnalysisConfig,
};

#[derive(Parser)]
#[command(
    name = "outlierlab",
    about = "OutlierLab CLI: descriptive outlier analysis of regional values"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis and print the result tables.
    Analyze(AnalyzeArgs),
    /// Show sheets, headers, and row count of an input file.
    Inspect {
        /// Input file (xlsx, xlsm, xls, ods, csv, parquet).
        #[arg(long)]
        input: PathBuf,

        /// Workbook sheet. Defaults to the first sheet.
        #[arg(long)]
        sheet: Option<String>,
    },
    /// Write a config file with every default spelled out.
    InitConfig {
        /// Destination path.
        #[arg(long, default_value = "outlierlab.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(clap::Args)]
struct AnalyzeArgs {
    /// Path to a TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input file (xlsx, xlsm, xls, ods, csv, parquet).
    #[arg(long)]
    input: Option<PathBuf>,

    /// Workbook sheet. Defaults to the first sheet.
    #[arg(long)]
    sheet: Option<String>,

    /// Header of the region column.
    #[arg(long)]
    region_column: Option<String>,

    /// Header of the value column.
    #[arg(long)]
    value_column: Option<String>,

    /// Directory for plots and artifacts.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Number of regions listed per ranking.
    #[arg(long)]
    top: Option<usize>,

    /// Box-and-whisker multiplier k.
    #[arg(long)]
    whisker_coef: Option<f64>,

    /// Lower bound of the moderate tier, in IQR units from the mean.
    #[arg(long)]
    moderate_coef: Option<f64>,

    /// Lower bound of the extreme tier, in IQR units from the mean.
    #[arg(long)]
    extreme_coef: Option<f64>,

    /// Z-score threshold.
    #[arg(long)]
    z_threshold: Option<f64>,

    /// Count region outliers within each region or on the whole column.
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    /// Normal distribution for the P-P plot.
    #[arg(long, value_enum)]
    pp_reference: Option<PpReferenceArg>,

    /// Skip the Q-Q / P-P plots.
    #[arg(long, default_value_t = false)]
    no_plots: bool,

    /// Skip report.json and regions.csv.
    #[arg(long, default_value_t = false)]
    no_artifacts: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Within,
    Global,
}

impl From<ScopeArg> for RegionScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Within => RegionScope::WithinRegion,
            ScopeArg::Global => RegionScope::Global,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PpReferenceArg {
    Fitted,
    Standard,
}

impl From<PpReferenceArg> for PpReference {
    fn from(arg: PpReferenceArg) -> Self {
        match arg {
            PpReferenceArg::Fitted => PpReference::Fitted,
            PpReferenceArg::Standard => PpReference::Standard,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Inspect { input, sheet } => run_inspect(input, sheet),
        Commands::InitConfig { path, force } => run_init_config(path, force),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    apply_overrides(&mut config, args);
    config.validate()?;
    tracing::debug!(?config, "effective configuration");

    let report = run_analysis(&config)
        .with_context(|| format!("analysis of {} failed", config.input.path.display()))?;

    print!("{}", render_report(&report));

    let output_dir = &config.report.output_dir;
    if config.report.plots {
        println!();
        for path in write_plots(&report, output_dir)? {
            println!("Plot saved: {}", path.display());
        }
    }
    if config.report.artifacts {
        let paths = save_artifacts(&report, output_dir)?;
        println!("Report saved: {}", paths.report.display());
        println!("Rankings saved: {}", paths.regions.display());
    }

    Ok(())
}

fn apply_overrides(config: &mut AnalysisConfig, args: AnalyzeArgs) {
    if let Some(input) = args.input {
        config.input.path = input;
    }
    if args.sheet.is_some() {
        config.input.sheet = args.sheet;
    }
    if let Some(column) = args.region_column {
        config.input.region_column = column;
    }
    if let Some(column) = args.value_column {
        config.input.value_column = column;
    }
    if let Some(dir) = args.output_dir {
        config.report.output_dir = dir;
    }
    if let Some(top) = args.top {
        config.report.top_n = top;
    }
    if let Some(k) = args.whisker_coef {
        config.outliers.whisker_coef = k;
    }
    if let Some(c) = args.moderate_coef {
        config.classification.moderate_coef = c;
    }
    if let Some(c) = args.extreme_coef {
        config.classification.extreme_coef = c;
    }
    if let Some(z) = args.z_threshold {
        config.outliers.z_threshold = z;
    }
    if let Some(scope) = args.scope {
        config.outliers.scope = scope.into();
    }
    if let Some(reference) = args.pp_reference {
        config.report.pp_reference = reference.into();
    }
    if args.no_plots {
        config.report.plots = false;
    }
    if args.no_artifacts {
        config.report.artifacts = false;
    }
}

fn run_inspect(input: PathBuf, sheet: Option<String>) -> Result<()> {
    let source = open_source(&input, sheet)?;
    let summary = source.describe()?;

    println!("File:     {}", input.display());
    println!("Format:   {}", summary.format);
    if !summary.sheets.is_empty() {
        println!("Sheets:   {}", summary.sheets.join(", "));
    }
    if let Some(active) = &summary.active_sheet {
        println!("Sheet:    {active}");
    }
    println!("Rows:     {}", summary.rows);
    println!();
    println!("{:<4} {}", "#", "Header");
    println!("{}", "-".repeat(48));
    for (i, header) in summary.headers.iter().enumerate() {
        println!("{:<4} {}", i + 1, header);
    }
    Ok(())
}

fn run_init_config(path: PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        );
    }
    let toml = AnalysisConfig::default().to_toml()?;
    std::fs::write(&path, toml).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Config written to: {}", path.display());
    Ok(())
}
