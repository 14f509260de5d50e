//! Plan surface CLI - analyze the land-cover surfaces of a site plan

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use plan_surface::constants::ANNOTATED_SUFFIX;
use plan_surface::data::{is_supported_file, load_image, save_image};
use plan_surface::{AnalysisConfig, AnalysisError, analyze, report};

#[derive(Parser)]
#[command(name = "plan-surface")]
#[command(author, version, about = "Site plan surface analysis", long_about = None)]
struct Cli {
    /// Input plan image (png, jpg, jpeg, ...)
    input: PathBuf,

    /// Annotated output image [default: <input>_annotated.png]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file [default: user config dir, else built-in]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured color tolerance
    #[arg(short, long, allow_negative_numbers = true)]
    tolerance: Option<i64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "plan".to_string());
    input.with_file_name(format!("{}{}.png", stem, ANNOTATED_SUFFIX))
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig, AnalysisError> {
    let config = match &cli.config {
        Some(path) => AnalysisConfig::load_from_path(path)?,
        None => AnalysisConfig::load_from_default_path().unwrap_or_default(),
    };
    Ok(match cli.tolerance {
        Some(tolerance) => config.with_tolerance(tolerance),
        None => config,
    })
}

/// Level requested on the command line, if any.
fn verbosity_level(verbose: u8) -> Option<log::LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

/// Level used while the configuration itself is being loaded.
fn provisional_level(verbose: u8) -> log::LevelFilter {
    verbosity_level(verbose).unwrap_or(log::LevelFilter::Warn)
}

/// Install the logger before the config is read so its warnings are shown.
/// The logger passes everything; `log::set_max_level` does the filtering.
fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .init();
    log::set_max_level(provisional_level(verbose));
}

/// Apply the configured level unless the command line chose one.
fn apply_config_level(verbose: u8, config: &AnalysisConfig) {
    if verbosity_level(verbose).is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }
}

fn run(cli: &Cli, config: &AnalysisConfig) -> Result<(), AnalysisError> {
    if !is_supported_file(&cli.input) {
        log::warn!("{:?} has an unexpected extension, trying to decode anyway", cli.input);
    }

    let plan = load_image(&cli.input)?;
    let outcome = analyze(&plan, config)?;

    let output = cli.output.clone().unwrap_or_else(|| default_output(&cli.input));
    save_image(&output, &outcome.annotated)?;
    log::info!("Annotated image written to {:?}", output);

    if cli.json {
        let json = report::to_json(&outcome.report).map_err(|e| {
            AnalysisError::invalid_input(format!("report serialization failed: {}", e))
        })?;
        println!("{}", json);
    } else {
        print!("{}", report::format_summary(&outcome.report));
    }

    if let Err(e) = outcome.report.ensure_defined() {
        log::warn!("{}", e);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };
    apply_config_level(cli.verbose, &config);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_next_to_input() {
        assert_eq!(
            default_output(Path::new("plans/site.jpg")),
            PathBuf::from("plans/site_annotated.png")
        );
    }

    #[test]
    fn test_config_warnings_visible_before_config_level() {
        // A broken default config is reported with log::warn!
        assert!(provisional_level(0) >= log::LevelFilter::Warn);
        assert_eq!(provisional_level(2), log::LevelFilter::Debug);
        assert_eq!(verbosity_level(0), None);
        assert_eq!(verbosity_level(5), Some(log::LevelFilter::Trace));
    }

    #[test]
    fn test_cli_parses_negative_tolerance() {
        let cli = Cli::parse_from(["plan-surface", "plan.png", "-t", "-3", "--json"]);
        assert_eq!(cli.tolerance, Some(-3));
        assert!(cli.json);
        assert!(
            AnalysisConfig::default()
                .with_tolerance(-3)
                .validate()
                .is_err()
        );
    }
}
