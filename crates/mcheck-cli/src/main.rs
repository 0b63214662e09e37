//! mcheck - run an M engine fixture and check its expected outputs
//!
//! ```text
//! mcheck [--engine engine.json] [--repeat N] [--report out.json] <FIXTURE>
//! ```
//!
//! Exit status:
//! - 0: every expected output matched (or the fixture has no controls)
//! - 1: an expected output did not match
//! - 2: bad command line
//! - 3: fixture missing or unreadable
//! - 4: malformed fixture
//! - 5: engine or configuration error

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use mcheck_core::config::ENV_REPEAT;
use mcheck_core::{
    init_tracing, read_fixture, run_fixture_bytes, write_run_report, Fixture, HarnessConfig,
    HarnessError, LinearEngine, RunReport,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

const USAGE_EXIT: u8 = 2;
const FALLBACK_EXIT: u8 = 5;

#[derive(Parser, Debug)]
#[command(name = "mcheck")]
#[command(author = "Stevedores Org")]
#[command(version = mcheck_core::VERSION)]
#[command(about = "Run an M engine fixture and check its expected outputs", long_about = None)]
struct Cli {
    /// Fixture file to run
    fixture: PathBuf,

    /// Engine manifest (JSON); overrides MCHECK_ENGINE
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Consecutive evaluations per fixture; overrides MCHECK_REPEAT
    #[arg(long)]
    repeat: Option<usize>,

    /// Write a JSON run report here; overrides MCHECK_REPORT
    #[arg(long)]
    report: Option<PathBuf>,

    /// Only parse the fixture and resolve its names, do not evaluate
    #[arg(long)]
    check: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage(err),
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    init_tracing(cli.json, level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(report_failure(&err)),
    }
}

fn usage(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            println!("Expected one command-line argument, the file to run");
            println!("{}", err.render());
            ExitCode::from(USAGE_EXIT)
        }
    }
}

fn report_failure(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<HarnessError>() {
        Some(HarnessError::Mismatch(mismatch)) => {
            println!("{}", mismatch);
        }
        Some(HarnessError::FixtureNotFound(_)) => {
            println!("Run file not found!");
        }
        _ => {
            eprintln!("mcheck: {:#}", err);
        }
    }
    err.downcast_ref::<HarnessError>()
        .map(HarnessError::exit_code)
        .unwrap_or(FALLBACK_EXIT)
}

fn build_config(cli: &Cli) -> Result<HarnessConfig> {
    // A flag shadows its variable entirely, so a bad MCHECK_REPEAT is never
    // parsed when --repeat is given.
    let mut config = HarnessConfig::from_lookup(|key| match key {
        ENV_REPEAT if cli.repeat.is_some() => None,
        _ => std::env::var(key).ok(),
    })?;
    if let Some(repeat) = cli.repeat {
        config = config.with_repeat_count(repeat);
    }
    if let Some(engine) = &cli.engine {
        config = config.with_engine_manifest(engine.clone());
    }
    if let Some(report) = &cli.report {
        config = config.with_report_path(report.clone());
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;

    // The fixture is opened before the engine is loaded so a missing file is
    // reported as such whatever the engine configuration.
    let bytes = read_fixture(&cli.fixture)?;

    let manifest = config.engine_manifest.clone().ok_or_else(|| {
        HarnessError::Config("no engine manifest: pass --engine or set MCHECK_ENGINE".to_string())
    })?;
    let engine = LinearEngine::load(&manifest)?;

    if cli.check {
        let fixture = Fixture::parse(&String::from_utf8_lossy(&bytes), &engine)?;
        println!(
            "{}: {} inputs, {} expected outputs, evaluation {}",
            cli.fixture.display(),
            fixture.inputs.len(),
            fixture.assertions.len(),
            if fixture.triggers_evaluation {
                "triggered"
            } else {
                "not triggered"
            }
        );
        return Ok(());
    }

    let outcome = run_fixture_bytes(&engine, &cli.fixture, &bytes, &config)?;
    info!(
        run_id = %outcome.run_id,
        assertions_checked = outcome.assertions_checked,
        passed = outcome.passed(),
        "fixture run complete"
    );

    if let Some(path) = &config.report_path {
        write_run_report(path, &RunReport::from_outcome(&outcome))
            .with_context(|| format!("Failed to write run report to {}", path.display()))?;
    }

    outcome.into_result()?;
    Ok(())
}
