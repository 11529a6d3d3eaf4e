use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use quizpoll_config::Config;
use quizpoll_engine::{BatchSummary, RawInput, io, process_batch};
use std::{
    path::{Path, PathBuf},
    process,
    sync::atomic::AtomicBool,
};

mod report;

use report::ItemSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Problem items and a compliance summary
    Summary,
    /// One JSON object per item
    Json,
    /// Accepted questions as GIFT
    Gift,
}

#[derive(Parser)]
#[command(name = "quizpoll")]
#[command(about = "Check quiz questions against messaging poll limits")]
#[command(version)]
struct Args {
    /// Question files or directories (default: question_paths from the config)
    paths: Vec<PathBuf>,

    /// Limit profile to apply (default: the config's default_profile)
    #[arg(long)]
    profile: Option<String>,

    /// Config file to use instead of ~/.config/quizpoll/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// Exit with status 1 unless every item is accepted
    #[arg(long)]
    strict: bool,

    /// Write a config file with the built-in profiles and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> Result<()> {
    logger(env_logger::Env::default()).init();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(Config::config_path);

    if args.init_config {
        init_config(&config_path)?;
        log::info!("Wrote config file to {}", config_path.display());
        return Ok(());
    }

    let config = Config::load_from_path(&config_path)
        .context("Failed to load config file")?
        .unwrap_or_default();

    let profile_name = args
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile.clone());
    let profile = config.profile(&profile_name)?;

    let paths = if args.paths.is_empty() {
        config.question_paths.clone()
    } else {
        args.paths.clone()
    };
    if paths.is_empty() {
        bail!(
            "No question files given and no question_paths in {}",
            config_path.display()
        );
    }

    let (items, sources) = load_all(&collect_files(&paths)?)?;
    log::info!(
        "Checking {} questions against profile '{profile_name}'",
        items.len()
    );

    let cancel = AtomicBool::new(false);
    let report = process_batch(&items, &profile, &cancel);

    let mut out = std::io::stdout().lock();
    match args.format {
        OutputFormat::Summary => report::write_summary(&mut out, &report, &sources)?,
        OutputFormat::Json => report::write_json(&mut out, &report, &sources)?,
        OutputFormat::Gift => report::write_gift(&mut out, &report)?,
    }

    if strict_failure(args.strict, &report.summary) {
        process::exit(1);
    }

    Ok(())
}

/// Logs at `info` unless the filter variable of `env` says otherwise.
fn logger(env: env_logger::Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("info"))
}

/// Writes the built-in profiles to `config_path`, never over an existing file.
fn init_config(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        bail!("Config file already exists at {}", config_path.display());
    }
    Config::with_builtin_profiles().save_to_path(config_path)
}

/// `--strict` fails the run unless every item was accepted.
fn strict_failure(strict: bool, summary: &BatchSummary) -> bool {
    strict && summary.accepted < summary.total
}

/// Expands directories into the question files they contain.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(io::scan_question_files(path)?);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn load_all(files: &[PathBuf]) -> Result<(Vec<RawInput>, Vec<ItemSource>)> {
    let mut items = Vec::new();
    let mut sources = Vec::new();
    for file in files {
        let loaded = load_file(file)?;
        sources.extend((1..=loaded.len()).map(|number| ItemSource {
            file: file.clone(),
            number,
        }));
        items.extend(loaded);
    }
    Ok((items, sources))
}

fn load_file(file: &Path) -> Result<Vec<RawInput>> {
    let items =
        io::load_items(file).with_context(|| format!("Failed to load {}", file.display()))?;
    log::debug!("Loaded {} items from {}", items.len(), file.display());
    Ok(items)
}
