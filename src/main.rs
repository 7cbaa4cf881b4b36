//! tweetshape - tweet record validation CLI
//!
//! Main entry point for the tweetshape command-line tool.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use tweetshape::logging::init_cli_logging;
use tweetshape::*;

/// Exit status when every record is valid.
const EXIT_OK: u8 = 0;
/// Exit status when at least one record failed validation.
const EXIT_INVALID: u8 = 1;
/// Exit status for I/O, JSON, and usage errors.
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Before config loading, so a broken config file is reported.
    init_cli_logging(
        cli.quiet,
        cli.verbose,
        colored::control::SHOULD_COLORIZE.should_colorize(),
    );
    let config = effective_config(&cli);

    if !config.output.colors {
        colored::control::set_override(false);
    }

    let outcome = match &cli.command {
        Commands::Check(args) => cmd_check(&config, args),
        Commands::Normalize(args) => cmd_normalize(&config, args),
        Commands::Config(args) => cmd_config(&cli, &config, args),
        Commands::Completions(args) => cmd_completions(args),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            let suggestion = err
                .downcast_ref::<TweetshapeError>()
                .and_then(TweetshapeError::suggestion);
            let explanation = err
                .chain()
                .skip(1)
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(": ");
            eprintln!(
                "{}",
                format_error(&err.to_string(), &explanation, suggestion.as_slice())
            );
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Apply CLI flags on top of file and environment configuration.
fn effective_config(cli: &Cli) -> Config {
    let mut config = Config::load(cli.config.as_deref());
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.quiet {
        config.output.quiet = true;
    }
    if let Some(policy) = cli.username_policy {
        config.validation.username_policy = policy;
    }
    if let Some(policy) = cli.naive_timestamps {
        config.validation.naive_timestamps = policy;
    }
    if cli.require_https {
        config.validation.require_https_images = true;
    }
    config
}

fn cmd_check(config: &Config, args: &CheckArgs) -> Result<u8> {
    let sources = expand_sources(&args.paths)?;
    let mut reports = Vec::with_capacity(sources.len());

    for source in &sources {
        let start = Instant::now();
        let document = read_document(source)?;
        let results = document.validate(&config.validation);
        let mut report = BatchReport::from_results(source_name(source), &results);
        debug!(
            source = %report.source,
            shape = document.kind(),
            records = report.total,
            elapsed_ms = start.elapsed().as_millis(),
            "Checked source"
        );

        let stop = args.fail_fast && report.has_failures();
        if stop {
            report.truncate_failures();
        }
        reports.push(report);
        if stop {
            info!("Stopping at first invalid record (--fail-fast)");
            break;
        }
    }

    let totals = Totals::from_reports(&reports);
    print_reports(config, &reports, &totals)?;

    Ok(if totals.invalid > 0 {
        EXIT_INVALID
    } else {
        EXIT_OK
    })
}

fn cmd_normalize(config: &Config, args: &NormalizeArgs) -> Result<u8> {
    let document = read_document(&args.path)?;
    let mut tweets = Vec::new();
    for result in document.validate(&config.validation) {
        match result {
            Ok(tweet) => tweets.push(tweet),
            Err(err) => {
                eprintln!(
                    "{}",
                    format_error(
                        "Invalid tweet",
                        &err.to_string(),
                        &["Run 'tweetshape check' to list every failure."]
                    )
                );
                return Ok(EXIT_INVALID);
            }
        }
    }

    let mut out = io::stdout().lock();
    match config.output.format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&tweets)?)?,
        OutputFormat::JsonPretty => writeln!(out, "{}", serde_json::to_string_pretty(&tweets)?)?,
        OutputFormat::Jsonl => {
            for tweet in &tweets {
                writeln!(out, "{}", serde_json::to_string(tweet)?)?;
            }
        }
        OutputFormat::Text => {
            for tweet in &tweets {
                print_tweet_text(&mut out, tweet)?;
            }
        }
    }
    Ok(EXIT_OK)
}

fn cmd_config(cli: &Cli, config: &Config, args: &ConfigArgs) -> Result<u8> {
    if args.path {
        let path = cli.config.clone().or_else(Config::user_config_path);
        match path {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine config directory"),
        }
    }
    if args.show || !args.path {
        print!("{}", config.to_toml().context("Failed to render configuration")?);
    }
    Ok(EXIT_OK)
}

fn cmd_completions(args: &CompletionsArgs) -> Result<u8> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "tweetshape", &mut io::stdout());
    Ok(EXIT_OK)
}

// =============================================================================
// Input
// =============================================================================

/// Expand directories into the JSON files they contain, in name order.
fn expand_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for path in paths {
        if path.as_os_str() == "-" || !path.is_dir() {
            sources.push(path.clone());
            continue;
        }

        let before = sources.len();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && is_json_file(entry.path()) {
                sources.push(entry.into_path());
            }
        }
        if sources.len() == before {
            warn!("No .json or .jsonl files under {}", path.display());
        }
    }
    Ok(sources)
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("jsonl"))
}

fn read_document(path: &Path) -> Result<InputDocument> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(TweetshapeError::from)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| TweetshapeError::path_error("read", path, e))?
    };

    let document = InputDocument::detect(&text)
        .with_context(|| format!("Could not decode {}", source_name(path)))?;
    Ok(document)
}

fn source_name(path: &Path) -> String {
    if path.as_os_str() == "-" {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

// =============================================================================
// Output
// =============================================================================

fn print_reports(config: &Config, reports: &[BatchReport], totals: &Totals) -> Result<()> {
    let mut out = io::stdout().lock();
    match config.output.format {
        OutputFormat::Json => {
            let body = serde_json::json!({ "reports": reports, "totals": totals });
            writeln!(out, "{}", serde_json::to_string(&body)?)?;
        }
        OutputFormat::JsonPretty => {
            let body = serde_json::json!({ "reports": reports, "totals": totals });
            writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        }
        OutputFormat::Jsonl => {
            for report in reports {
                writeln!(out, "{}", serde_json::to_string(report)?)?;
            }
        }
        OutputFormat::Text => {
            for report in reports {
                print_report_text(&mut out, report, config.output.quiet)?;
            }
            if !config.output.quiet {
                writeln!(
                    out,
                    "\nChecked {} records in {} sources: {} valid, {} invalid",
                    totals.total,
                    totals.sources,
                    totals.valid.to_string().green(),
                    if totals.invalid > 0 {
                        totals.invalid.to_string().red()
                    } else {
                        totals.invalid.to_string().normal()
                    },
                )?;
            }
        }
    }
    Ok(())
}

fn print_report_text(out: &mut impl Write, report: &BatchReport, quiet: bool) -> io::Result<()> {
    if !report.has_failures() {
        if !quiet {
            writeln!(
                out,
                "{} {}: {} records, all valid",
                "✓".green(),
                report.source,
                report.total
            )?;
        }
        return Ok(());
    }

    writeln!(
        out,
        "{} {}: {} records, {} invalid",
        "✗".red().bold(),
        report.source,
        report.total,
        report.invalid
    )?;
    for failure in &report.failures {
        writeln!(
            out,
            "   {} [{}] {}: {} ({})",
            "•".dimmed(),
            failure.index,
            failure.error.path().to_string().bold(),
            failure.error.kind().as_str().yellow(),
            failure.error.detail()
        )?;
    }
    Ok(())
}

fn print_tweet_text(out: &mut impl Write, tweet: &Tweet) -> io::Result<()> {
    let author = tweet.author();
    let metrics = tweet.metrics();
    writeln!(
        out,
        "{} {} {}",
        format!("@{}", author.username()).cyan().bold(),
        author.name().dimmed(),
        tweet.created_at().to_rfc3339().dimmed()
    )?;
    writeln!(out, "  {}", tweet.text())?;
    writeln!(
        out,
        "  likes={} replies={} retweets={}\n",
        metrics.like_count(),
        metrics.reply_count(),
        metrics.retweet_count()
    )
}
