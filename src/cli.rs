//! CLI definitions for tweetshape.
//!
//! Uses clap for argument parsing with derive macros.

use crate::date_parser::NaiveTimestampPolicy;
use crate::parser::UsernamePolicy;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// tweetshape - validate and normalize tweet records
#[derive(Parser, Debug)]
#[command(name = "tweetshape")]
#[command(version = concat!(
    env!("CARGO_PKG_VERSION"),
    "\n  Built: ", env!("VERGEN_BUILD_TIMESTAMP"),
    "\n  Rustc: ", env!("VERGEN_RUSTC_SEMVER"),
    "\n  Target: ", env!("VERGEN_CARGO_TARGET_TRIPLE"),
))]
#[command(about = "Validate and normalize tweet records from JSON files")]
#[command(long_about = r#"
tweetshape checks tweet records decoded from JSON against the expected shape:

  text        non-empty string
  author      { username, name, profile_image_url }
  created_at  timestamp with a timezone
  metrics     { like_count, reply_count, retweet_count }, non-negative integers

Input may be a single object, an array of objects, JSON Lines, or an
X API v2 search response (data + includes.users).

Quick start:
  tweetshape check tweets.json
  tweetshape normalize --format json-pretty response.json
"#)]
pub struct Cli {
    /// Path to a config file (overrides the default location)
    #[arg(long, env = "TWEETSHAPE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Be verbose (show debug info)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Be quiet (only print failures)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// How to treat usernames written as @handle
    #[arg(long, global = true)]
    pub username_policy: Option<UsernamePolicy>,

    /// How to treat timestamps without a timezone
    #[arg(long, global = true)]
    pub naive_timestamps: Option<NaiveTimestampPolicy>,

    /// Only accept https profile image URLs
    #[arg(long, global = true)]
    pub require_https: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate tweet records and report failures
    Check(CheckArgs),

    /// Validate and print normalized records
    Normalize(NormalizeArgs),

    /// Show configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files or directories to check ('-' reads stdin)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Stop at the first invalid record
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// File to normalize ('-' reads stdin)
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show the effective configuration
    #[arg(long)]
    pub show: bool,

    /// Print the config file location
    #[arg(long)]
    pub path: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
    Jsonl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_check_with_global_flags() {
        let cli = Cli::try_parse_from([
            "tweetshape",
            "check",
            "a.json",
            "b.jsonl",
            "--fail-fast",
            "--username-policy",
            "reject",
            "--naive-timestamps",
            "assume-utc",
            "-f",
            "json-pretty",
        ])
        .unwrap();

        assert_eq!(cli.username_policy, Some(UsernamePolicy::Reject));
        assert_eq!(cli.naive_timestamps, Some(NaiveTimestampPolicy::AssumeUtc));
        assert_eq!(cli.format, Some(OutputFormat::JsonPretty));
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.paths.len(), 2);
                assert!(args.fail_fast);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_requires_a_path() {
        assert!(Cli::try_parse_from(["tweetshape", "check"]).is_err());
    }
}
