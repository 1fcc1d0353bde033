// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Seeds can be given as positional arguments, with -u/--url, or both.
// Giving none at all is checked in main.rs (clap can't express "at least one
// of these two arguments" together with repeatable values cleanly).
// =============================================================================

use crate::config::{CrawlConfig, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use std::time::Duration;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "link-probe",
    version,
    about = "Fetch seed pages and concurrently check every link on them",
    long_about = "link-probe fetches each seed page, extracts its links, normalizes them and \
                  checks them all concurrently. Every link is reported as \"<status> - <url>\"."
)]
pub struct Cli {
    /// Seed URLs to crawl (e.g., https://example.com or www.example.com)
    pub seeds: Vec<String>,

    /// Additional seed URL; may be repeated
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// How many links to check at once per seed
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum crawl depth (1 = only the seed pages)
    ///
    /// Depth 2 also checks the links of every same-origin page the seed
    /// links to, and so on. Each page is visited at most once.
    #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_depth: usize,

    /// Output results in JSON format instead of plain lines
    #[arg(long)]
    pub json: bool,

    /// Exit with code 1 if any link is not 2xx/3xx
    #[arg(long)]
    pub fail_on_broken: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Every seed, positional ones first
    pub fn all_seeds(&self) -> Vec<String> {
        self.seeds.iter().chain(&self.urls).cloned().collect()
    }

    /// Crawl settings taken from the flags
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            concurrency: self.concurrency,
            timeout: Duration::from_secs(self.timeout),
            max_depth: self.max_depth,
            ..CrawlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_and_flag_seeds() {
        let cli = Cli::try_parse_from([
            "link-probe",
            "https://a.com",
            "-u",
            "https://b.com",
            "https://c.com",
            "--url",
            "www.d.com",
        ])
        .unwrap();

        assert_eq!(
            cli.all_seeds(),
            vec!["https://a.com", "https://c.com", "https://b.com", "www.d.com"]
        );
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["link-probe", "https://a.com"]).unwrap();
        let config = cli.crawl_config();

        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.max_depth, 1);
        assert!(!cli.json);
        assert!(!cli.fail_on_broken);
    }

    #[test]
    fn test_no_seeds_parses_but_is_empty() {
        let cli = Cli::try_parse_from(["link-probe"]).unwrap();
        assert!(cli.all_seeds().is_empty());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(Cli::try_parse_from(["link-probe", "-c", "0", "https://a.com"]).is_err());
        assert!(Cli::try_parse_from(["link-probe", "--max-depth", "0", "https://a.com"]).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "link-probe",
            "--json",
            "--fail-on-broken",
            "-c",
            "8",
            "--max-depth",
            "3",
            "-t",
            "2",
            "https://a.com",
        ])
        .unwrap();
        let config = cli.crawl_config();

        assert!(cli.json);
        assert!(cli.fail_on_broken);
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.timeout, Duration::from_secs(2));
    }
}
