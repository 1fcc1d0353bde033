// src/config.rs
// =============================================================================
// Runtime settings for a crawl.
//
// There is no configuration file and no environment lookup: every value
// comes from the command line (see cli.rs) or from the defaults below.
// =============================================================================

use std::time::Duration;

/// Default number of concurrent link checks per seed
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Default per-request deadline, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Tunables shared by every stage of the crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Workers per seed checker
    pub concurrency: usize,
    /// Deadline for every single request
    pub timeout: Duration,
    /// How many page levels to follow per seed (1 = only the seed page)
    pub max_depth: usize,
    /// Buffer size of every channel between stages
    pub channel_capacity: usize,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_depth: 1,
            channel_capacity: 64,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}
