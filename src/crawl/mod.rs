// src/crawl/mod.rs
// =============================================================================
// This module runs the crawl pipeline.
//
// Features:
// - One link source per seed (fetch, extract, normalize)
// - One bounded checker per seed
// - Fan-in of every seed's records into a single channel
// - Optional same-origin recursion, capped by depth and a visited set
//
// Rust concepts:
// - Async programming: tasks and channels between stages
// - Collections: HashSet for visited pages, VecDeque for the crawl queue
// =============================================================================

mod merge;
mod pipeline;
mod source;

pub use pipeline::{CrawlRun, Crawler, SeedOutcome};
