// src/checker/mod.rs
// =============================================================================
// This module contains the per-link logic of the crawl.
//
// Submodules:
// - normalize: Turns raw hrefs into absolute URLs
// - html: Extracts raw hrefs from HTML pages
// - http: Checks links concurrently and produces status records
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod html;
mod http;
mod normalize;

pub use html::extract_hrefs;
pub use http::{Checker, StatusRecord, FAILURE_STATUS};
pub use normalize::normalize;
