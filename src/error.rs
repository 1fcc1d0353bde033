// src/error.rs
// =============================================================================
// Error types shared by the transport, the link source and the checker.
//
// Taxonomy:
// - InvalidUrl: the URL could not be turned into a request (construction)
// - Transport / Timeout / Cancelled: the request was sent but never answered
// - Status: a seed page answered, but not with a 2xx status
// - Parse: the seed page body could not be read as HTML
// - NotMarkup: the page is a PDF, image, archive... (body never downloaded)
//
// None of these are fatal to the whole program. A FetchError only ends the
// seed it belongs to; for a single link it becomes a sentinel status record.
//
// Rust concepts:
// - thiserror: derive Display and Error for enums
// - #[from]: automatic conversion so the ? operator works across error types
// =============================================================================

use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching a page or checking a link
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed into a request
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL parsed, but not with a scheme we can request
    #[error("unsupported URL scheme {scheme:?} in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    /// Connection, DNS, TLS or protocol failure
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// No response within the configured deadline
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// The crawl was cancelled while the request was in flight
    #[error("request to {url} was cancelled")]
    Cancelled { url: String },

    /// The page answered with a non-success status code
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The page declared a content type that cannot contain links
    #[error("{url} is not an HTML page ({content_type})")]
    NotMarkup { url: String, content_type: String },

    /// The page body could not be read as HTML
    #[error("could not extract links from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },
}

/// Errors raised by HTML link extraction
#[derive(Error, Debug)]
pub enum ParseError {
    /// The body is not valid UTF-8 text
    #[error("response body is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),
}
