// src/crawl/source.rs
// =============================================================================
// The per-seed link source.
//
// How it works:
// 1. Fetch the seed page (exactly one GET)
// 2. Extract every <a href> in document order
// 3. Normalize each href against the seed URL
// 4. Send each link down a bounded channel (the checker reads the other end)
//
// If the seed page cannot be fetched or parsed, nothing is sent and the error
// is returned for this seed only. Other seeds are unaffected.
//
// With max_depth > 1 the source keeps going breadth-first over pages that
// share the seed's origin:
// - HashSet of visited pages: each page is fetched at most once, so link
//   cycles (A -> B -> A) cannot loop forever
// - VecDeque queue: breadth-first, depth tracked per page
// - Rooted paths and fragments on a deeper page resolve against that page
//   (Url::join), so "#team" on /about stays on /about
// - Links already sent for this seed are not sent again from deeper pages
// - Pages that declare a non-markup content type (PDF, images...) are skipped
//   without downloading their body
//
// Rust concepts:
// - HashSet / VecDeque: visited set and BFS queue
// - mpsc::Sender: send().await waits when the checker falls behind
// =============================================================================

use crate::checker::{extract_hrefs, normalize};
use crate::error::FetchError;
use crate::transport::{build_url, Transport};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

// A page waiting to be crawled
#[derive(Debug, Clone)]
struct CrawlItem {
    url: String,
    depth: usize, // How many levels deep from the seed (seed = 1)
}

/// What a finished source produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    /// Pages fetched successfully, seed included
    pub pages: usize,
    /// Links sent to the checker
    pub links: usize,
}

/// Produces the normalized links found on one seed page
pub struct LinkSource {
    transport: Arc<dyn Transport>,
    seed: String,
    max_depth: usize,
}

impl LinkSource {
    pub fn new(transport: Arc<dyn Transport>, seed: impl Into<String>, max_depth: usize) -> Self {
        Self {
            transport,
            seed: seed.into(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Fetches the seed (and deeper pages, if configured) and sends every link
    ///
    /// `out` is dropped when this returns, which closes the link channel.
    /// Every call performs fresh requests; nothing is cached between runs.
    pub async fn run(
        &self,
        out: mpsc::Sender<String>,
        cancel: &CancellationToken,
    ) -> Result<SourceSummary, FetchError> {
        let links: Vec<String> = fetch_hrefs(self.transport.as_ref(), &self.seed, cancel)
            .await?
            .iter()
            .map(|href| normalize(&self.seed, href))
            .collect();

        let mut summary = SourceSummary {
            pages: 1,
            links: 0,
        };

        let origin = build_url(&self.seed)?.origin();
        let mut visited = HashSet::new();
        visited.insert(page_key(&self.seed));
        let mut emitted = HashSet::new();
        let mut queue = VecDeque::new();

        // The seed page sends every link it has, duplicates included
        for link in links {
            if self.max_depth > 1 {
                self.follow(&link, 2, &origin, &mut visited, &mut queue);
                emitted.insert(link.clone());
            }
            if out.send(link).await.is_err() {
                debug!(seed = %self.seed, "link receiver dropped");
                return Ok(summary);
            }
            summary.links += 1;
        }

        while let Some(item) = queue.pop_front() {
            if cancel.is_cancelled() {
                break;
            }

            debug!(seed = %self.seed, url = %item.url, depth = item.depth, "crawling page");
            let hrefs = match fetch_hrefs(self.transport.as_ref(), &item.url, cancel).await {
                Ok(hrefs) => hrefs,
                Err(FetchError::NotMarkup { content_type, .. }) => {
                    debug!(seed = %self.seed, url = %item.url, content_type = %content_type, "not a page, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(seed = %self.seed, url = %item.url, error = %e, "skipping page");
                    continue;
                }
            };
            summary.pages += 1;

            let page = build_url(&item.url)?;
            for link in hrefs.iter().map(|href| resolve_on_page(&page, href)) {
                if !emitted.insert(link.clone()) {
                    continue;
                }
                if item.depth < self.max_depth {
                    self.follow(&link, item.depth + 1, &origin, &mut visited, &mut queue);
                }
                if out.send(link).await.is_err() {
                    debug!(seed = %self.seed, "link receiver dropped");
                    return Ok(summary);
                }
                summary.links += 1;
            }
        }

        info!(seed = %self.seed, pages = summary.pages, links = summary.links, "seed crawled");
        Ok(summary)
    }

    // Queues `link` as a page to crawl if it is an unvisited same-origin page
    fn follow(
        &self,
        link: &str,
        depth: usize,
        origin: &url::Origin,
        visited: &mut HashSet<String>,
        queue: &mut VecDeque<CrawlItem>,
    ) {
        let Ok(url) = build_url(link) else { return };
        if &url.origin() != origin {
            return;
        }

        let key = page_key(url.as_str());
        if visited.insert(key.clone()) {
            queue.push_back(CrawlItem { url: key, depth });
        }
    }
}

/// Fetches one page and returns its raw hrefs
///
/// Non-2xx answers count as a failed fetch: an error page's links are not
/// the page's links. Neither are the bytes of a PDF.
async fn fetch_hrefs(
    transport: &dyn Transport,
    page_url: &str,
    cancel: &CancellationToken,
) -> Result<Vec<String>, FetchError> {
    let url = build_url(page_url)?;
    let page = transport.fetch(&url, cancel).await?;

    if !(200..300).contains(&page.status) {
        return Err(FetchError::Status {
            url: page_url.to_string(),
            status: page.status,
        });
    }

    if !page.has_markup() {
        return Err(FetchError::NotMarkup {
            url: page_url.to_string(),
            content_type: page.content_type.unwrap_or_default(),
        });
    }

    extract_hrefs(&page.body).map_err(|source| FetchError::Parse {
        url: page_url.to_string(),
        source,
    })
}

// Turns an href found below the seed into an absolute link
//
// "/x" and "#x" are joined onto the page the way a browser would: plain
// concatenation would turn "/two" on /one into /one/two. Anything else
// (shorthand, mailto, absolute URLs) goes through the normalizer with the
// page as base.
//
// Example (page = https://site.com/about):
//   "#team"        -> https://site.com/about#team
//   "/contact"     -> https://site.com/contact
//   "www.bing.com" -> https://www.bing.com/
fn resolve_on_page(page: &Url, href: &str) -> String {
    if href.len() > 1 && (href.starts_with('/') || href.starts_with('#')) {
        if let Ok(url) = page.join(href) {
            return url.to_string();
        }
    }
    normalize(page.as_str(), href)
}

// Identifies a page regardless of fragment ("/a#x" and "/a" are one page)
fn page_key(link: &str) -> String {
    match Url::parse(link) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => link.to_string(),
    }
}
