//! Bulk index fetch: pages through a listing endpoint until a target
//! record count is reached, accumulating reference records in upstream
//! order, and persists the result as a flat-file snapshot.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::CatalogSource;
use crate::models::CatalogRef;
use crate::progress::Progress;
use crate::snapshot::SnapshotStore;

/// Fixed listing window size.
pub const PAGE_WINDOW: u64 = 100;

/// Consecutive failures tolerated on a single offset before aborting.
/// The offset does not advance on failure, so without a cap a persistent
/// upstream error would retry the same page forever.
pub const MAX_PAGE_RETRIES: u32 = 5;

/// Delay between page requests, to respect upstream rate limits.
const DEFAULT_PAGE_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct ListerOptions {
    pub delay: Duration,
}

impl Default for ListerOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
        }
    }
}

/// Sequential paginated fetcher for one or more listing endpoints.
pub struct BulkLister<S> {
    source: S,
    opts: ListerOptions,
}

impl<S: CatalogSource> BulkLister<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, ListerOptions::default())
    }

    pub fn with_options(source: S, opts: ListerOptions) -> Self {
        Self { source, opts }
    }

    /// Fetch the ordered reference list for `endpoint` until `target`
    /// records have been requested.
    ///
    /// The offset advances by the window size only after a successful
    /// page; a failed page is logged and retried at the same offset, up
    /// to `MAX_PAGE_RETRIES` consecutive failures. Ordering matches the
    /// upstream catalog order.
    pub async fn fetch_all(
        &self,
        endpoint: &str,
        target: u64,
        progress: &mut dyn Progress,
    ) -> Result<Vec<CatalogRef>> {
        let total_pages = (target as usize).div_ceil(PAGE_WINDOW as usize);
        progress.begin(total_pages);

        let mut all = Vec::with_capacity(target as usize);
        let mut offset = 0u64;
        let mut failures = 0u32;

        while offset < target {
            match self.source.list_page(endpoint, offset, PAGE_WINDOW).await {
                Ok(page) => {
                    info!(
                        endpoint,
                        offset,
                        fetched = page.results.len(),
                        total = all.len() + page.results.len(),
                        "Fetched listing page"
                    );
                    all.extend(page.results);
                    offset += PAGE_WINDOW;
                    failures = 0;
                    progress.step(
                        (offset / PAGE_WINDOW) as usize,
                        total_pages,
                        endpoint,
                    );
                }
                Err(e) => {
                    failures += 1;
                    warn!(
                        endpoint,
                        offset,
                        attempt = failures,
                        error = %e,
                        "Failed to fetch listing page"
                    );
                    if failures >= MAX_PAGE_RETRIES {
                        progress.finish();
                        return Err(e).with_context(|| {
                            format!(
                                "Giving up on {} listing after {} consecutive failures at offset {}",
                                endpoint, failures, offset
                            )
                        });
                    }
                }
            }

            if offset < target {
                tokio::time::sleep(self.opts.delay).await;
            }
        }

        progress.finish();
        Ok(all)
    }

    /// Fetch the full reference list and write it through to the
    /// endpoint's snapshot file, overwriting any previous snapshot.
    pub async fn refresh_snapshot(
        &self,
        endpoint: &str,
        target: u64,
        store: &SnapshotStore,
        progress: &mut dyn Progress,
    ) -> Result<Vec<CatalogRef>> {
        let refs = self.fetch_all(endpoint, target, progress).await?;
        store
            .save(endpoint, &refs)
            .with_context(|| format!("Failed to write {} snapshot", endpoint))?;
        info!(endpoint, records = refs.len(), "Snapshot written");
        Ok(refs)
    }
}
