//! Detail normalization: resolves a bounded prefix of reference records
//! to their detail resources and assembles the results into one table.
//!
//! The mapping from a reference list to its table is deterministic, so
//! `Normalizer` memoizes whole tables keyed by the input value (see
//! `memo`); repeated sessions over the same snapshot skip the network
//! entirely.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::CatalogSource;
use crate::memo::{memo_key, MemoStore};
use crate::models::CatalogRef;
use crate::progress::Progress;
use crate::table::DetailTable;

/// What to do when a single detail resolution fails.
/// Either way the entry is skipped and the relative order of the
/// surviving entries is preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log each skip at warn level; callers surface the skipped list.
    #[default]
    Report,
    /// Skip quietly, visible only at debug level.
    Silent,
}

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Upper bound on entries resolved per run; the input prefix of this
    /// length is taken. Callers wanting the full set pass `usize::MAX`.
    pub sample_size: usize,
    pub policy: FailurePolicy,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            // First-generation sample; small enough for an interactive
            // first load, large enough for meaningful aggregates.
            sample_size: 151,
            policy: FailurePolicy::default(),
        }
    }
}

/// Resolve at most `opts.sample_size` entries of `refs`, in order, into
/// a `DetailTable`.
///
/// A failed resolution (network error or a resource missing required
/// fields) skips that entry per the policy; progress is reported after
/// every attempt, success or failure alike.
pub async fn normalize_details<S: CatalogSource>(
    source: &S,
    refs: &[CatalogRef],
    opts: &NormalizeOptions,
    progress: &mut dyn Progress,
) -> DetailTable {
    let sample = &refs[..refs.len().min(opts.sample_size)];
    progress.begin(sample.len());

    let mut table = DetailTable::default();

    for (i, entry) in sample.iter().enumerate() {
        let resolved = source
            .fetch_detail(&entry.url)
            .await
            .map_err(anyhow::Error::from)
            .and_then(|resource| resource.to_record());

        match resolved {
            Ok(record) => table.push(record),
            Err(e) => {
                match opts.policy {
                    FailurePolicy::Report => {
                        warn!(name = %entry.name, error = %e, "Skipping entry after failed resolution")
                    }
                    FailurePolicy::Silent => {
                        debug!(name = %entry.name, error = %e, "Skipping entry after failed resolution")
                    }
                }
                table.skipped.push(entry.name.clone());
            }
        }

        progress.step(i + 1, sample.len(), &entry.name);
    }

    progress.finish();
    table
}

/// Memoizing wrapper around `normalize_details`.
pub struct Normalizer<S, M> {
    source: S,
    memo: M,
    opts: NormalizeOptions,
}

impl<S: CatalogSource, M: MemoStore> Normalizer<S, M> {
    pub fn new(source: S, memo: M, opts: NormalizeOptions) -> Self {
        Self { source, memo, opts }
    }

    /// Return the table for `refs`, resolving over the network only when
    /// no memoized table exists for this exact input value.
    pub async fn table_for(
        &mut self,
        refs: &[CatalogRef],
        progress: &mut dyn Progress,
    ) -> Result<DetailTable> {
        let key = memo_key(refs, self.opts.sample_size);

        match self.memo.get(&key) {
            Ok(Some(table)) => {
                debug!(%key, rows = table.len(), "Memo hit");
                return Ok(table);
            }
            Ok(None) => debug!(%key, "Memo miss"),
            Err(e) => warn!(%key, error = %e, "Failed to read memo entry, refetching"),
        }

        let table = normalize_details(&self.source, refs, &self.opts, progress).await;
        self.memo.put(&key, &table)?;
        Ok(table)
    }

    /// Resolve over the network unconditionally and replace any memoized
    /// table for this input.
    pub async fn refresh(
        &mut self,
        refs: &[CatalogRef],
        progress: &mut dyn Progress,
    ) -> Result<DetailTable> {
        let key = memo_key(refs, self.opts.sample_size);
        let table = normalize_details(&self.source, refs, &self.opts, progress).await;
        self.memo.put(&key, &table)?;
        Ok(table)
    }
}
