//! End-to-end pipeline tests against an offline fake source:
//! pagination math, retry bounds, sampling, order preservation,
//! progress reporting and memoization.

use std::sync::Mutex;
use std::time::Duration;

use dexcache_core::{
    normalize_details, ApiError, BulkLister, CatalogRef, CatalogSource, DetailResource,
    DetailTable, ListPage, ListerOptions, MemoryStore, NormalizeOptions, Normalizer, Progress,
    SnapshotStore, MAX_PAGE_RETRIES, NullProgress, PAGE_WINDOW,
};

// ============================================================================
// Fake catalog source
// ============================================================================

/// Offline stand-in for the API: serves a synthetic catalog of `total`
/// entries named `mon-<n>`, with configurable failures.
#[derive(Default)]
struct FakeSource {
    total: u64,
    /// Fail this many list calls before the first success.
    fail_first_lists: Mutex<u32>,
    /// Entry names whose detail fetch returns 404.
    fail_details: Vec<String>,
    list_calls: Mutex<u64>,
    detail_calls: Mutex<u64>,
}

impl FakeSource {
    fn with_total(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    fn list_calls(&self) -> u64 {
        *self.list_calls.lock().expect("lock")
    }

    fn detail_calls(&self) -> u64 {
        *self.detail_calls.lock().expect("lock")
    }

    fn refs(count: u64) -> Vec<CatalogRef> {
        (0..count)
            .map(|n| CatalogRef::new(format!("mon-{}", n), format!("fake://detail/mon-{}", n)))
            .collect()
    }

    fn detail(name: &str, id: i64) -> DetailResource {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "id": id,
            "height": 7,
            "weight": 69,
            "types": [{"slot": 1, "type": {"name": "normal"}}],
            "stats": [{"base_stat": 50, "stat": {"name": "hp"}}],
            "abilities": [{"ability": {"name": "run-away"}}],
            "sprites": {"front_default": "fake://sprite"}
        }))
        .expect("fake detail is valid")
    }
}

impl CatalogSource for &FakeSource {
    async fn list_page(
        &self,
        _endpoint: &str,
        offset: u64,
        limit: u64,
    ) -> Result<ListPage, ApiError> {
        *self.list_calls.lock().expect("lock") += 1;

        let mut remaining = self.fail_first_lists.lock().expect("lock");
        if *remaining > 0 {
            *remaining -= 1;
            return Err(ApiError::ServerError("synthetic outage".to_string()));
        }

        let end = (offset + limit).min(self.total);
        let results = (offset..end)
            .map(|n| CatalogRef::new(format!("mon-{}", n), format!("fake://detail/mon-{}", n)))
            .collect();
        Ok(ListPage {
            count: Some(self.total),
            results,
        })
    }

    async fn fetch_detail(&self, url: &str) -> Result<DetailResource, ApiError> {
        *self.detail_calls.lock().expect("lock") += 1;

        let name = url.rsplit('/').next().unwrap_or_default();
        if self.fail_details.iter().any(|f| f == name) {
            return Err(ApiError::NotFound(format!("no such entry: {}", name)));
        }

        let id = name
            .rsplit('-')
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or(0);
        Ok(Self::detail(name, id))
    }
}

#[derive(Default)]
struct RecordingProgress {
    begun: Option<usize>,
    steps: Vec<(usize, usize)>,
    finished: bool,
}

impl Progress for RecordingProgress {
    fn begin(&mut self, total: usize) {
        self.begun = Some(total);
    }

    fn step(&mut self, done: usize, total: usize, _label: &str) {
        self.steps.push((done, total));
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

fn no_delay() -> ListerOptions {
    ListerOptions {
        delay: Duration::ZERO,
    }
}

// ============================================================================
// Bulk lister
// ============================================================================

#[tokio::test]
async fn lister_issues_one_request_per_window() {
    let source = FakeSource::with_total(1302);
    let lister = BulkLister::with_options(&source, no_delay());

    let refs = lister
        .fetch_all("pokemon", 1302, &mut NullProgress)
        .await
        .expect("fetch");

    // ceil(1302 / 100) pages, accumulated length = sum of page sizes
    assert_eq!(source.list_calls(), 1302u64.div_ceil(PAGE_WINDOW));
    assert_eq!(refs.len(), 1302);
    assert_eq!(refs[0].name, "mon-0");
    assert_eq!(refs[1301].name, "mon-1301");
}

#[tokio::test]
async fn lister_retries_failed_page_at_same_offset() {
    let source = FakeSource {
        fail_first_lists: Mutex::new(2),
        ..FakeSource::with_total(250)
    };
    let lister = BulkLister::with_options(&source, no_delay());

    let refs = lister
        .fetch_all("pokemon", 250, &mut NullProgress)
        .await
        .expect("fetch");

    // 3 successful pages plus the 2 failures, all entries present in order
    assert_eq!(source.list_calls(), 5);
    assert_eq!(refs.len(), 250);
    assert_eq!(refs[0].name, "mon-0");
}

#[tokio::test]
async fn lister_gives_up_after_consecutive_failures() {
    let source = FakeSource {
        fail_first_lists: Mutex::new(u32::MAX),
        ..FakeSource::with_total(100)
    };
    let lister = BulkLister::with_options(&source, no_delay());

    let err = lister
        .fetch_all("pokemon", 100, &mut NullProgress)
        .await
        .expect_err("must abort");

    assert_eq!(source.list_calls(), MAX_PAGE_RETRIES as u64);
    assert!(err.to_string().contains("offset 0"));
}

#[tokio::test]
async fn lister_writes_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SnapshotStore::new(dir.path().to_path_buf()).expect("store");

    let source = FakeSource::with_total(42);
    let lister = BulkLister::with_options(&source, no_delay());
    lister
        .refresh_snapshot("ability", 42, &store, &mut NullProgress)
        .await
        .expect("refresh");

    let loaded = store.load("ability").expect("snapshot exists");
    assert_eq!(loaded.len(), 42);
    assert_eq!(loaded, FakeSource::refs(42));
}

// ============================================================================
// Detail normalizer
// ============================================================================

#[tokio::test]
async fn normalizer_respects_sample_bound() {
    let source = FakeSource::with_total(0);
    let refs = FakeSource::refs(500);
    let opts = NormalizeOptions {
        sample_size: 151,
        ..NormalizeOptions::default()
    };

    let table = normalize_details(&&source, &refs, &opts, &mut NullProgress).await;

    assert_eq!(source.detail_calls(), 151);
    assert_eq!(table.len(), 151);
}

#[tokio::test]
async fn normalizer_handles_short_input() {
    let source = FakeSource::with_total(0);
    let refs = FakeSource::refs(5);

    let table =
        normalize_details(&&source, &refs, &NormalizeOptions::default(), &mut NullProgress).await;

    assert_eq!(source.detail_calls(), 5);
    assert_eq!(table.len(), 5);
}

#[tokio::test]
async fn failed_entry_is_skipped_and_order_preserved() {
    let source = FakeSource {
        fail_details: vec!["mon-1".to_string()],
        ..FakeSource::with_total(0)
    };
    let refs = FakeSource::refs(5);

    let table =
        normalize_details(&&source, &refs, &NormalizeOptions::default(), &mut NullProgress).await;

    assert_eq!(table.len(), 4);
    let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Mon-0", "Mon-2", "Mon-3", "Mon-4"]);
    assert_eq!(table.skipped, vec!["mon-1"]);
}

#[tokio::test]
async fn progress_reports_every_attempt() {
    let source = FakeSource {
        fail_details: vec!["mon-2".to_string()],
        ..FakeSource::with_total(0)
    };
    let refs = FakeSource::refs(5);
    let mut progress = RecordingProgress::default();

    normalize_details(&&source, &refs, &NormalizeOptions::default(), &mut progress).await;

    assert_eq!(progress.begun, Some(5));
    // One step per attempt, failures included, ending at the full fraction
    assert_eq!(
        progress.steps,
        vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]
    );
    assert!(progress.finished);
}

// ============================================================================
// Memoization
// ============================================================================

#[tokio::test]
async fn memoized_result_skips_resolution() {
    let source = FakeSource::with_total(0);
    let refs = FakeSource::refs(10);
    let mut normalizer = Normalizer::new(&source, MemoryStore::new(), NormalizeOptions::default());

    let first = normalizer
        .table_for(&refs, &mut NullProgress)
        .await
        .expect("first");
    assert_eq!(source.detail_calls(), 10);

    let second = normalizer
        .table_for(&refs, &mut NullProgress)
        .await
        .expect("second");
    assert_eq!(source.detail_calls(), 10, "cache hit must not refetch");
    assert_eq!(first, second);
}

#[tokio::test]
async fn value_equal_input_hits_memo() {
    let source = FakeSource::with_total(0);
    let mut normalizer = Normalizer::new(&source, MemoryStore::new(), NormalizeOptions::default());

    normalizer
        .table_for(&FakeSource::refs(10), &mut NullProgress)
        .await
        .expect("first");

    // A freshly built but value-equal list must hit the same entry
    normalizer
        .table_for(&FakeSource::refs(10), &mut NullProgress)
        .await
        .expect("second");
    assert_eq!(source.detail_calls(), 10);

    // A different value misses
    normalizer
        .table_for(&FakeSource::refs(11), &mut NullProgress)
        .await
        .expect("third");
    assert_eq!(source.detail_calls(), 21);
}

#[tokio::test]
async fn refresh_bypasses_memo() {
    let source = FakeSource::with_total(0);
    let refs = FakeSource::refs(10);
    let mut normalizer = Normalizer::new(&source, MemoryStore::new(), NormalizeOptions::default());

    normalizer
        .table_for(&refs, &mut NullProgress)
        .await
        .expect("first");
    normalizer
        .refresh(&refs, &mut NullProgress)
        .await
        .expect("refresh");
    assert_eq!(source.detail_calls(), 20);

    // The refreshed table replaces the memo entry
    normalizer
        .table_for(&refs, &mut NullProgress)
        .await
        .expect("after refresh");
    assert_eq!(source.detail_calls(), 20);
}

// ============================================================================
// Table shape
// ============================================================================

#[tokio::test]
async fn normalized_table_has_expected_shape() {
    let source = FakeSource::with_total(0);
    let refs = FakeSource::refs(3);

    let table: DetailTable =
        normalize_details(&&source, &refs, &NormalizeOptions::default(), &mut NullProgress).await;

    assert_eq!(table.stat_columns, vec!["hp"]);
    let row = &table.rows[0];
    assert_eq!(row.name, "Mon-0");
    assert_eq!(row.height_m, 0.7);
    assert_eq!(row.weight_kg, 6.9);
    assert_eq!(row.abilities, vec!["Run-away"]);
    assert_eq!(row.primary_type(), Some("normal"));
}
