//! Core library for dexcache.
//!
//! Everything needed to turn the public PokeAPI catalog into a flat,
//! displayable table:
//!
//! - `api`: HTTP client and the `CatalogSource` seam
//! - `lister`: paginated bulk index fetch with snapshot write-through
//! - `normalize`: detail resolution into normalized records
//! - `memo`: content-keyed memoization of normalized tables
//! - `snapshot`: flat-file reference list persistence
//! - `table`: the assembled table and its aggregate queries

pub mod api;
pub mod config;
pub mod lister;
pub mod memo;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod snapshot;
pub mod table;

pub use api::{ApiClient, ApiError, CatalogSource};
pub use config::Config;
pub use lister::{BulkLister, ListerOptions, MAX_PAGE_RETRIES, PAGE_WINDOW};
pub use memo::{DiskStore, MemoStore, MemoryStore};
pub use models::{CatalogRef, DetailRecord, DetailResource, ListPage, StatEntry};
pub use normalize::{normalize_details, FailurePolicy, NormalizeOptions, Normalizer};
pub use progress::{NullProgress, Progress};
pub use snapshot::{SnapshotError, SnapshotStore};
pub use table::DetailTable;
