//! Application state management for the dexcache dashboard.
//!
//! This module contains the core `App` struct that manages all
//! application state: UI state, the loaded detail table, and the
//! background load task coordination.

use tokio::sync::mpsc;
use tracing::{error, info};

use dexcache_core::{
    ApiClient, CatalogRef, Config, DetailRecord, DetailTable, DiskStore, FailurePolicy,
    NormalizeOptions, Normalizer, Progress,
};

use crate::utils::contains_ignore_case;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background load message channel.
/// Progress updates are droppable, so a bounded buffer is enough; the
/// final table message is sent with backpressure.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Canonical six-stat display series for the detail panel and the
/// histogram: raw catalog identifier paired with its display label.
/// Display mapping lives here, never in the pipeline.
pub const CANONICAL_STATS: [(&str, &str); 6] = [
    ("hp", "HP"),
    ("attack", "Attack"),
    ("defense", "Defense"),
    ("special-attack", "Sp. Atk"),
    ("special-defense", "Sp. Def"),
    ("speed", "Speed"),
];

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Pokedex,
    Overview,
    Relations,
}

impl Tab {
    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Pokedex => Tab::Overview,
            Tab::Overview => Tab::Relations,
            Tab::Relations => Tab::Pokedex,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Pokedex => Tab::Relations,
            Tab::Overview => Tab::Pokedex,
            Tab::Relations => Tab::Overview,
        }
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results from the background load task, sent through an MPSC channel
/// back to the main application.
enum LoadResult {
    /// A resolution attempt finished: (done, total, entry name).
    Progress(usize, usize, String),
    /// The full table is ready.
    Table(DetailTable),
    /// The load failed outright.
    Error(String),
}

/// Progress sink that forwards fractions over the channel. A dropped
/// progress update is harmless; the final table message is what matters.
struct ChannelProgress {
    tx: mpsc::Sender<LoadResult>,
}

impl Progress for ChannelProgress {
    fn step(&mut self, done: usize, total: usize, label: &str) {
        let _ = self
            .tx
            .try_send(LoadResult::Progress(done, total, label.to_string()));
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,

    // Input data
    pub refs: Vec<CatalogRef>,
    pub ability_total: usize,
    pub snapshot_age: String,

    // Loaded data
    pub table: DetailTable,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub search_query: String,
    pub pokedex_selection: usize,
    pub histogram_stat_idx: usize,

    /// In-flight load progress: (done, total, current entry name).
    pub loading: Option<(usize, usize, String)>,
    pub status_message: Option<String>,

    // Background task channel
    load_rx: mpsc::Receiver<LoadResult>,
    load_tx: mpsc::Sender<LoadResult>,
}

impl App {
    pub fn new(
        config: Config,
        refs: Vec<CatalogRef>,
        ability_total: usize,
        snapshot_age: String,
    ) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            refs,
            ability_total,
            snapshot_age,

            table: DetailTable::default(),

            state: AppState::Normal,
            current_tab: Tab::Pokedex,
            focus: Focus::List,
            search_query: String::new(),
            pokedex_selection: 0,
            histogram_stat_idx: 1, // attack, matching the overview default

            loading: None,
            status_message: None,

            load_rx: rx,
            load_tx: tx,
        }
    }

    // =========================================================================
    // Background Data Load
    // =========================================================================

    /// Spawn a background task to resolve the detail sample.
    /// With `force`, the memoized table is bypassed and rebuilt.
    pub fn start_load(&mut self, force: bool) {
        info!(force, entries = self.refs.len(), "Starting background detail load");

        let tx = self.load_tx.clone();
        let config = self.config.clone();
        let refs = self.refs.clone();

        tokio::spawn(async move {
            Self::execute_load(tx, config, refs, force).await;
        });

        let sample = self.config.sample_size.min(self.refs.len());
        self.loading = Some((0, sample, String::new()));
        self.status_message = Some("Loading catalog details...".to_string());
    }

    /// Helper to send load results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<LoadResult>, result: LoadResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send load result - channel closed");
        }
    }

    /// Execute the background load: build the client and memo store,
    /// run the normalizer, send the table (or the error) back.
    async fn execute_load(
        tx: mpsc::Sender<LoadResult>,
        config: Config,
        refs: Vec<CatalogRef>,
        force: bool,
    ) {
        let api = match ApiClient::new(&config.api_base) {
            Ok(api) => api,
            Err(e) => {
                error!(error = %e, "Failed to create API client");
                Self::send_result(&tx, LoadResult::Error(e.to_string())).await;
                return;
            }
        };

        let memo = match config.memo_dir().and_then(DiskStore::new) {
            Ok(memo) => memo,
            Err(e) => {
                error!(error = %e, "Failed to open memo store");
                Self::send_result(&tx, LoadResult::Error(e.to_string())).await;
                return;
            }
        };

        let opts = NormalizeOptions {
            sample_size: config.sample_size,
            policy: config.failure_policy,
        };
        let mut normalizer = Normalizer::new(api, memo, opts);
        let mut progress = ChannelProgress { tx: tx.clone() };

        let result = if force {
            normalizer.refresh(&refs, &mut progress).await
        } else {
            normalizer.table_for(&refs, &mut progress).await
        };

        match result {
            Ok(table) => Self::send_result(&tx, LoadResult::Table(table)).await,
            Err(e) => {
                error!(error = %e, "Detail load failed");
                Self::send_result(&tx, LoadResult::Error(e.to_string())).await;
            }
        }
    }

    /// Drain pending results from the background task.
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.load_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_load_result(result);
        }
    }

    fn process_load_result(&mut self, result: LoadResult) {
        match result {
            LoadResult::Progress(done, total, label) => {
                self.loading = Some((done, total, label));
            }
            LoadResult::Table(table) => {
                info!(rows = table.len(), skipped = table.skipped.len(), "Detail load complete");
                self.status_message = Some(
                    if table.skipped.is_empty()
                        || self.config.failure_policy == FailurePolicy::Silent
                    {
                        format!("Loaded {} entries", table.len())
                    } else {
                        format!(
                            "Loaded {} entries ({} skipped)",
                            table.len(),
                            table.skipped.len()
                        )
                    },
                );
                self.table = table;
                self.loading = None;
                self.clamp_selection();
            }
            LoadResult::Error(msg) => {
                self.loading = None;
                self.status_message = Some(format!("Load failed: {}", msg));
            }
        }
    }

    // =========================================================================
    // Pokedex selection & search
    // =========================================================================

    /// Rows matching the current search query, in table order.
    pub fn filtered_rows(&self) -> Vec<&DetailRecord> {
        self.table
            .rows
            .iter()
            .filter(|r| {
                self.search_query.is_empty() || contains_ignore_case(&r.name, &self.search_query)
            })
            .collect()
    }

    pub fn selected_row(&self) -> Option<&DetailRecord> {
        self.filtered_rows().get(self.pokedex_selection).copied()
    }

    pub fn clamp_selection(&mut self) {
        let len = self.filtered_rows().len();
        if self.pokedex_selection >= len {
            self.pokedex_selection = len.saturating_sub(1);
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.filtered_rows().len();
        if len == 0 {
            self.pokedex_selection = 0;
            return;
        }
        let current = self.pokedex_selection as isize;
        self.pokedex_selection = (current + delta).clamp(0, len as isize - 1) as usize;
    }

    pub fn select_first(&mut self) {
        self.pokedex_selection = 0;
    }

    pub fn select_last(&mut self) {
        self.pokedex_selection = self.filtered_rows().len().saturating_sub(1);
    }

    // =========================================================================
    // Overview
    // =========================================================================

    /// Stat shown in the overview histogram: (raw identifier, label).
    pub fn histogram_stat(&self) -> (&'static str, &'static str) {
        CANONICAL_STATS[self.histogram_stat_idx % CANONICAL_STATS.len()]
    }

    pub fn cycle_histogram_stat(&mut self) {
        self.histogram_stat_idx = (self.histogram_stat_idx + 1) % CANONICAL_STATS.len();
    }
}
