/// Lightweight progress reporting used by long-running operations
/// (index fetch, detail normalization). Frontends implement this to
/// surface status to users; the pipeline itself has no UI dependency.
pub trait Progress {
    /// Called at the start with the total number of units (if known).
    fn begin(&mut self, _total: usize) {}

    /// Called after each unit is attempted, success or failure alike.
    /// `done` counts attempts, so `done as f64 / total as f64` is the
    /// completed fraction.
    fn step(&mut self, _done: usize, _total: usize, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
