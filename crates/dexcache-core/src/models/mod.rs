//! Data models for catalog entities.
//!
//! Two layers live here:
//!
//! - Wire shapes as the API returns them: `ListPage`, `DetailResource`
//!   and its nested slots.
//! - The normalized `DetailRecord` that the rest of the application
//!   consumes, produced by `DetailResource::to_record`.

pub mod catalog;
pub mod detail;

pub use catalog::{CatalogRef, ListPage};
pub use detail::{capitalize, DetailRecord, DetailResource, StatEntry};
