//! REST API client module for the PokeAPI catalog.
//!
//! This module provides the `ApiClient` for fetching listing pages and
//! detail resources, and the `CatalogSource` trait that the lister and
//! normalizer are written against so they can be exercised offline.
//!
//! The API is public and unauthenticated; requests carry no credentials.

pub mod client;
pub mod error;

pub use client::{ApiClient, CatalogSource};
pub use error::ApiError;
