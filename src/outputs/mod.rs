//! Feed publication.
//!
//! # Submodules
//!
//! - [`json`]: writes the aggregated [`NewsFeed`](crate::models::NewsFeed) to
//!   `news.json` plus a dated archive copy

pub mod json;
