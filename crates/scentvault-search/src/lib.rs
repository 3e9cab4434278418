//! # scentvault-search
//!
//! Keyword relevance filter over the perfume catalog.
//!
//! ```
//! use scentvault_search::filter_catalog;
//!
//! let ranked = filter_catalog("ok no go", &[], 10);
//! assert!(ranked.is_empty());
//! ```

pub mod relevance;

pub use relevance::{filter_catalog, filter_items, query_tokens, score};
