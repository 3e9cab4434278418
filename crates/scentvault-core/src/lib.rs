//! # scentvault-core
//!
//! Core types, traits, and abstractions for ScentVault.
//!
//! This crate provides the catalog data model, the conversational types shared
//! by the assistant and the inference backends, and the trait seams
//! (catalog repository, chat backend) that concrete implementations satisfy.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod timeout;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use timeout::with_timeout;
pub use traits::*;
