//! HTTP handlers.

pub mod assistant;
pub mod perfumes;
pub mod system;
