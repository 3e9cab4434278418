//! # scentvault-chat
//!
//! The conversational layer of ScentVault.
//!
//! - [`tools`]: `searchCatalog` and `findMixIngredients`
//! - [`recipe`]: secondary generation of a named blend
//! - [`assistant`]: [`PerfumeAssistant`], which routes each turn
//! - [`prompts`]: system prompts and fixed replies
//!
//! ## Example
//!
//! ```rust,ignore
//! use scentvault_chat::{AssistantConfig, PerfumeAssistant};
//!
//! let assistant = PerfumeAssistant::new(catalog, backend, AssistantConfig::from_env());
//! let reply = assistant.chat("rekomendasi parfum oud", None, &[]).await;
//! println!("{}", reply.response);
//! ```

pub mod assistant;
pub mod config;
pub mod prompts;
pub mod recipe;
pub mod tools;

pub use assistant::{Flow, PerfumeAssistant};
pub use config::AssistantConfig;
pub use prompts::{APOLOGY_MESSAGE, DECLINE_MESSAGE, OFF_TOPIC_MESSAGE};
pub use recipe::{format_recipe, mix_recipe_schema, RecipeGenerator};
pub use tools::{CatalogTool, CatalogTools};
