//! llm-council - configuration for an LLM council
//!
//! Several council models answer a prompt through OpenRouter and a chairman
//! model synthesizes the final response. This crate owns the settings those
//! components share: build an [`ApplicationConfig`] once with [`load`] and
//! pass it to every consumer.

pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod secret;

pub use config::{
    load, ApplicationConfig, ConfigLoader, CHAIRMAN_MODEL, COUNCIL_MODELS, DATA_DIR,
    DEFAULT_CHAIRMAN_MODEL, OPENROUTER_API_KEY_ENV, OPENROUTER_API_URL,
};
pub use env::Env;
pub use error::{CouncilError, Result};
pub use secret::ApiKey;
