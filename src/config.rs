//! Configuration for the LLM council
//!
//! The council roster, chairman, endpoint and data directory are fixed. Only
//! the OpenRouter credential comes from the environment, optionally seeded by
//! a `.env` file.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::env::{find_dotenv, Env};
use crate::error::{CouncilError, Result};
use crate::secret::ApiKey;

/// Environment variable holding the OpenRouter credential
pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// OpenRouter chat-completion endpoint
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Council members, in the order they are queried and reported
pub const COUNCIL_MODELS: [&str; 6] = [
    "openai/gpt-4o",
    "google/gemini-2.0-flash-001",
    "anthropic/claude-3.5-sonnet",
    "x-ai/grok-3-mini-beta",
    "deepseek/deepseek-chat",
    "perplexity/sonar-pro",
];

/// Synthesizes the final answer from council responses
pub const DEFAULT_CHAIRMAN_MODEL: &str = "google/gemini-2.0-flash-001";

/// Older name for [`DEFAULT_CHAIRMAN_MODEL`]
pub const CHAIRMAN_MODEL: &str = DEFAULT_CHAIRMAN_MODEL;

/// Where conversation transcripts are stored, relative to the working directory
pub const DATA_DIR: &str = "data/conversations";

/// Process-wide settings, built once at startup and passed to whatever needs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationConfig {
    api_key: Option<ApiKey>,
    council_models: Vec<String>,
    default_chairman_model: String,
    api_endpoint_url: String,
    data_directory: PathBuf,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            council_models: COUNCIL_MODELS.iter().map(|m| m.to_string()).collect(),
            default_chairman_model: DEFAULT_CHAIRMAN_MODEL.to_string(),
            api_endpoint_url: OPENROUTER_API_URL.to_string(),
            data_directory: PathBuf::from(DATA_DIR),
        }
    }
}

impl ApplicationConfig {
    /// Replace the credential, keeping everything else
    pub fn with_api_key(mut self, api_key: impl Into<ApiKey>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Credential for callers that are about to hit the network
    pub fn require_api_key(&self) -> Result<&ApiKey> {
        self.api_key
            .as_ref()
            .ok_or_else(|| CouncilError::MissingApiKey(OPENROUTER_API_KEY_ENV.to_string()))
    }

    pub fn council_models(&self) -> &[String] {
        &self.council_models
    }

    pub fn default_chairman_model(&self) -> &str {
        &self.default_chairman_model
    }

    /// Same value as [`Self::default_chairman_model`]
    #[deprecated(note = "use `default_chairman_model`")]
    pub fn chairman_model(&self) -> &str {
        self.default_chairman_model()
    }

    pub fn api_endpoint_url(&self) -> &str {
        &self.api_endpoint_url
    }

    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }
}

/// Load configuration from the process environment and the nearest `.env`
pub fn load() -> ApplicationConfig {
    ConfigLoader::new().load()
}

/// Builds an [`ApplicationConfig`] from an environment source.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env: Env,
    search_from: Option<PathBuf>,
    use_dotenv: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            env: Env::real(),
            search_from: None,
            use_dotenv: true,
        }
    }

    pub fn with_env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    /// Start the `.env` search at `dir` instead of the working directory
    pub fn search_from(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_from = Some(dir.into());
        self
    }

    pub fn skip_dotenv(mut self) -> Self {
        self.use_dotenv = false;
        self
    }

    /// Never fails: a missing or broken `.env` and a missing key are both
    /// legal outcomes.
    pub fn load(self) -> ApplicationConfig {
        let mut env = self.env;

        if self.use_dotenv {
            match dotenv_start(self.search_from) {
                Ok(start) => merge_nearest_dotenv(&mut env, &start),
                Err(e) => tracing::warn!("Skipping env file lookup: {}", e),
            }
        }

        let api_key = env.var(OPENROUTER_API_KEY_ENV).map(ApiKey::from);

        if api_key.is_some() {
            tracing::debug!("{} is set", OPENROUTER_API_KEY_ENV);
        } else {
            tracing::debug!("{} is not set", OPENROUTER_API_KEY_ENV);
        }

        ApplicationConfig {
            api_key,
            ..ApplicationConfig::default()
        }
    }
}

fn dotenv_start(search_from: Option<PathBuf>) -> Result<PathBuf> {
    match search_from {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

fn merge_nearest_dotenv(env: &mut Env, start: &Path) {
    let Some(path) = find_dotenv(start) else {
        tracing::debug!("No env file found from {}", start.display());
        return;
    };

    match env.merge_dotenv(&path) {
        Ok(applied) => {
            tracing::debug!("Merged {} variable(s) from {}", applied, path.display())
        }
        Err(CouncilError::EnvFile { source, .. }) if source.not_found() => {
            tracing::debug!("Env file vanished before it could be read: {}", path.display())
        }
        Err(e) => tracing::warn!("Ignoring unreadable env file: {}", e),
    }
}
