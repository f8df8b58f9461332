//! Command implementations, one module per top-level subcommand.

pub mod config;
pub mod exercise;
pub mod info;
pub mod logs;
pub mod proof;
pub mod review;
pub mod setup;
pub mod teach;

use anyhow::Result;
use std::path::PathBuf;
use tutor_common::config::ConfigManager;
use tutor_common::llm::{AnthropicClient, LlmConfig};

/// Load config from the given (or default) directory.
pub(crate) fn load_config(config_dir: Option<PathBuf>) -> Result<ConfigManager> {
    let mut manager = ConfigManager::new(config_dir);
    manager.load()?;
    Ok(manager)
}

/// Build the real LLM client from the loaded configuration.
pub(crate) fn build_client(manager: &ConfigManager) -> Result<AnthropicClient> {
    let config = LlmConfig {
        model: manager.config().model.clone(),
        api_key: manager.api_key()?,
        ..Default::default()
    };
    Ok(AnthropicClient::new(config)?)
}
