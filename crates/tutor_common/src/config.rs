//! Configuration management
//!
//! JSON config with layered precedence, highest first:
//! 1. Environment variables (`CODE_TUTOR_API_KEY` or `ANTHROPIC_API_KEY`
//!    for the API key)
//! 2. User config (`~/.config/code-tutor/config.json`)
//! 3. System config (`/etc/code-tutor/config.json`) for shared deployments
//! 4. Defaults
//!
//! For classroom servers the API key can be pinned via the system config
//! with `api_key_locked: true`; each student keeps their own preferences
//! under their home directory.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";
pub const SYSTEM_CONFIG_DIR: &str = "/etc/code-tutor";

/// Environment variables checked for the API key, in order of precedence.
pub const API_KEY_ENV_VARS: &[&str] = &["CODE_TUTOR_API_KEY", "ANTHROPIC_API_KEY"];

pub const EXPERIENCE_LEVELS: &[&str] = &["beginner", "intermediate", "advanced", "expert"];
pub const QUESTION_STYLES: &[&str] = &["socratic", "direct", "exploratory"];
pub const FOCUS_AREAS: &[&str] = &[
    "design",
    "readability",
    "performance",
    "security",
    "testing",
    "documentation",
];
pub const AVAILABLE_MODELS: &[&str] = &[
    "claude-opus-4-5",
    "claude-sonnet-4-5",
    "claude-haiku-4-5",
];

fn default_model() -> String {
    "claude-sonnet-4-5".to_string()
}

fn default_experience_level() -> String {
    "intermediate".to_string()
}

fn default_question_style() -> String {
    "socratic".to_string()
}

fn default_verbosity() -> String {
    "medium".to_string()
}

fn default_focus_areas() -> Vec<String> {
    vec!["design".to_string(), "readability".to_string()]
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(default = "default_question_style")]
    pub question_style: String,
    #[serde(default = "default_verbosity")]
    pub verbosity: String,
    #[serde(default = "default_focus_areas")]
    pub focus_areas: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            question_style: default_question_style(),
            verbosity: default_verbosity(),
            focus_areas: default_focus_areas(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub log_interactions: bool,
    pub log_api_calls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    pub api_key: String,
    pub api_key_locked: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_experience_level")]
    pub experience_level: String,
    /// Empty means the default `~/code-tutor-exercises/`.
    pub exercises_dir: String,
    pub preferences: Preferences,
    pub logging: LoggingConfig,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_key_locked: false,
            model: default_model(),
            experience_level: default_experience_level(),
            exercises_dir: String::new(),
            preferences: Preferences::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Loads, merges and persists [`TutorConfig`].
pub struct ConfigManager {
    config_dir: PathBuf,
    system_config_dir: PathBuf,
    config: TutorConfig,
    env_api_key: Option<String>,
}

impl ConfigManager {
    pub fn new(config_dir: Option<PathBuf>) -> Self {
        let config_dir = config_dir.unwrap_or_else(Self::default_config_dir);
        Self {
            config_dir,
            system_config_dir: PathBuf::from(SYSTEM_CONFIG_DIR),
            config: TutorConfig::default(),
            env_api_key: None,
        }
    }

    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("code-tutor")
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    #[cfg(test)]
    fn with_system_dir(mut self, dir: PathBuf) -> Self {
        self.system_config_dir = dir;
        self
    }

    /// Load configuration with precedence merging. System config errors are
    /// ignored silently; a corrupt user config is a hard error so the user
    /// notices before their preferences are clobbered by a later save.
    pub fn load(&mut self) -> Result<&TutorConfig> {
        let mut config = TutorConfig::default();

        let system_path = self.system_config_dir.join(CONFIG_FILE);
        if system_path.exists() {
            if let Ok(text) = std::fs::read_to_string(&system_path) {
                if let Ok(system_config) = serde_json::from_str::<TutorConfig>(&text) {
                    config = system_config;
                } else {
                    tracing::warn!(path = %system_path.display(), "ignoring unreadable system config");
                }
            }
        }

        let user_path = self.config_path();
        if user_path.exists() {
            let text = std::fs::read_to_string(&user_path)
                .with_context(|| format!("Failed to read {}", user_path.display()))?;
            config = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse {}", user_path.display()))?;
        }

        self.env_api_key = Self::env_api_key();
        self.config = config;
        Ok(&self.config)
    }

    fn env_api_key() -> Option<String> {
        API_KEY_ENV_VARS.iter().find_map(|var| {
            std::env::var(var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }

    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)
            .with_context(|| format!("Failed to create {}", self.config_dir.display()))?;

        let text = serde_json::to_string_pretty(&self.config)?;
        std::fs::write(self.config_path(), text)
            .with_context(|| format!("Failed to write {}", self.config_path().display()))?;
        Ok(())
    }

    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TutorConfig {
        &mut self.config
    }

    /// True once an API key is available from any source.
    pub fn is_configured(&self) -> bool {
        self.env_api_key.is_some() || !self.config.api_key.is_empty()
    }

    /// API key with environment precedence.
    pub fn api_key(&self) -> Result<String> {
        if let Some(key) = &self.env_api_key {
            return Ok(key.clone());
        }
        if !self.config.api_key.is_empty() {
            return Ok(self.config.api_key.clone());
        }
        Err(anyhow!(
            "API key not configured. Either:\n  1. Run 'tutorctl setup' to configure\n  2. Set CODE_TUTOR_API_KEY or ANTHROPIC_API_KEY"
        ))
    }

    pub fn is_api_key_from_env(&self) -> bool {
        self.env_api_key.is_some()
    }

    pub fn can_modify_api_key(&self) -> bool {
        !self.config.api_key_locked
    }

    pub fn exercises_dir(&self) -> PathBuf {
        if !self.config.exercises_dir.is_empty() {
            return PathBuf::from(&self.config.exercises_dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("code-tutor-exercises")
    }
}

pub fn validate_experience_level(level: &str) -> bool {
    EXPERIENCE_LEVELS.contains(&level)
}

pub fn validate_question_style(style: &str) -> bool {
    QUESTION_STYLES.contains(&style)
}

pub fn validate_focus_area(area: &str) -> bool {
    FOCUS_AREAS.contains(&area)
}

pub fn validate_model(model: &str) -> bool {
    AVAILABLE_MODELS.contains(&model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> ConfigManager {
        // Point the system path somewhere empty so host files cannot leak in.
        ConfigManager::new(Some(dir.path().join("user")))
            .with_system_dir(dir.path().join("system"))
    }

    #[test]
    fn test_defaults_when_no_files_exist() {
        let dir = TempDir::new().unwrap();
        let mut mgr = manager(&dir);
        let config = mgr.load().unwrap();
        assert_eq!(config.model, "claude-sonnet-4-5");
        assert_eq!(config.experience_level, "intermediate");
        assert_eq!(config.preferences.question_style, "socratic");
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut mgr = manager(&dir);
        mgr.load().unwrap();
        mgr.config_mut().experience_level = "advanced".to_string();
        mgr.config_mut().api_key = "sk-test".to_string();
        mgr.save().unwrap();

        let mut fresh = manager(&dir);
        let config = fresh.load().unwrap();
        assert_eq!(config.experience_level, "advanced");
        assert_eq!(config.api_key, "sk-test");
    }

    #[test]
    fn test_user_config_overrides_system() {
        let dir = TempDir::new().unwrap();
        let system_dir = dir.path().join("system");
        std::fs::create_dir_all(&system_dir).unwrap();
        std::fs::write(
            system_dir.join(CONFIG_FILE),
            r#"{"model": "claude-haiku-4-5", "api_key_locked": true}"#,
        )
        .unwrap();

        let mut mgr = manager(&dir);
        assert_eq!(mgr.load().unwrap().model, "claude-haiku-4-5");
        assert!(!mgr.can_modify_api_key());

        let user_dir = dir.path().join("user");
        std::fs::create_dir_all(&user_dir).unwrap();
        std::fs::write(
            user_dir.join(CONFIG_FILE),
            r#"{"model": "claude-opus-4-5"}"#,
        )
        .unwrap();
        assert_eq!(mgr.load().unwrap().model, "claude-opus-4-5");
    }

    #[test]
    fn test_corrupt_user_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let user_dir = dir.path().join("user");
        std::fs::create_dir_all(&user_dir).unwrap();
        std::fs::write(user_dir.join(CONFIG_FILE), "{not json").unwrap();

        let mut mgr = manager(&dir);
        assert!(mgr.load().is_err());
    }

    #[test]
    fn test_validators() {
        assert!(validate_experience_level("beginner"));
        assert!(!validate_experience_level("wizard"));
        assert!(validate_question_style("socratic"));
        assert!(!validate_question_style("rude"));
        assert!(validate_model("claude-sonnet-4-5"));
        assert!(!validate_model("gpt-2"));
    }
}
