//! Configuration display.

use anyhow::Result;
use console::Term;
use std::path::PathBuf;

use crate::ui;

pub fn run(config_dir: Option<PathBuf>) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    let term = Term::stdout();
    let config = manager.config();

    ui::banner(&term, "Current Configuration")?;
    ui::info(
        &term,
        &format!("Config file: {}", manager.config_path().display()),
    )?;

    let key_display = if manager.is_api_key_from_env() {
        "set via environment".to_string()
    } else {
        mask_key(&config.api_key)
    };
    ui::info(&term, &format!("API key: {key_display}"))?;
    if !manager.can_modify_api_key() {
        ui::dim(&term, "API key is locked by the system configuration.")?;
    }

    ui::info(&term, &format!("Model: {}", config.model))?;
    ui::info(
        &term,
        &format!("Experience level: {}", config.experience_level),
    )?;
    ui::info(
        &term,
        &format!("Question style: {}", config.preferences.question_style),
    )?;
    ui::info(
        &term,
        &format!("Focus areas: {}", config.preferences.focus_areas.join(", ")),
    )?;
    ui::info(
        &term,
        &format!("Exercises directory: {}", manager.exercises_dir().display()),
    )?;
    ui::info(
        &term,
        &format!(
            "Session logging: {}",
            if config.logging.enabled { "enabled" } else { "disabled" }
        ),
    )?;

    term.write_line("")?;
    ui::dim(&term, "Run 'tutorctl setup' to reconfigure.")?;
    Ok(())
}

/// Masked display form of a stored API key. Counts characters, not bytes;
/// keys are user-supplied and need not be ASCII.
fn mask_key(key: &str) -> String {
    if key.is_empty() {
        "Not set".to_string()
    } else if key.chars().count() > 8 {
        format!("{}...", key.chars().take(8).collect::<String>())
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key_prefixes_long_keys() {
        assert_eq!(mask_key("sk-ant-api03-xyz"), "sk-ant-a...");
        assert_eq!(mask_key("short"), "***");
        assert_eq!(mask_key(""), "Not set");
    }

    #[test]
    fn test_mask_key_survives_multibyte_keys() {
        // Byte 8 falls inside the third character here; a byte slice
        // would panic on the boundary.
        assert_eq!(mask_key("€€€€€€€€€"), "€€€€€€€€...");
        assert_eq!(mask_key("€€€€"), "***");
    }
}
