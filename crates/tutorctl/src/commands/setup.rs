//! Interactive first-run setup.

use anyhow::Result;
use console::Term;
use std::path::PathBuf;
use tutor_common::config::{
    ConfigManager, AVAILABLE_MODELS, EXPERIENCE_LEVELS, FOCUS_AREAS, QUESTION_STYLES,
};

use crate::ui;

pub fn run(config_dir: Option<PathBuf>) -> Result<()> {
    let term = Term::stdout();
    ui::banner(&term, "Welcome to Code Tutor!")?;

    let mut manager = ConfigManager::new(config_dir);
    manager.load()?;

    if manager.is_configured() {
        ui::warn(&term, "Existing configuration found.")?;
        if !ui::confirm(&term, "Do you want to reconfigure?", false)? {
            ui::success(&term, "Setup cancelled. Using existing configuration.")?;
            return Ok(());
        }
    }

    // API key
    ui::section(&term, "Step 1: Anthropic API Key")?;
    ui::dim(
        &term,
        "Get your API key from: https://console.anthropic.com/settings/keys",
    )?;
    if manager.is_api_key_from_env() {
        ui::dim(
            &term,
            "An API key is already set via environment variable; it takes precedence.",
        )?;
    }

    if manager.can_modify_api_key() {
        let current = manager.config().api_key.clone();
        let prompt = if current.is_empty() {
            "API Key:"
        } else {
            "API Key (press Enter to keep current):"
        };
        let entered = ui::ask_secret(&term, prompt)?;
        let api_key = if entered.is_empty() { current } else { entered };
        if api_key.is_empty() && !manager.is_api_key_from_env() {
            ui::error(&term, "API key is required. Setup cancelled.")?;
            return Ok(());
        }
        manager.config_mut().api_key = api_key;
    } else {
        ui::dim(&term, "The API key is locked by the system configuration.")?;
    }

    // Model
    term.write_line("")?;
    ui::section(&term, "Step 2: Claude Model")?;
    ui::dim(&term, "Choose which Claude model to use for code review.")?;
    let model_idx = ui::choose(&term, "Choose your model", AVAILABLE_MODELS, 1)?;
    manager.config_mut().model = AVAILABLE_MODELS[model_idx].to_string();

    // Experience level
    term.write_line("")?;
    ui::section(&term, "Step 3: Your Programming Experience")?;
    ui::dim(&term, "This helps tailor feedback to your skill level.")?;
    let level_idx = ui::choose(&term, "Choose your experience level", EXPERIENCE_LEVELS, 1)?;
    manager.config_mut().experience_level = EXPERIENCE_LEVELS[level_idx].to_string();

    // Question style
    term.write_line("")?;
    ui::section(&term, "Step 4: Preferred Question Style")?;
    let style_labels = [
        "Socratic - Guide you to discover insights through questions",
        "Direct - Ask straightforward, specific questions",
        "Exploratory - Open-ended questions about alternatives",
    ];
    let style_idx = ui::choose(&term, "Choose your question style", &style_labels, 0)?;
    manager.config_mut().preferences.question_style = QUESTION_STYLES[style_idx].to_string();

    // Focus areas
    term.write_line("")?;
    ui::section(&term, "Step 5: Focus Areas")?;
    ui::dim(&term, "Enter numbers separated by commas (e.g. 1,2,4)")?;
    for (i, area) in FOCUS_AREAS.iter().enumerate() {
        term.write_line(&format!("  {}. {area}", i + 1))?;
    }
    let focus_input = ui::ask_with_default(&term, "Choose focus areas", "1,2")?;
    let focus_areas = parse_focus_selection(&focus_input);
    manager.config_mut().preferences.focus_areas = focus_areas;

    manager.save()?;
    term.write_line("")?;
    ui::success(
        &term,
        &format!("Configuration saved to {}", manager.config_path().display()),
    )?;
    ui::info(
        &term,
        "You're all set! Run 'tutorctl review <file>' to start.",
    )?;
    Ok(())
}

/// Comma-separated 1-based indices into [`FOCUS_AREAS`]; invalid input
/// falls back to the defaults.
fn parse_focus_selection(input: &str) -> Vec<String> {
    let selected: Vec<String> = input
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1 && n <= FOCUS_AREAS.len())
        .map(|n| FOCUS_AREAS[n - 1].to_string())
        .collect();

    if selected.is_empty() {
        vec!["design".to_string(), "readability".to_string()]
    } else {
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_selection_parses_indices() {
        assert_eq!(parse_focus_selection("1,3"), ["design", "performance"]);
        assert_eq!(parse_focus_selection(" 2 , 6 "), ["readability", "documentation"]);
    }

    #[test]
    fn test_focus_selection_falls_back_on_garbage() {
        assert_eq!(parse_focus_selection("zero"), ["design", "readability"]);
        assert_eq!(parse_focus_selection("0,99"), ["design", "readability"]);
    }
}
