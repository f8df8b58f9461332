//! Terminal output and input helpers
//!
//! Thin wrappers over `console` and `indicatif` so the command modules
//! stay focused on flow. All input goes through the terminal, not stdin
//! pipes; interactive sessions are the whole point of this binary.

use anyhow::Result;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Boxed headline, cyan border.
pub fn banner(term: &Term, title: &str) -> Result<()> {
    let width = title.chars().count() + 4;
    term.write_line(&style(format!("+{}+", "-".repeat(width))).cyan().to_string())?;
    term.write_line(
        &style(format!("|  {title}  |")).cyan().bold().to_string(),
    )?;
    term.write_line(&style(format!("+{}+", "-".repeat(width))).cyan().to_string())?;
    term.write_line("")?;
    Ok(())
}

pub fn section(term: &Term, title: &str) -> Result<()> {
    term.write_line(&style(title).bold().to_string())?;
    Ok(())
}

pub fn info(term: &Term, text: &str) -> Result<()> {
    term.write_line(&style(text).cyan().to_string())?;
    Ok(())
}

pub fn dim(term: &Term, text: &str) -> Result<()> {
    term.write_line(&style(text).dim().to_string())?;
    Ok(())
}

pub fn success(term: &Term, text: &str) -> Result<()> {
    term.write_line(&style(format!("✓ {text}")).green().to_string())?;
    Ok(())
}

pub fn warn(term: &Term, text: &str) -> Result<()> {
    term.write_line(&style(text).yellow().to_string())?;
    Ok(())
}

pub fn error(term: &Term, text: &str) -> Result<()> {
    term.write_line(&style(format!("Error: {text}")).red().to_string())?;
    Ok(())
}

/// Bulleted list block.
pub fn bullet_list(term: &Term, items: &[String]) -> Result<()> {
    for item in items {
        term.write_line(&format!("  • {item}"))?;
    }
    term.write_line("")?;
    Ok(())
}

/// Prompt for a line of input. Returns the trimmed line.
pub fn ask(term: &Term, prompt: &str) -> Result<String> {
    term.write_str(&format!("{} ", style(prompt).bold()))?;
    let line = term.read_line()?;
    Ok(line.trim().to_string())
}

/// Prompt for input with a default when the user just presses Enter.
pub fn ask_with_default(term: &Term, prompt: &str, default: &str) -> Result<String> {
    let answer = ask(term, &format!("{prompt} [{default}]:"))?;
    if answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer)
    }
}

/// Prompt for a secret; echo is disabled.
pub fn ask_secret(term: &Term, prompt: &str) -> Result<String> {
    term.write_str(&format!("{} ", style(prompt).bold()))?;
    let line = term.read_secure_line()?;
    Ok(line.trim().to_string())
}

/// Yes/no confirmation.
pub fn confirm(term: &Term, prompt: &str, default: bool) -> Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    let answer = ask(term, &format!("{prompt} [{hint}]:"))?;
    if answer.is_empty() {
        return Ok(default);
    }
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Numbered menu; returns the chosen index (0-based).
pub fn choose(term: &Term, prompt: &str, options: &[&str], default: usize) -> Result<usize> {
    for (i, option) in options.iter().enumerate() {
        term.write_line(&format!("  {}. {option}", i + 1))?;
    }
    loop {
        let answer = ask_with_default(term, prompt, &(default + 1).to_string())?;
        if let Ok(n) = answer.parse::<usize>() {
            if n >= 1 && n <= options.len() {
                return Ok(n - 1);
            }
        }
        warn(term, "Please enter a number from the list.")?;
    }
}

/// Spinner for the model round-trips.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
