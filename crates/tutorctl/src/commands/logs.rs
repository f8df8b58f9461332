//! Session log maintenance.

use anyhow::Result;
use chrono::Local;
use console::Term;
use std::path::PathBuf;
use tutor_common::session_log;

use crate::ui;

pub fn export(config_dir: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    let term = Term::stdout();

    let output = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "code_tutor_logs_{}.json",
            Local::now().format("%Y%m%d_%H%M%S")
        ))
    });

    let count = session_log::export_all_logs(manager.config_dir(), &output)?;
    ui::success(
        &term,
        &format!("Exported {count} session(s) to {}", output.display()),
    )?;
    Ok(())
}

pub fn clear(config_dir: Option<PathBuf>) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    let term = Term::stdout();

    if !ui::confirm(&term, "Delete all session logs?", false)? {
        ui::dim(&term, "Cancelled.")?;
        return Ok(());
    }

    let count = session_log::clear_logs(manager.config_dir());
    ui::success(&term, &format!("Deleted {count} log file(s)."))?;
    Ok(())
}
