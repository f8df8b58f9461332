//! Interactive code review session.

use anyhow::Result;
use console::Term;
use serde_json::json;
use std::path::{Path, PathBuf};
use tutor_common::analyzer::CodeAnalyzer;
use tutor_common::config::ConfigManager;
use tutor_common::llm::LlmClient;
use tutor_common::session_log::SessionLogger;
use tutor_common::source_file::{find_source_files, read_source_file};

use crate::ui;

pub fn run(config_dir: Option<PathBuf>, path: &Path, recursive: bool) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    if !manager.is_configured() {
        anyhow::bail!("Code Tutor is not configured. Run 'tutorctl setup' first.");
    }

    let term = Term::stdout();
    if path.is_file() {
        review_file(&term, &manager, path)
    } else if path.is_dir() {
        review_directory(&term, &manager, path, recursive)
    } else {
        anyhow::bail!("Invalid path: {}", path.display());
    }
}

fn review_file(term: &Term, manager: &ConfigManager, path: &Path) -> Result<()> {
    let client = super::build_client(manager)?;
    let mut analyzer = CodeAnalyzer::new(client);
    let mut logger = SessionLogger::new(
        manager.config_dir(),
        manager.config().logging.enabled,
    );

    review_one(term, manager, &mut analyzer, &mut logger, path)?;
    logger.end_session();
    Ok(())
}

fn review_one<C: LlmClient>(
    term: &Term,
    manager: &ConfigManager,
    analyzer: &mut CodeAnalyzer<C>,
    logger: &mut SessionLogger,
    path: &Path,
) -> Result<()> {
    let experience_level = manager.config().experience_level.clone();
    let preferences = manager.config().preferences.clone();

    ui::info(term, &format!("Reading file: {}", path.display()))?;
    let file = read_source_file(path)?;
    ui::dim(
        term,
        &format!(
            "Language: {} | Lines: {} | Size: {} bytes",
            file.metadata.language, file.metadata.line_count, file.metadata.size_bytes
        ),
    )?;
    term.write_line("")?;

    logger.start_session("review", json!({ "file": path.display().to_string() }));

    let bar = ui::spinner("Analyzing code...");
    let analysis = analyzer.analyze(&file, &experience_level, &preferences);
    bar.finish_and_clear();
    let analysis = match analysis {
        Ok(a) => a,
        Err(e) => {
            logger.log_error("analysis", &e.to_string());
            return Err(e.into());
        }
    };
    logger.log_code_analysis(path, &analysis.raw_response);

    if !analysis.observations.is_empty() {
        ui::section(term, "Initial Observations")?;
        ui::bullet_list(term, &analysis.observations)?;
    }

    if analysis.questions.is_empty() {
        ui::warn(term, "No questions generated. This might indicate an issue.")?;
        return Ok(());
    }

    ui::section(term, "I have some questions about your code")?;
    ui::dim(term, "Please help me understand your design decisions:")?;
    term.write_line("")?;

    let mut answers = Vec::new();
    for (i, question) in analysis.questions.iter().enumerate() {
        ui::info(term, &format!("Question {}: {question}", i + 1))?;
        let answer = ui::ask(term, "Your answer:")?;
        logger.log_user_input("answer", &answer);
        answers.push(answer);
        term.write_line("")?;
    }

    let bar = ui::spinner("Generating personalized feedback...");
    let feedback = analyzer.process_answers(&answers, &experience_level, &preferences);
    bar.finish_and_clear();
    let feedback = match feedback {
        Ok(f) => f,
        Err(e) => {
            logger.log_error("feedback", &e.to_string());
            return Err(e.into());
        }
    };
    logger.log_ai_response("feedback", &feedback.feedback);

    ui::section(term, "Feedback & Suggestions")?;
    term.write_line("")?;
    term.write_line(&feedback.feedback)?;
    term.write_line("")?;

    follow_up(term, analyzer, logger)
}

fn follow_up<C: LlmClient>(
    term: &Term,
    analyzer: &mut CodeAnalyzer<C>,
    logger: &mut SessionLogger,
) -> Result<()> {
    loop {
        if !ui::confirm(term, "Do you have any follow-up questions?", false)? {
            ui::success(term, "Review session complete! Happy coding!")?;
            return Ok(());
        }

        let question = ui::ask(term, "Your question:")?;
        if question.is_empty() {
            continue;
        }
        logger.log_user_input("question", &question);

        let bar = ui::spinner("Thinking...");
        let response = analyzer.continue_conversation(&question);
        bar.finish_and_clear();

        match response {
            Ok(text) => {
                logger.log_ai_response("follow_up", &text);
                term.write_line(&text)?;
                term.write_line("")?;
            }
            Err(e) => {
                logger.log_error("follow_up", &e.to_string());
                ui::error(term, &e.to_string())?;
            }
        }
    }
}

fn review_directory(
    term: &Term,
    manager: &ConfigManager,
    directory: &Path,
    recursive: bool,
) -> Result<()> {
    let files = find_source_files(directory, recursive)?;
    if files.is_empty() {
        ui::warn(
            term,
            &format!("No supported source files found in {}", directory.display()),
        )?;
        return Ok(());
    }

    ui::info(term, &format!("Found {} file(s) to review:", files.len()))?;
    for (i, file) in files.iter().enumerate() {
        term.write_line(&format!("  {}. {}", i + 1, file.display()))?;
    }
    term.write_line("")?;

    let files = if ui::confirm(term, "Review all files?", false)? {
        files
    } else {
        let selection =
            ui::ask_with_default(term, "Enter file numbers to review (comma-separated) or 'all'", "all")?;
        select_files(files, &selection)
    };

    if files.is_empty() {
        ui::error(term, "Invalid selection")?;
        return Ok(());
    }

    let client = super::build_client(manager)?;
    let mut analyzer = CodeAnalyzer::new(client);
    let mut logger = SessionLogger::new(
        manager.config_dir(),
        manager.config().logging.enabled,
    );

    let total = files.len();
    for (i, file) in files.iter().enumerate() {
        term.write_line(&"=".repeat(60))?;
        ui::info(term, &format!("Reviewing file {}/{total}", i + 1))?;
        term.write_line(&"=".repeat(60))?;

        if let Err(e) = review_one(term, manager, &mut analyzer, &mut logger, file) {
            ui::error(term, &e.to_string())?;
        }

        if i + 1 < total && !ui::confirm(term, "Continue to next file?", true)? {
            break;
        }
        analyzer.reset();
    }

    logger.end_session();
    Ok(())
}

/// "all" keeps everything; otherwise comma-separated 1-based indices.
fn select_files(files: Vec<PathBuf>, selection: &str) -> Vec<PathBuf> {
    if selection.eq_ignore_ascii_case("all") {
        return files;
    }
    selection
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1 && n <= files.len())
        .map(|n| files[n - 1].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_files() {
        let files = vec![
            PathBuf::from("a.rs"),
            PathBuf::from("b.rs"),
            PathBuf::from("c.rs"),
        ];
        assert_eq!(select_files(files.clone(), "all").len(), 3);
        assert_eq!(
            select_files(files.clone(), "1, 3"),
            [PathBuf::from("a.rs"), PathBuf::from("c.rs")]
        );
        assert!(select_files(files, "0,9,x").is_empty());
    }
}
