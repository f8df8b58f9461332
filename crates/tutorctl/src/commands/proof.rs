//! Interactive proof review session.

use anyhow::Result;
use console::Term;
use serde_json::json;
use std::path::{Path, PathBuf};
use tutor_common::proof_analyzer::ProofAnalyzer;
use tutor_common::proof_file::{read_proof_file, validate_proof_experience_level};
use tutor_common::session_log::SessionLogger;

use crate::ui;

pub fn run(
    config_dir: Option<PathBuf>,
    path: &Path,
    domain: Option<&str>,
    level: &str,
) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    if !manager.is_configured() {
        anyhow::bail!("Code Tutor is not configured. Run 'tutorctl setup' first.");
    }
    if !validate_proof_experience_level(level) {
        anyhow::bail!(
            "Unknown experience level '{level}'. Use: student, undergrad, graduate, researcher."
        );
    }

    let term = Term::stdout();
    ui::info(&term, &format!("Reading proof: {}", path.display()))?;
    let file = read_proof_file(path)?;

    let mut details = format!(
        "Format: {} | Lines: {}",
        file.metadata.format, file.metadata.line_count
    );
    if file.metadata.is_formal {
        details.push_str(" | Formal proof");
    }
    if let Some(detected) = &file.metadata.detected_domain {
        if domain.is_none() {
            details.push_str(&format!(" | Detected domain: {detected}"));
        }
    }
    ui::dim(&term, &details)?;
    if !file.structure.proof_techniques.is_empty() {
        ui::dim(
            &term,
            &format!("Techniques: {}", file.structure.proof_techniques.join(", ")),
        )?;
    }
    term.write_line("")?;

    let client = super::build_client(&manager)?;
    let mut analyzer = ProofAnalyzer::new(client);
    let mut logger = SessionLogger::new(manager.config_dir(), manager.config().logging.enabled);
    logger.start_session(
        "proof_review",
        json!({ "file": path.display().to_string(), "level": level }),
    );

    let bar = ui::spinner("Analyzing proof...");
    let analysis = analyzer.analyze(&file, level, domain);
    bar.finish_and_clear();
    let analysis = match analysis {
        Ok(a) => a,
        Err(e) => {
            logger.log_error("analysis", &e.to_string());
            return Err(e.into());
        }
    };
    logger.log_ai_response("proof_analysis", &analysis.raw_response);

    if let Some(claim) = &analysis.main_claim {
        ui::section(&term, "Main Claim")?;
        term.write_line(&format!("  {claim}"))?;
        term.write_line("")?;
    }
    if !analysis.observations.is_empty() {
        ui::section(&term, "Initial Observations")?;
        ui::bullet_list(&term, &analysis.observations)?;
    }

    if analysis.questions.is_empty() {
        ui::warn(&term, "No questions generated. This might indicate an issue.")?;
        logger.end_session();
        return Ok(());
    }

    ui::section(&term, "Questions about your proof")?;
    term.write_line("")?;
    let mut answers = Vec::new();
    for (i, question) in analysis.questions.iter().enumerate() {
        ui::info(&term, &format!("Question {}: {question}", i + 1))?;
        let answer = ui::ask(&term, "Your answer:")?;
        logger.log_user_input("answer", &answer);
        answers.push(answer);
        term.write_line("")?;
    }

    let bar = ui::spinner("Generating feedback...");
    let feedback = analyzer.process_answers(&answers, level);
    bar.finish_and_clear();
    let feedback = match feedback {
        Ok(f) => f,
        Err(e) => {
            logger.log_error("feedback", &e.to_string());
            return Err(e.into());
        }
    };
    logger.log_ai_response("proof_feedback", &feedback.feedback);

    ui::section(&term, "Feedback")?;
    term.write_line("")?;
    term.write_line(&feedback.feedback)?;
    term.write_line("")?;

    loop {
        if !ui::confirm(&term, "Do you have any follow-up questions?", false)? {
            ui::success(&term, "Proof review complete!")?;
            break;
        }
        let question = ui::ask(&term, "Your question:")?;
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
                ui::error(&term, &e.to_string())?;
            }
        }
    }

    logger.end_session();
    Ok(())
}
