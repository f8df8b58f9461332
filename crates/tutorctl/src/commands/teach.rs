//! Teaching mode sessions: the model plays a stuck student.

use anyhow::Result;
use console::Term;
use serde_json::json;
use std::path::PathBuf;
use tutor_common::session_log::SessionLogger;
use tutor_common::teaching::{CodeTeacher, ProofTeacher, MAX_ROUNDS};

use crate::ui;

pub fn run_code(config_dir: Option<PathBuf>, topic: &str, language: &str) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    if !manager.is_configured() {
        anyhow::bail!("Code Tutor is not configured. Run 'tutorctl setup' first.");
    }
    let experience_level = manager.config().experience_level.clone();

    let term = Term::stdout();
    ui::banner(&term, &format!("Teaching Mode: {topic}"))?;
    ui::dim(
        &term,
        "A student will show you flawed code. Guide them with hints - don't just give the answer!",
    )?;
    term.write_line("")?;

    let mut teacher = CodeTeacher::new(super::build_client(&manager)?, topic, language);
    let mut logger = SessionLogger::new(manager.config_dir(), manager.config().logging.enabled);
    logger.start_session(
        "teaching",
        json!({ "topic": topic, "language": language }),
    );

    while teacher.rounds_remaining() {
        let bar = ui::spinner("The student is writing some code...");
        let round = teacher.next_round(&experience_level);
        bar.finish_and_clear();
        let round = match round {
            Ok(r) => r,
            Err(e) => {
                logger.log_error("round", &e.to_string());
                return Err(e.into());
            }
        };

        ui::info(
            &term,
            &format!("Round {} of {MAX_ROUNDS}", teacher.round_number()),
        )?;
        term.write_line("")?;

        ui::section(&term, "Student Question")?;
        term.write_line(&format!("  {}", round.student_question))?;
        term.write_line("")?;
        ui::section(&term, "Student's Code")?;
        for line in round.code.lines() {
            term.write_line(&format!("    {line}"))?;
        }
        term.write_line("")?;

        ui::section(&term, "How will you guide this student? Provide hints:")?;
        ui::dim(
            &term,
            "Give hints, ask leading questions, or point them in the right direction.",
        )?;
        let explanation = ui::ask(&term, "Your teaching response:")?;

        let bar = ui::spinner("The student is thinking about your hints...");
        let evaluation = teacher.evaluate(&round, &explanation, &experience_level);
        bar.finish_and_clear();
        let evaluation = match evaluation {
            Ok(e) => e,
            Err(e) => {
                logger.log_error("evaluation", &e.to_string());
                return Err(e.into());
            }
        };
        logger.log_teaching_round(
            teacher.round_number(),
            topic,
            &round.code,
            &explanation,
            &evaluation.feedback,
        );

        term.write_line("")?;
        term.write_line(&evaluation.feedback)?;
        term.write_line("")?;

        if evaluation.understanding_achieved {
            ui::success(&term, "The student got it! Great teaching.")?;
            if !teacher.rounds_remaining()
                || !ui::confirm(&term, "Try another round?", true)?
            {
                break;
            }
        } else {
            ui::warn(&term, "The student is still confused. Let's try another example...")?;
        }
    }

    logger.end_session();
    ui::success(&term, "Teaching session complete!")?;
    Ok(())
}

pub fn run_proof(config_dir: Option<PathBuf>, topic: &str, domain: &str) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    if !manager.is_configured() {
        anyhow::bail!("Code Tutor is not configured. Run 'tutorctl setup' first.");
    }
    let experience_level = manager.config().experience_level.clone();

    let term = Term::stdout();
    ui::banner(&term, &format!("Proof Teaching Mode: {topic}"))?;
    ui::dim(
        &term,
        "You will see proofs with hidden flaws. Identify the errors and explain why they break the argument.",
    )?;
    term.write_line("")?;

    let mut teacher = ProofTeacher::new(super::build_client(&manager)?, topic, domain);
    let mut logger = SessionLogger::new(manager.config_dir(), manager.config().logging.enabled);
    logger.start_session(
        "proof_teaching",
        json!({ "topic": topic, "domain": domain }),
    );

    while teacher.rounds_remaining() {
        let bar = ui::spinner("Preparing a flawed proof...");
        let round = teacher.next_round(&experience_level);
        bar.finish_and_clear();
        let round = match round {
            Ok(r) => r,
            Err(e) => {
                logger.log_error("round", &e.to_string());
                return Err(e.into());
            }
        };

        ui::info(
            &term,
            &format!("Round {} of {MAX_ROUNDS}", teacher.round_number()),
        )?;
        term.write_line("")?;

        ui::section(&term, "Theorem")?;
        term.write_line(&format!("  {}", round.theorem))?;
        term.write_line("")?;
        ui::section(&term, "Proof to Review")?;
        for line in round.proof.lines() {
            term.write_line(&format!("    {line}"))?;
        }
        term.write_line("")?;

        ui::section(&term, "What's wrong with this proof?")?;
        ui::dim(
            &term,
            "Identify any errors, gaps in reasoning, unjustified steps, or logical fallacies.",
        )?;
        let analysis = ui::ask(&term, "Your analysis:")?;

        let bar = ui::spinner("Evaluating your analysis...");
        let evaluation = teacher.evaluate(&round, &analysis, &experience_level);
        bar.finish_and_clear();
        let evaluation = match evaluation {
            Ok(e) => e,
            Err(e) => {
                logger.log_error("evaluation", &e.to_string());
                return Err(e.into());
            }
        };
        logger.log_teaching_round(
            teacher.round_number(),
            topic,
            &round.proof,
            &analysis,
            &evaluation.feedback,
        );

        term.write_line("")?;
        term.write_line(&evaluation.feedback)?;
        term.write_line("")?;

        if evaluation.understanding_achieved {
            ui::success(&term, "Excellent analysis! You identified the key issues.")?;
            if !teacher.rounds_remaining()
                || !ui::confirm(&term, "Try another flawed proof?", true)?
            {
                break;
            }
        } else {
            ui::warn(&term, "There's more to find. Let's try another example...")?;
        }
    }

    logger.end_session();
    ui::success(&term, "Proof teaching session complete!")?;
    Ok(())
}
