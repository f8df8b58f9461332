//! Exercise lifecycle commands.

use anyhow::Result;
use console::Term;
use std::path::PathBuf;
use std::str::FromStr;
use tutor_common::exercise_generator::ExerciseGenerator;
use tutor_common::exercise_store::{
    validate_exercise_type, ExerciseStatus, ExerciseStore, NewExercise, EXERCISE_TYPES,
};
use tutor_common::parse::ASSESSMENT_LEVELS;

use crate::ui;

fn store(manager: &tutor_common::config::ConfigManager) -> ExerciseStore {
    ExerciseStore::new(manager.exercises_dir())
}

pub fn new(
    config_dir: Option<PathBuf>,
    topic: &str,
    language: &str,
    exercise_type: &str,
    difficulty: &str,
) -> Result<()> {
    if !validate_exercise_type(exercise_type) {
        anyhow::bail!(
            "Unknown exercise type '{exercise_type}'. Use one of: {}",
            EXERCISE_TYPES.join(", ")
        );
    }

    let manager = super::load_config(config_dir)?;
    let term = Term::stdout();
    let generator = ExerciseGenerator::new(super::build_client(&manager)?);

    let bar = ui::spinner("Generating exercise...");
    let result = generator.generate(
        topic,
        language,
        exercise_type,
        difficulty,
        &manager.config().experience_level,
    );
    bar.finish_and_clear();
    let (exercise, violations) = result?;

    for violation in &violations {
        ui::warn(&term, &format!("Warning: {violation}"))?;
    }

    let created = store(&manager).create(&NewExercise {
        topic,
        language,
        exercise_type,
        difficulty,
        instructions: &exercise.instructions,
        starter_code: &exercise.starter_code,
        test_code: if exercise.test_code.trim().is_empty() {
            None
        } else {
            Some(&exercise.test_code)
        },
        hints: exercise.hints.clone(),
        learning_objectives: exercise.learning_objectives.clone(),
    })?;

    ui::success(&term, &format!("Created exercise '{}'", created.id))?;
    ui::info(&term, &format!("Location: {}", created.path.display()))?;
    term.write_line("")?;
    ui::section(&term, "Learning Objectives")?;
    ui::bullet_list(&term, &created.metadata.learning_objectives)?;
    ui::dim(
        &term,
        "Open the README.md there to get started. Hints are available with 'tutorctl exercise hint'.",
    )?;
    Ok(())
}

pub fn list(config_dir: Option<PathBuf>, status: Option<&str>) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    let term = Term::stdout();

    let filter = status.map(ExerciseStatus::from_str).transpose()?;
    let exercises = store(&manager).list(filter);

    if exercises.is_empty() {
        ui::warn(&term, "No exercises found.")?;
        return Ok(());
    }

    ui::section(&term, &format!("{} exercise(s)", exercises.len()))?;
    for exercise in exercises {
        let meta = &exercise.metadata;
        term.write_line(&format!(
            "  {}  [{}]  {} / {} / {}  hints: {}/{}",
            exercise.id,
            meta.status,
            meta.language,
            meta.exercise_type,
            meta.difficulty,
            meta.hints_revealed,
            meta.solution_hints.len(),
        ))?;
    }
    Ok(())
}

pub fn hint(config_dir: Option<PathBuf>, exercise: &str) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    let term = Term::stdout();

    match store(&manager).next_hint(exercise)? {
        Some(hint) => {
            ui::section(&term, "Hint")?;
            term.write_line(&format!("  {hint}"))?;
        }
        None => ui::warn(&term, "No more hints available. You have seen them all!")?,
    }
    Ok(())
}

pub fn submit(config_dir: Option<PathBuf>, exercise: &str) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    let term = Term::stdout();
    let exercise_store = store(&manager);

    let found = exercise_store
        .get(exercise)
        .ok_or_else(|| anyhow::anyhow!("Exercise not found: {exercise}"))?;
    let code = found
        .starter_code()
        .ok_or_else(|| anyhow::anyhow!("No starter file found in {}", found.path.display()))?;

    exercise_store.update_status(&found.id, ExerciseStatus::Submitted)?;

    let generator = ExerciseGenerator::new(super::build_client(&manager)?);
    let bar = ui::spinner("Reviewing your submission...");
    let review = generator.review_submission(
        &found.metadata.topic,
        &found.metadata.exercise_type,
        &found.metadata.learning_objectives,
        &code,
        &found.metadata.language,
        &manager.config().experience_level,
    );
    bar.finish_and_clear();
    let review = review?;

    ui::section(&term, "Review")?;
    term.write_line("")?;
    term.write_line(&review.feedback)?;
    term.write_line("")?;

    if ASSESSMENT_LEVELS.contains(&review.assessment.as_str()) {
        ui::info(&term, &format!("Overall assessment: {}", review.assessment))?;
    }

    exercise_store.update_status(&found.id, ExerciseStatus::Reviewed)?;
    Ok(())
}

pub fn archive(config_dir: Option<PathBuf>, exercise: &str) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    let term = Term::stdout();
    let dest = store(&manager).archive(exercise)?;
    ui::success(&term, &format!("Archived to {}", dest.display()))?;
    Ok(())
}

pub fn delete(config_dir: Option<PathBuf>, exercise: &str) -> Result<()> {
    let manager = super::load_config(config_dir)?;
    let term = Term::stdout();

    if !ui::confirm(&term, &format!("Permanently delete '{exercise}'?"), false)? {
        ui::dim(&term, "Cancelled.")?;
        return Ok(());
    }
    store(&manager).delete(exercise)?;
    ui::success(&term, "Exercise deleted.")?;
    Ok(())
}
