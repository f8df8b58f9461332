//! Response contracts
//!
//! Declarative bounds applied to parsed responses before they reach the
//! user. A contract never mutates its input and never fails hard: it
//! returns a list of human-readable violations, and the caller decides
//! whether to warn, retry the prompt, or carry on with what was extracted.
//!
//! Defaults are deliberately loose; tests and stricter callers override
//! individual bounds.

use crate::parse::{
    ParsedAnalysis, ParsedCodeRound, ParsedEvaluation, ParsedExercise, ParsedProofRound,
    ParsedReview, ASSESSMENT_LEVELS,
};

/// Bounds for the initial code/proof analysis.
#[derive(Debug, Clone)]
pub struct AnalysisContract {
    pub min_questions: usize,
    pub max_questions: usize,
    pub min_observations: usize,
    /// Items shorter than this are flagged as suspiciously short for a
    /// clarifying question.
    pub min_question_len: usize,
}

impl Default for AnalysisContract {
    fn default() -> Self {
        Self {
            min_questions: 1,
            max_questions: 6,
            min_observations: 0,
            min_question_len: 10,
        }
    }
}

impl AnalysisContract {
    pub fn validate(&self, parsed: &ParsedAnalysis) -> Vec<String> {
        let mut violations = Vec::new();

        if parsed.questions.len() < self.min_questions {
            violations.push(format!(
                "Too few questions: {} < {}",
                parsed.questions.len(),
                self.min_questions
            ));
        }
        if parsed.questions.len() > self.max_questions {
            violations.push(format!(
                "Too many questions: {} > {}",
                parsed.questions.len(),
                self.max_questions
            ));
        }
        if parsed.observations.len() < self.min_observations {
            violations.push(format!(
                "Too few observations: {} < {}",
                parsed.observations.len(),
                self.min_observations
            ));
        }
        for question in &parsed.questions {
            if question.chars().count() < self.min_question_len {
                violations.push(format!("Suspiciously short question: '{question}'"));
            }
        }

        violations
    }
}

/// Bounds for a generated exercise.
#[derive(Debug, Clone)]
pub struct ExerciseContract {
    pub min_objectives: usize,
    pub min_hints: usize,
    pub max_hints: usize,
    pub min_instructions_len: usize,
    pub require_starter_code: bool,
}

impl Default for ExerciseContract {
    fn default() -> Self {
        Self {
            min_objectives: 1,
            min_hints: 1,
            max_hints: 5,
            min_instructions_len: 40,
            require_starter_code: true,
        }
    }
}

impl ExerciseContract {
    pub fn validate(&self, parsed: &ParsedExercise) -> Vec<String> {
        let mut violations = Vec::new();

        if parsed.learning_objectives.len() < self.min_objectives {
            violations.push(format!(
                "Too few learning objectives: {} < {}",
                parsed.learning_objectives.len(),
                self.min_objectives
            ));
        }
        if parsed.hints.len() < self.min_hints {
            violations.push(format!(
                "Too few hints: {} < {}",
                parsed.hints.len(),
                self.min_hints
            ));
        }
        if parsed.hints.len() > self.max_hints {
            violations.push(format!(
                "Too many hints: {} > {}",
                parsed.hints.len(),
                self.max_hints
            ));
        }
        if parsed.instructions.chars().count() < self.min_instructions_len {
            violations.push(format!(
                "Instructions too short: {} < {} chars",
                parsed.instructions.chars().count(),
                self.min_instructions_len
            ));
        }
        if self.require_starter_code && parsed.starter_code.trim().is_empty() {
            violations.push("Missing starter code".to_string());
        }

        violations
    }
}

/// Bounds for a flawed code/proof teaching round.
#[derive(Debug, Clone)]
pub struct TeachingContract {
    pub min_issues: usize,
    pub require_code: bool,
}

impl Default for TeachingContract {
    fn default() -> Self {
        Self {
            min_issues: 1,
            require_code: true,
        }
    }
}

impl TeachingContract {
    pub fn validate_code_round(&self, parsed: &ParsedCodeRound) -> Vec<String> {
        let mut violations = Vec::new();

        if self.require_code && parsed.code.trim().is_empty() {
            violations.push("Missing code block".to_string());
        }
        if parsed.student_question.trim().is_empty() {
            violations.push("Missing student question".to_string());
        }
        if parsed.issues.len() < self.min_issues {
            violations.push(format!(
                "Too few hidden issues: {} < {}",
                parsed.issues.len(),
                self.min_issues
            ));
        }

        violations
    }

    pub fn validate_proof_round(&self, parsed: &ParsedProofRound) -> Vec<String> {
        let mut violations = Vec::new();

        if parsed.theorem.trim().is_empty() {
            violations.push("Missing theorem statement".to_string());
        }
        if self.require_code && parsed.proof.trim().is_empty() {
            violations.push("Missing proof body".to_string());
        }
        if parsed.issues.len() < self.min_issues {
            violations.push(format!(
                "Too few hidden issues: {} < {}",
                parsed.issues.len(),
                self.min_issues
            ));
        }

        violations
    }
}

/// Bounds for an understanding-verdict evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationContract {
    pub min_feedback_len: usize,
}

impl Default for EvaluationContract {
    fn default() -> Self {
        Self {
            min_feedback_len: 20,
        }
    }
}

impl EvaluationContract {
    pub fn validate(&self, parsed: &ParsedEvaluation) -> Vec<String> {
        let mut violations = Vec::new();

        if parsed.feedback.chars().count() < self.min_feedback_len {
            violations.push(format!(
                "Feedback too short: {} < {} chars",
                parsed.feedback.chars().count(),
                self.min_feedback_len
            ));
        }

        violations
    }
}

/// Bounds for a submission review: the assessment must be a known level.
#[derive(Debug, Clone)]
pub struct ReviewContract {
    pub valid_assessments: Vec<String>,
}

impl Default for ReviewContract {
    fn default() -> Self {
        Self {
            valid_assessments: ASSESSMENT_LEVELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReviewContract {
    pub fn validate(&self, parsed: &ParsedReview) -> Vec<String> {
        let mut violations = Vec::new();

        if !self.valid_assessments.contains(&parsed.assessment) {
            violations.push(format!("Invalid assessment: '{}'", parsed.assessment));
        }

        violations
    }
}
