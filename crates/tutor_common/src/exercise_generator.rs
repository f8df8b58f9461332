//! Exercise generation and submission review
//!
//! Stateless per-call: each generation or review is a single exchange, so
//! no conversation history is kept here.

use crate::contract::{ExerciseContract, ReviewContract};
use crate::conversation::ConversationHistory;
use crate::llm::{LlmClient, LlmError};
use crate::parse::{parse_exercise, parse_submission_review, ParsedExercise, ParsedReview};
use crate::prompt;

pub struct ExerciseGenerator<C> {
    client: C,
    contract: ExerciseContract,
    review_contract: ReviewContract,
}

impl<C: LlmClient> ExerciseGenerator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            contract: ExerciseContract::default(),
            review_contract: ReviewContract::default(),
        }
    }

    /// Generate an exercise. Returns the parsed exercise together with any
    /// contract violations; the caller decides whether to accept it.
    pub fn generate(
        &self,
        topic: &str,
        language: &str,
        exercise_type: &str,
        difficulty: &str,
        experience_level: &str,
    ) -> Result<(ParsedExercise, Vec<String>), LlmError> {
        let prompt =
            prompt::generate_exercise(topic, language, exercise_type, difficulty, experience_level);
        let response = self
            .client
            .generate(&prompt, &ConversationHistory::new())?;

        let parsed = parse_exercise(&response);
        let violations = self.contract.validate(&parsed);
        if !violations.is_empty() {
            tracing::warn!(count = violations.len(), "generated exercise out of bounds");
        }
        Ok((parsed, violations))
    }

    /// Review a submitted solution.
    pub fn review_submission(
        &self,
        topic: &str,
        exercise_type: &str,
        learning_objectives: &[String],
        submitted_code: &str,
        language: &str,
        experience_level: &str,
    ) -> Result<ParsedReview, LlmError> {
        let prompt = prompt::review_submission(
            topic,
            exercise_type,
            learning_objectives,
            submitted_code,
            language,
            experience_level,
        );
        let response = self
            .client
            .generate(&prompt, &ConversationHistory::new())?;

        let parsed = parse_submission_review(&response);
        for violation in self.review_contract.validate(&parsed) {
            tracing::warn!(%violation, "submission review out of bounds");
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeLlmClient;

    const EXERCISE_RESPONSE: &str = "\
## Instructions
Implement a function that merges two sorted slices into one sorted vector without sorting again.

## Learning Objectives
- Understand the two-pointer technique
- Reason about loop invariants

## Starter Code
```rust
fn merge(a: &[i32], b: &[i32]) -> Vec<i32> {
    todo!()
}
```

## Test Code
```rust
assert_eq!(merge(&[1, 3], &[2]), vec![1, 2, 3]);
```

## Hints
1. Keep one index per input slice
2. Compare the heads and push the smaller
3. Drain whichever slice remains at the end

## Solution Explanation
Walk both slices with two indices, always appending the smaller head.
";

    #[test]
    fn test_generate_parses_all_sections() {
        let generator = ExerciseGenerator::new(FakeLlmClient::always(EXERCISE_RESPONSE));
        let (exercise, violations) = generator
            .generate("merging", "Rust", "implementation", "intermediate", "intermediate")
            .unwrap();

        assert!(violations.is_empty(), "{violations:?}");
        assert!(exercise.instructions.starts_with("Implement a function"));
        assert_eq!(exercise.learning_objectives.len(), 2);
        assert!(exercise.starter_code.contains("fn merge"));
        assert!(exercise.test_code.contains("assert_eq!"));
        assert_eq!(exercise.hints.len(), 3);
        assert!(exercise.solution_explanation.starts_with("Walk both slices"));
    }

    #[test]
    fn test_generate_reports_violations_for_thin_response() {
        let generator = ExerciseGenerator::new(FakeLlmClient::always("## Hints\n1. just try harder\n"));
        let (_, violations) = generator
            .generate("x", "Rust", "implementation", "beginner", "beginner")
            .unwrap();
        assert!(violations.iter().any(|v| v.contains("Missing starter code")));
        assert!(violations.iter().any(|v| v.contains("Instructions too short")));
    }

    #[test]
    fn test_review_extracts_assessment() {
        let generator = ExerciseGenerator::new(FakeLlmClient::always(
            "## Correctness\nAll cases pass.\n## Overall Assessment\nGOOD\nSolid work.\n",
        ));
        let review = generator
            .review_submission("merging", "implementation", &[], "fn merge() {}", "Rust", "beginner")
            .unwrap();
        assert_eq!(review.assessment, "GOOD");
        assert!(review.feedback.contains("All cases pass."));
    }
}
