//! Exercise generation and submission-review parsing

use serde::{Deserialize, Serialize};

use super::{extract, FieldKind, SectionScanner, SectionSpec};

/// Ordered strongest-first; the first level found in a review response wins.
pub const ASSESSMENT_LEVELS: &[&str] = &["EXCELLENT", "GOOD", "ACCEPTABLE", "NEEDS_WORK"];

const DEFAULT_ASSESSMENT: &str = "ACCEPTABLE";

/// A generated practice exercise. Every field defaults to empty when its
/// section is missing from the response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedExercise {
    pub instructions: String,
    pub learning_objectives: Vec<String>,
    pub starter_code: String,
    pub test_code: String,
    pub hints: Vec<String>,
    pub solution_explanation: String,
}

/// Review of a submitted exercise solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedReview {
    pub feedback: String,
    pub assessment: String,
}

const EXERCISE_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        canonical: "instructions",
        labels: &["Instructions"],
        kind: FieldKind::FreeText,
    },
    SectionSpec {
        canonical: "learning_objectives",
        labels: &["Learning Objectives"],
        kind: FieldKind::BulletedList,
    },
    SectionSpec {
        canonical: "starter_code",
        labels: &["Starter Code"],
        kind: FieldKind::FencedCode,
    },
    SectionSpec {
        canonical: "test_code",
        labels: &["Test Code"],
        kind: FieldKind::FencedCode,
    },
    SectionSpec {
        canonical: "hints",
        labels: &["Hints"],
        kind: FieldKind::OrderedList,
    },
    // "Solution" also catches "Solution Explanation".
    SectionSpec {
        canonical: "solution_explanation",
        labels: &["Solution"],
        kind: FieldKind::FreeText,
    },
];

/// Parse an exercise-generation response into its components.
pub fn parse_exercise(response: &str) -> ParsedExercise {
    let sections = SectionScanner::new(EXERCISE_SECTIONS).scan(response);

    ParsedExercise {
        instructions: extract::free_text(sections.lines("instructions")),
        learning_objectives: extract::bulleted_list(sections.lines("learning_objectives")),
        starter_code: extract::verbatim_code(sections.lines("starter_code")),
        test_code: extract::verbatim_code(sections.lines("test_code")),
        hints: extract::ordered_list(sections.lines("hints")),
        solution_explanation: extract::free_text(sections.lines("solution_explanation")),
    }
}

/// Parse a submission review: the whole response is the feedback, plus an
/// overall assessment token scanned out of the text.
pub fn parse_submission_review(response: &str) -> ParsedReview {
    ParsedReview {
        feedback: response.to_string(),
        assessment: extract::assessment(response, ASSESSMENT_LEVELS, DEFAULT_ASSESSMENT)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = "\
## Instructions

Implement a ring buffer.

Keep the API minimal.

## Learning Objectives
- Understand wrap-around indexing
- Distinguish full from empty

## Starter Code
```python
class RingBuffer:
    def __init__(self, cap):
        pass
```

## Test Code
```python
def test_empty():
    assert RingBuffer(4).pop() is None
```

## Hints
1. Track head and count, not head and tail.
2. Use modulo for wrap-around.

## Solution Explanation
Keep a count field so full and empty are distinguishable.
";

    #[test]
    fn test_parses_all_sections() {
        let got = parse_exercise(FULL_RESPONSE);
        assert_eq!(
            got.instructions,
            "Implement a ring buffer.\n\nKeep the API minimal."
        );
        assert_eq!(
            got.learning_objectives,
            ["Understand wrap-around indexing", "Distinguish full from empty"]
        );
        assert!(got.starter_code.contains("class RingBuffer:"));
        assert!(got.starter_code.contains("    def __init__(self, cap):"));
        assert!(got.test_code.contains("def test_empty():"));
        assert_eq!(
            got.hints,
            ["Track head and count, not head and tail.", "Use modulo for wrap-around."]
        );
        assert_eq!(
            got.solution_explanation,
            "Keep a count field so full and empty are distinguishable."
        );
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let got = parse_exercise("## Instructions\nJust do it.\n");
        assert_eq!(got.instructions, "Just do it.");
        assert!(got.learning_objectives.is_empty());
        assert!(got.starter_code.is_empty());
        assert!(got.test_code.is_empty());
        assert!(got.hints.is_empty());
        assert!(got.solution_explanation.is_empty());
    }

    #[test]
    fn test_fake_header_inside_fence_stays_literal() {
        let response = "## Starter Code\n```python\n## Fake Header\nx = 1\n```\n## Hints\n1. hint\n";
        let got = parse_exercise(response);
        assert_eq!(got.starter_code, "## Fake Header\nx = 1");
        assert_eq!(got.hints, ["hint"]);
    }

    #[test]
    fn test_starter_and_test_code_stay_separate() {
        let got = parse_exercise(FULL_RESPONSE);
        assert!(!got.starter_code.contains("test_empty"));
        assert!(!got.test_code.contains("RingBuffer:"));
    }

    #[test]
    fn test_totality() {
        let got = parse_exercise("");
        assert!(got.instructions.is_empty());
        assert!(got.hints.is_empty());
    }

    #[test]
    fn test_review_assessment_extraction() {
        let got = parse_submission_review("Nice work overall.\n## Overall Assessment\nGOOD\n");
        assert_eq!(got.assessment, "GOOD");
        assert!(got.feedback.contains("Nice work"));

        let fallback = parse_submission_review("no verdict given");
        assert_eq!(fallback.assessment, "ACCEPTABLE");
    }

    #[test]
    fn test_review_strongest_level_wins() {
        // EXCELLENT is checked before ACCEPTABLE even if both appear.
        let got = parse_submission_review("ACCEPTABLE bordering on EXCELLENT");
        assert_eq!(got.assessment, "EXCELLENT");
    }
}
