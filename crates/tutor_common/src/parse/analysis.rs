//! Initial-analysis and feedback response parsing
//!
//! The first exchange of a review session asks the model for clarifying
//! questions and non-judgmental observations before any critique. Proof
//! reviews additionally open with a one-line main claim.

use serde::{Deserialize, Serialize};

use super::{extract, FieldKind, SectionScanner, SectionSpec};

/// Parsed initial analysis of a piece of code or a proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedAnalysis {
    /// One-line statement of what is being proved. Absent for code reviews.
    pub main_claim: Option<String>,

    /// Clarifying questions, in response order.
    pub questions: Vec<String>,

    /// Initial observations, in response order.
    pub observations: Vec<String>,

    /// The unmodified response, kept for logging and display.
    pub raw_response: String,
}

/// Feedback responses are free-form markdown and pass through unparsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFeedback {
    pub feedback: String,
    pub raw_response: String,
}

const ANALYSIS_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        canonical: "main_claim",
        labels: &["Main Claim"],
        kind: FieldKind::FirstLine,
    },
    SectionSpec {
        canonical: "questions",
        labels: &["Questions", "Question"],
        kind: FieldKind::OrderedList,
    },
    SectionSpec {
        canonical: "observations",
        labels: &["Initial Observations", "Observations"],
        kind: FieldKind::BulletedList,
    },
];

/// Parse an initial-analysis response. Total: missing sections come back as
/// `None` / empty lists.
pub fn parse_initial_analysis(response: &str) -> ParsedAnalysis {
    let sections = SectionScanner::new(ANALYSIS_SECTIONS).scan(response);

    let claim = extract::first_line(sections.lines("main_claim"));

    ParsedAnalysis {
        main_claim: (!claim.is_empty()).then_some(claim),
        questions: extract::ordered_list(sections.lines("questions")),
        observations: extract::bulleted_list(sections.lines("observations")),
        raw_response: response.to_string(),
    }
}

/// Feedback is rendered as markdown downstream; no section structure is
/// imposed on it.
pub fn parse_feedback(response: &str) -> ParsedFeedback {
    ParsedFeedback {
        feedback: response.to_string(),
        raw_response: response.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_questions_and_observations() {
        let response = "## Questions\n\n1. Why recursion?\n\n## Initial Observations\n\n- Clean style\n";
        let got = parse_initial_analysis(response);
        assert_eq!(got.questions, ["Why recursion?"]);
        assert_eq!(got.observations, ["Clean style"]);
        assert!(got.main_claim.is_none());
        assert_eq!(got.raw_response, response);
    }

    #[test]
    fn test_main_claim_takes_first_line_only() {
        let response = "## Main Claim\nThe sum of two evens is even.\nExtra commentary.\n\n## Questions\n1. Why induction?\n";
        let got = parse_initial_analysis(response);
        assert_eq!(
            got.main_claim.as_deref(),
            Some("The sum of two evens is even.")
        );
        assert_eq!(got.questions, ["Why induction?"]);
    }

    #[test]
    fn test_empty_sections_are_valid() {
        let got = parse_initial_analysis("## Questions\n\n## Initial Observations\n\n");
        assert!(got.questions.is_empty());
        assert!(got.observations.is_empty());
    }

    #[test]
    fn test_observation_synonym_header() {
        let got = parse_initial_analysis("## Observations\n- terse\n");
        assert_eq!(got.observations, ["terse"]);
    }

    #[test]
    fn test_totality_on_noise() {
        for input in ["", "\u{0}\u{1}binary-ish", "## ## ##", "just words"] {
            let got = parse_initial_analysis(input);
            assert!(got.questions.is_empty());
            assert!(got.observations.is_empty());
        }
    }

    #[test]
    fn test_idempotent() {
        let response = "## Questions\n1. A?\n2. B?\n## Observations\n- x\n";
        let a = parse_initial_analysis(response);
        let b = parse_initial_analysis(response);
        assert_eq!(a.questions, b.questions);
        assert_eq!(a.observations, b.observations);
    }

    #[test]
    fn test_feedback_passes_through() {
        let got = parse_feedback("## Anything\ngoes **here**\n");
        assert_eq!(got.feedback, "## Anything\ngoes **here**\n");
        assert_eq!(got.feedback, got.raw_response);
    }
}
