//! Teaching-round response parsing
//!
//! In teaching mode the model plays a stuck student: it produces flawed
//! code (or a flawed proof) plus a hidden issue list for evaluation, then
//! judges the user's hints with a YES/NO understanding verdict.

use serde::{Deserialize, Serialize};

use super::{extract, FieldKind, SectionScanner, SectionSpec};

/// A flawed-code round: the code shown to the user, the student's framing
/// question, and the issues the model planted (never shown directly).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedCodeRound {
    pub code: String,
    pub student_question: String,
    pub issues: Vec<String>,
}

/// A flawed-proof round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedProofRound {
    pub theorem: String,
    pub proof: String,
    pub issues: Vec<String>,
}

/// Verdict on the user's teaching or analysis for one round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedEvaluation {
    pub understanding_achieved: bool,
    pub feedback: String,
}

const CODE_ROUND_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        canonical: "code",
        labels: &["Code"],
        kind: FieldKind::FencedCode,
    },
    SectionSpec {
        canonical: "student_question",
        labels: &["Student Question"],
        kind: FieldKind::SpaceJoined,
    },
    SectionSpec {
        canonical: "issues",
        labels: &["Hidden Issues", "Issues"],
        kind: FieldKind::BulletedList,
    },
];

const PROOF_ROUND_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        canonical: "theorem",
        labels: &["Theorem"],
        kind: FieldKind::FreeText,
    },
    // Proof bodies arrive as plain prose, no fence required.
    SectionSpec {
        canonical: "proof",
        labels: &["Flawed Proof", "Proof"],
        kind: FieldKind::FreeText,
    },
    SectionSpec {
        canonical: "issues",
        labels: &["Hidden Issues", "Issues"],
        kind: FieldKind::BulletedList,
    },
];

const UNDERSTANDING_LABEL: &str = "Understanding Achieved";
const UNDERSTANDING_KEYWORD: &str = "YES";

/// Parse a flawed-code round.
///
/// The fence sink matters here: models sometimes open the code fence under
/// a header variant the scanner does not recognize, and the fence alone
/// must still drive the capture.
pub fn parse_code_round(response: &str) -> ParsedCodeRound {
    let sections = SectionScanner::new(CODE_ROUND_SECTIONS)
        .with_fence_sink("code")
        .scan(response);

    ParsedCodeRound {
        code: extract::verbatim_code(sections.lines("code")),
        student_question: extract::space_joined(sections.lines("student_question")),
        issues: extract::bulleted_list(sections.lines("issues")),
    }
}

/// Parse a flawed-proof round.
pub fn parse_proof_round(response: &str) -> ParsedProofRound {
    let sections = SectionScanner::new(PROOF_ROUND_SECTIONS).scan(response);

    ParsedProofRound {
        theorem: extract::free_text(sections.lines("theorem")),
        proof: extract::free_text(sections.lines("proof")),
        issues: extract::bulleted_list(sections.lines("issues")),
    }
}

/// Parse an evaluation verdict. The feedback is the whole response (it is
/// rendered as the student speaking); the verdict is a keyword heuristic.
pub fn parse_evaluation(response: &str) -> ParsedEvaluation {
    ParsedEvaluation {
        understanding_achieved: extract::verdict(
            response,
            UNDERSTANDING_LABEL,
            UNDERSTANDING_KEYWORD,
        ),
        feedback: response.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_full_response() {
        let response = "\
## Code
```python
def avg(xs):
    return sum(xs) / len(xs)
```

## Student Question
I call avg on my readings list
but sometimes it crashes. Why?

## Hidden Issues
- Division by zero on empty input
- No handling of non-numeric items
";
        let got = parse_code_round(response);
        assert_eq!(got.code, "def avg(xs):\n    return sum(xs) / len(xs)");
        assert_eq!(
            got.student_question,
            "I call avg on my readings list but sometimes it crashes. Why?"
        );
        assert_eq!(
            got.issues,
            ["Division by zero on empty input", "No handling of non-numeric items"]
        );
    }

    #[test]
    fn test_code_round_fence_without_recognized_header() {
        // Header variant the scanner does not know; fence still captures.
        let response = "## The Snippet\n```rust\nlet x = 1;\n```\n## Student Question\nhelp?\n";
        let got = parse_code_round(response);
        assert_eq!(got.code, "let x = 1;");
        assert_eq!(got.student_question, "help?");
    }

    #[test]
    fn test_code_round_totality() {
        let got = parse_code_round("");
        assert!(got.code.is_empty());
        assert!(got.student_question.is_empty());
        assert!(got.issues.is_empty());
    }

    #[test]
    fn test_proof_round_keeps_proof_paragraphs() {
        let response = "\
## Theorem
Every even integer squared is even.

## Flawed Proof
Let n be even, so n = 2k.

Then n^2 = 4k^2 = 2(2k^2), which is odd.

## Hidden Issues
- The parity conclusion contradicts the computation
";
        let got = parse_proof_round(response);
        assert_eq!(got.theorem, "Every even integer squared is even.");
        assert!(got.proof.starts_with("Let n be even"));
        assert!(got.proof.contains("\n\n"), "paragraph break preserved");
        assert_eq!(got.issues.len(), 1);
    }

    #[test]
    fn test_proof_round_header_synonym() {
        let got = parse_proof_round("## Theorem\nT\n## Proof\nP\n## Issues\n- gap\n");
        assert_eq!(got.proof, "P");
        assert_eq!(got.issues, ["gap"]);
    }

    #[test]
    fn test_evaluation_yes_and_no() {
        let yes = parse_evaluation("## Feedback\nGood hints.\n## Understanding Achieved\nYES\n");
        assert!(yes.understanding_achieved);

        let no = parse_evaluation("## Feedback\nToo vague.\n## Understanding Achieved\nNO\n");
        assert!(!no.understanding_achieved);
    }

    #[test]
    fn test_evaluation_keyword_needs_label() {
        // "yes" in prose without the section label is not a verdict.
        let got = parse_evaluation("Yes, that is a reasonable question to ask.");
        assert!(!got.understanding_achieved);
    }

    #[test]
    fn test_evaluation_feedback_is_whole_response() {
        let response = "## Student Response\nOh! The accumulator resets.\n## Understanding Achieved\nYES";
        let got = parse_evaluation(response);
        assert_eq!(got.feedback, response);
    }
}
