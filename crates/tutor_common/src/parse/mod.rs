//! Structured response parsing
//!
//! The model is asked to answer in a small markdown-like grammar: `##`
//! headers naming sections, numbered or bulleted lists, and triple-backtick
//! fences around code. This module turns a raw response string into typed
//! structures via a line-oriented state machine.
//!
//! Two rules hold everywhere:
//! - Parsing is total. Any input, including empty or garbage text, produces
//!   a default-filled result. Quality problems are reported by the contract
//!   layer, not by errors from here.
//! - Content inside an open fence is captured verbatim and is never
//!   mistaken for a section header.

pub mod analysis;
pub mod exercise;
pub mod extract;
pub mod teaching;

pub use analysis::{parse_feedback, parse_initial_analysis, ParsedAnalysis, ParsedFeedback};
pub use exercise::{
    parse_exercise, parse_submission_review, ParsedExercise, ParsedReview, ASSESSMENT_LEVELS,
};
pub use teaching::{
    parse_code_round, parse_evaluation, parse_proof_round, ParsedCodeRound, ParsedEvaluation,
    ParsedProofRound,
};

/// How the raw lines of a section are interpreted once collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Joined with newlines; interior blank lines kept, edges trimmed.
    FreeText,
    /// Only the first non-blank line is kept (main-claim sections).
    FirstLine,
    /// Non-blank lines joined with single spaces (student-question quirk).
    SpaceJoined,
    /// One item per line with leading ordinals stripped.
    OrderedList,
    /// One item per line with leading bullet glyphs stripped.
    BulletedList,
    /// Verbatim lines captured only while inside a code fence.
    FencedCode,
}

/// One recognized section: its canonical name, the header labels that route
/// to it, and how its lines are interpreted.
///
/// Label matching is case-sensitive substring containment on the trimmed
/// header line, so `"Question"` matches both `## Question` and
/// `## Questions`. The first declared section that matches wins; declaration
/// order is part of the parser configuration.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub canonical: &'static str,
    pub labels: &'static [&'static str],
    pub kind: FieldKind,
}

/// Policy for a section that receives more than one fenced block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePolicy {
    /// Concatenate every fence captured for the section (original behavior).
    #[default]
    Concatenate,
    /// Keep the first fence and ignore later ones.
    FirstOnly,
}

/// Line-oriented scanner: classifies each line of a response into a section
/// and accumulates the section's raw lines.
#[derive(Debug, Clone)]
pub struct SectionScanner {
    specs: &'static [SectionSpec],
    fence_sink: Option<&'static str>,
    fence_policy: FencePolicy,
}

/// Raw lines per section, as collected by [`SectionScanner::scan`].
#[derive(Debug, Clone)]
pub struct Sections {
    names: &'static [SectionSpec],
    buffers: Vec<Vec<String>>,
}

impl Sections {
    /// The raw lines collected for a canonical section name. Unknown names
    /// return an empty slice.
    pub fn lines(&self, canonical: &str) -> &[String] {
        self.names
            .iter()
            .position(|s| s.canonical == canonical)
            .map(|i| self.buffers[i].as_slice())
            .unwrap_or(&[])
    }
}

impl SectionScanner {
    pub fn new(specs: &'static [SectionSpec]) -> Self {
        Self {
            specs,
            fence_sink: None,
            fence_policy: FencePolicy::Concatenate,
        }
    }

    /// Section that receives fenced lines when no fenced section is current.
    ///
    /// The teaching-round grammar opens its fence under a header the scanner
    /// does not treat as the capturing section, so the fence itself drives
    /// the capture.
    pub fn with_fence_sink(mut self, canonical: &'static str) -> Self {
        self.fence_sink = Some(canonical);
        self
    }

    pub fn with_fence_policy(mut self, policy: FencePolicy) -> Self {
        self.fence_policy = policy;
        self
    }

    /// Run the state machine over the whole response.
    ///
    /// State is exactly `current` (which section, if any, is collecting) and
    /// `in_fence`. Header matching is suppressed while a fence is open.
    pub fn scan(&self, response: &str) -> Sections {
        let mut buffers: Vec<Vec<String>> = vec![Vec::new(); self.specs.len()];
        let mut fence_seen: Vec<bool> = vec![false; self.specs.len()];
        let mut current: Option<usize> = None;
        let mut in_fence = false;

        let sink = self
            .fence_sink
            .and_then(|name| self.specs.iter().position(|s| s.canonical == name));

        for line in response.lines() {
            let trimmed = line.trim();

            if trimmed.starts_with("```") {
                if in_fence {
                    if let Some(idx) = self.fence_target(current, sink) {
                        fence_seen[idx] = true;
                    }
                }
                in_fence = !in_fence;
                continue;
            }

            if in_fence {
                if let Some(idx) = self.fence_target(current, sink) {
                    if self.fence_policy == FencePolicy::FirstOnly && fence_seen[idx] {
                        continue;
                    }
                    buffers[idx].push(line.to_string());
                }
                continue;
            }

            if trimmed.starts_with("##") {
                current = self.match_header(trimmed);
                if current.is_none() {
                    tracing::debug!(header = trimmed, "unrecognized section header");
                }
                continue;
            }

            let Some(idx) = current else { continue };
            match self.specs[idx].kind {
                // Prose between a code header and its fence is not content.
                FieldKind::FencedCode => {}
                FieldKind::OrderedList | FieldKind::BulletedList | FieldKind::SpaceJoined => {
                    if !trimmed.is_empty() {
                        buffers[idx].push(line.to_string());
                    }
                }
                FieldKind::FreeText | FieldKind::FirstLine => {
                    buffers[idx].push(line.to_string());
                }
            }
        }

        Sections {
            names: self.specs,
            buffers,
        }
    }

    fn fence_target(&self, current: Option<usize>, sink: Option<usize>) -> Option<usize> {
        match current {
            Some(idx) if self.specs[idx].kind == FieldKind::FencedCode => Some(idx),
            _ => sink,
        }
    }

    fn match_header(&self, trimmed: &str) -> Option<usize> {
        self.specs
            .iter()
            .position(|spec| spec.labels.iter().any(|label| trimmed.contains(label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: &[SectionSpec] = &[
        SectionSpec {
            canonical: "questions",
            labels: &["Questions", "Question"],
            kind: FieldKind::OrderedList,
        },
        SectionSpec {
            canonical: "code",
            labels: &["Starter Code"],
            kind: FieldKind::FencedCode,
        },
        SectionSpec {
            canonical: "notes",
            labels: &["Notes"],
            kind: FieldKind::FreeText,
        },
    ];

    fn scan(response: &str) -> Sections {
        SectionScanner::new(SPECS).scan(response)
    }

    #[test]
    fn test_routes_lines_to_sections() {
        let got = scan("## Questions\n1. Why?\n2. How?\n\n## Notes\nfine\n");
        assert_eq!(got.lines("questions"), ["1. Why?", "2. How?"]);
        assert_eq!(got.lines("notes"), ["fine"]);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        for input in ["", "   \n\n", "no headers at all\njust prose", "####\n##\n"] {
            let got = scan(input);
            assert!(got.lines("questions").is_empty(), "input {input:?}");
            assert!(got.lines("code").is_empty());
        }
    }

    #[test]
    fn test_unrecognized_header_discards_following_content() {
        let got = scan("## Questions\n1. kept\n## Made Up Section\ndropped\n## Notes\nkept\n");
        assert_eq!(got.lines("questions"), ["1. kept"]);
        assert_eq!(got.lines("notes"), ["kept"]);
    }

    #[test]
    fn test_header_synonyms_route_to_same_section() {
        let a = scan("## Question\n1. one\n");
        let b = scan("## Questions\n1. one\n");
        assert_eq!(a.lines("questions"), b.lines("questions"));
    }

    #[test]
    fn test_fence_suppresses_header_matching() {
        let got = scan("## Starter Code\n```python\n## Fake Header\nx = 1\n```\n");
        assert_eq!(got.lines("code"), ["## Fake Header", "x = 1"]);
    }

    #[test]
    fn test_fence_preserves_indentation() {
        let got = scan("## Starter Code\n```\ndef f():\n    return 1\n```\n");
        assert_eq!(got.lines("code"), ["def f():", "    return 1"]);
    }

    #[test]
    fn test_unterminated_fence_captures_to_end() {
        let got = scan("## Starter Code\n```\nstill code\nmore code");
        assert_eq!(got.lines("code"), ["still code", "more code"]);
    }

    #[test]
    fn test_multiple_fences_concatenate_by_default() {
        let response = "## Starter Code\n```\none\n```\ntext between\n```\ntwo\n```\n";
        let got = scan(response);
        assert_eq!(got.lines("code"), ["one", "two"]);

        let first_only = SectionScanner::new(SPECS)
            .with_fence_policy(FencePolicy::FirstOnly)
            .scan(response);
        assert_eq!(first_only.lines("code"), ["one"]);
    }

    #[test]
    fn test_fence_sink_captures_without_matching_header() {
        let specs: &[SectionSpec] = &[SectionSpec {
            canonical: "code",
            labels: &[],
            kind: FieldKind::FencedCode,
        }];
        let got = SectionScanner::new(specs)
            .with_fence_sink("code")
            .scan("## Code\n```go\nfmt.Println(1)\n```\n");
        assert_eq!(got.lines("code"), ["fmt.Println(1)"]);
    }

    #[test]
    fn test_blank_lines_dropped_for_lists_kept_for_free_text() {
        let got = scan("## Questions\n\n1. Why?\n\n## Notes\npara one\n\npara two\n");
        assert_eq!(got.lines("questions"), ["1. Why?"]);
        assert_eq!(got.lines("notes"), ["para one", "", "para two"]);
    }

    #[test]
    fn test_content_before_first_header_is_discarded() {
        let got = scan("preamble chatter\n## Questions\n1. Why?\n");
        assert_eq!(got.lines("questions"), ["1. Why?"]);
    }
}
