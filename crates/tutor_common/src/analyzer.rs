//! Code review orchestration
//!
//! Ties the prompt builders, the LLM client and the response parsers into
//! the two-phase review flow: the model first asks clarifying questions,
//! then turns the user's answers into feedback. Follow-up questions reuse
//! the accumulated conversation so the model keeps the code in context.

use crate::config::Preferences;
use crate::contract::AnalysisContract;
use crate::conversation::ConversationHistory;
use crate::llm::{LlmClient, LlmError};
use crate::parse::{parse_feedback, parse_initial_analysis, ParsedAnalysis, ParsedFeedback};
use crate::prompt;
use crate::source_file::SourceFile;

pub struct CodeAnalyzer<C> {
    client: C,
    history: ConversationHistory,
    contract: AnalysisContract,
}

impl<C: LlmClient> CodeAnalyzer<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            history: ConversationHistory::new(),
            contract: AnalysisContract::default(),
        }
    }

    /// First phase: send the code, parse questions and observations.
    /// Contract violations are logged, never fatal.
    pub fn analyze(
        &mut self,
        file: &SourceFile,
        experience_level: &str,
        preferences: &Preferences,
    ) -> Result<ParsedAnalysis, LlmError> {
        let prompt = prompt::initial_analysis(file, experience_level, preferences);
        let response = self.client.generate(&prompt, &self.history)?;
        self.history.record_exchange(prompt, response.clone());

        let parsed = parse_initial_analysis(&response);
        for violation in self.contract.validate(&parsed) {
            tracing::warn!(%violation, "analysis response out of bounds");
        }
        Ok(parsed)
    }

    /// Second phase: turn the user's answers into feedback.
    pub fn process_answers(
        &mut self,
        answers: &[String],
        experience_level: &str,
        preferences: &Preferences,
    ) -> Result<ParsedFeedback, LlmError> {
        let prompt = prompt::feedback(answers, experience_level, preferences);
        let response = self.client.generate(&prompt, &self.history)?;
        self.history.record_exchange(prompt, response.clone());
        Ok(parse_feedback(&response))
    }

    /// Free-form follow-up within the same review.
    pub fn continue_conversation(&mut self, user_message: &str) -> Result<String, LlmError> {
        let response = self.client.generate(user_message, &self.history)?;
        self.history.record_exchange(user_message, response.clone());
        Ok(response)
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeLlmClient;
    use crate::source_file::{SourceFile, SourceMetadata};
    use std::path::PathBuf;

    fn sample_file() -> SourceFile {
        SourceFile {
            path: PathBuf::from("/tmp/sample.py"),
            name: "sample.py".to_string(),
            content: "def f():\n    return 1\n".to_string(),
            metadata: SourceMetadata {
                language: "Python".to_string(),
                extension: ".py".to_string(),
                size_bytes: 22,
                line_count: 3,
                non_empty_lines: 2,
            },
        }
    }

    #[test]
    fn test_two_phase_review_flow() {
        let client = FakeLlmClient::new(vec![
            Ok("## Questions\n1. Why return a constant value here?\n\n## Initial Observations\n- Single function\n".to_string()),
            Ok("Solid reasoning. Consider a docstring.".to_string()),
        ]);
        let mut analyzer = CodeAnalyzer::new(client);

        let analysis = analyzer
            .analyze(&sample_file(), "intermediate", &Preferences::default())
            .unwrap();
        assert_eq!(analysis.questions, ["Why return a constant value here?"]);
        assert_eq!(analysis.observations, ["Single function"]);
        assert_eq!(analyzer.history().len(), 2);

        let feedback = analyzer
            .process_answers(
                &["It is a placeholder".to_string()],
                "intermediate",
                &Preferences::default(),
            )
            .unwrap();
        assert_eq!(feedback.feedback, "Solid reasoning. Consider a docstring.");
        assert_eq!(analyzer.history().len(), 4);
    }

    #[test]
    fn test_client_error_propagates_without_history_entry() {
        let client = FakeLlmClient::always_error(LlmError::Timeout(30));
        let mut analyzer = CodeAnalyzer::new(client);

        let result = analyzer.analyze(&sample_file(), "beginner", &Preferences::default());
        assert!(matches!(result, Err(LlmError::Timeout(30))));
        assert!(analyzer.history().is_empty());
    }

    #[test]
    fn test_reset_clears_history() {
        let client = FakeLlmClient::always("follow-up reply");
        let mut analyzer = CodeAnalyzer::new(client);
        analyzer.continue_conversation("what about naming?").unwrap();
        assert_eq!(analyzer.history().len(), 2);
        analyzer.reset();
        assert!(analyzer.history().is_empty());
    }
}
