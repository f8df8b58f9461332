//! Proof review orchestration
//!
//! Same two-phase flow as [`crate::analyzer`], specialized for proofs: the
//! opening response carries a `## Main Claim` section, and the feedback
//! prompt asks for a rigor assessment.

use crate::contract::AnalysisContract;
use crate::conversation::ConversationHistory;
use crate::llm::{LlmClient, LlmError};
use crate::parse::{parse_feedback, parse_initial_analysis, ParsedAnalysis, ParsedFeedback};
use crate::proof_file::ProofFile;
use crate::prompt;

pub struct ProofAnalyzer<C> {
    client: C,
    history: ConversationHistory,
    contract: AnalysisContract,
}

impl<C: LlmClient> ProofAnalyzer<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            history: ConversationHistory::new(),
            contract: AnalysisContract::default(),
        }
    }

    pub fn analyze(
        &mut self,
        file: &ProofFile,
        experience_level: &str,
        domain: Option<&str>,
    ) -> Result<ParsedAnalysis, LlmError> {
        let prompt = prompt::proof_initial_analysis(file, experience_level, domain);
        let response = self.client.generate(&prompt, &self.history)?;
        self.history.record_exchange(prompt, response.clone());

        let parsed = parse_initial_analysis(&response);
        for violation in self.contract.validate(&parsed) {
            tracing::warn!(%violation, "proof analysis response out of bounds");
        }
        Ok(parsed)
    }

    pub fn process_answers(
        &mut self,
        answers: &[String],
        experience_level: &str,
    ) -> Result<ParsedFeedback, LlmError> {
        let prompt = prompt::proof_feedback(answers, experience_level);
        let response = self.client.generate(&prompt, &self.history)?;
        self.history.record_exchange(prompt, response.clone());
        Ok(parse_feedback(&response))
    }

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
    use crate::proof_file::{ProofFile, ProofMetadata, ProofStructure};
    use std::path::PathBuf;

    fn sample_proof() -> ProofFile {
        ProofFile {
            path: PathBuf::from("/tmp/parity.md"),
            name: "parity.md".to_string(),
            content: "Theorem: n even implies n^2 even.\nProof. n = 2k ...".to_string(),
            metadata: ProofMetadata {
                format: "Markdown".to_string(),
                extension: ".md".to_string(),
                size_bytes: 50,
                line_count: 2,
                non_empty_lines: 2,
                is_formal: false,
                detected_domain: Some("number theory".to_string()),
            },
            structure: ProofStructure {
                has_theorem_statement: true,
                has_proof_body: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_analysis_extracts_main_claim() {
        let client = FakeLlmClient::always(
            "## Main Claim\nThe square of an even integer is even.\n\n\
             ## Questions\n1. Why introduce k before using it?\n\n\
             ## Initial Observations\n- Direct proof\n",
        );
        let mut analyzer = ProofAnalyzer::new(client);

        let parsed = analyzer.analyze(&sample_proof(), "undergrad", None).unwrap();
        assert_eq!(
            parsed.main_claim.as_deref(),
            Some("The square of an even integer is even.")
        );
        assert_eq!(parsed.questions.len(), 1);
    }

    #[test]
    fn test_feedback_phase_records_history() {
        let client = FakeLlmClient::new(vec![
            Ok("## Main Claim\nC\n## Questions\n1. Why this approach exactly?\n## Initial Observations\n- ok\n".to_string()),
            Ok("The parity argument is sound.".to_string()),
        ]);
        let mut analyzer = ProofAnalyzer::new(client);

        analyzer.analyze(&sample_proof(), "graduate", Some("number theory")).unwrap();
        let feedback = analyzer
            .process_answers(&["Induction felt heavier than needed".to_string()], "graduate")
            .unwrap();
        assert_eq!(feedback.feedback, "The parity argument is sound.");
        assert_eq!(analyzer.history().len(), 4);
    }
}
