//! Teaching-mode orchestration
//!
//! In teaching mode the roles flip: the model plays a stuck student and
//! the user teaches. Each round the model produces flawed material (code
//! or a proof) with a hidden issue list, the user offers hints or analysis,
//! and the model judges whether understanding was reached. Difficulty ramps
//! with the round number; sessions cap at [`MAX_ROUNDS`].

use crate::contract::{EvaluationContract, TeachingContract};
use crate::conversation::ConversationHistory;
use crate::llm::{LlmClient, LlmError};
use crate::parse::{
    parse_code_round, parse_evaluation, parse_proof_round, ParsedCodeRound, ParsedEvaluation,
    ParsedProofRound,
};
use crate::prompt;

pub const MAX_ROUNDS: u32 = 5;

/// Flawed-code teaching session state.
pub struct CodeTeacher<C> {
    client: C,
    history: ConversationHistory,
    topic: String,
    language: String,
    round_number: u32,
    contract: TeachingContract,
    evaluation_contract: EvaluationContract,
}

impl<C: LlmClient> CodeTeacher<C> {
    pub fn new(client: C, topic: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            client,
            history: ConversationHistory::new(),
            topic: topic.into(),
            language: language.into(),
            round_number: 0,
            contract: TeachingContract::default(),
            evaluation_contract: EvaluationContract::default(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn rounds_remaining(&self) -> bool {
        self.round_number < MAX_ROUNDS
    }

    /// Start the next round: flawed code plus the student's question.
    pub fn next_round(&mut self, experience_level: &str) -> Result<ParsedCodeRound, LlmError> {
        self.round_number += 1;
        let prompt = prompt::flawed_code(
            &self.topic,
            &self.language,
            experience_level,
            self.round_number,
        );
        let response = self.client.generate(&prompt, &self.history)?;
        self.history.record_exchange(prompt, response.clone());

        let parsed = parse_code_round(&response);
        for violation in self.contract.validate_code_round(&parsed) {
            tracing::warn!(round = self.round_number, %violation, "code round out of bounds");
        }
        Ok(parsed)
    }

    /// Judge the user's hints for the current round.
    pub fn evaluate(
        &mut self,
        round: &ParsedCodeRound,
        user_explanation: &str,
        experience_level: &str,
    ) -> Result<ParsedEvaluation, LlmError> {
        let prompt = prompt::evaluate_hints(
            &self.topic,
            &round.code,
            &round.issues,
            user_explanation,
            experience_level,
            &self.language,
        );
        let response = self.client.generate(&prompt, &self.history)?;
        self.history.record_exchange(prompt, response.clone());

        let parsed = parse_evaluation(&response);
        for violation in self.evaluation_contract.validate(&parsed) {
            tracing::warn!(round = self.round_number, %violation, "evaluation out of bounds");
        }
        Ok(parsed)
    }
}

/// Flawed-proof teaching session state.
pub struct ProofTeacher<C> {
    client: C,
    history: ConversationHistory,
    topic: String,
    domain: String,
    round_number: u32,
    contract: TeachingContract,
    evaluation_contract: EvaluationContract,
}

impl<C: LlmClient> ProofTeacher<C> {
    pub fn new(client: C, topic: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            client,
            history: ConversationHistory::new(),
            topic: topic.into(),
            domain: domain.into(),
            round_number: 0,
            contract: TeachingContract::default(),
            evaluation_contract: EvaluationContract::default(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn rounds_remaining(&self) -> bool {
        self.round_number < MAX_ROUNDS
    }

    pub fn next_round(&mut self, experience_level: &str) -> Result<ParsedProofRound, LlmError> {
        self.round_number += 1;
        let prompt = prompt::flawed_proof(
            &self.topic,
            &self.domain,
            experience_level,
            self.round_number,
        );
        let response = self.client.generate(&prompt, &self.history)?;
        self.history.record_exchange(prompt, response.clone());

        let parsed = parse_proof_round(&response);
        for violation in self.contract.validate_proof_round(&parsed) {
            tracing::warn!(round = self.round_number, %violation, "proof round out of bounds");
        }
        Ok(parsed)
    }

    pub fn evaluate(
        &mut self,
        round: &ParsedProofRound,
        user_analysis: &str,
        experience_level: &str,
    ) -> Result<ParsedEvaluation, LlmError> {
        let prompt = prompt::evaluate_proof_analysis(
            &round.proof,
            &round.issues,
            user_analysis,
            experience_level,
        );
        let response = self.client.generate(&prompt, &self.history)?;
        self.history.record_exchange(prompt, response.clone());

        let parsed = parse_evaluation(&response);
        for violation in self.evaluation_contract.validate(&parsed) {
            tracing::warn!(round = self.round_number, %violation, "evaluation out of bounds");
        }
        Ok(parsed)
    }
}
