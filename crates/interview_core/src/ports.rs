//! crates/interview_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like LLM providers.

use async_trait::async_trait;

use crate::domain::{
    EvaluationRequest, EvaluationResult, InterviewType, SampleAnswerRequest, SessionConfig,
};

//=========================================================================================
// Gateway Error and Result Types
//=========================================================================================

/// The error taxonomy for the LLM gateway. Each variant is scoped to one
/// phase of the session so the orchestrator can decide whether a failure
/// hits the main state machine or stays local to a side-channel.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Scenario or first-question generation failed.
    #[error("Failed to generate the interview opening: {0}")]
    Generation(String),
    /// The evaluation call failed, or the upstream response did not match
    /// the required schema.
    #[error("Failed to evaluate the answer: {0}")]
    Evaluation(String),
    /// The sample-answer side-channel failed. Never escalated to the main
    /// session error state.
    #[error("Failed to generate a sample answer: {0}")]
    SampleAnswer(String),
}

/// A convenience type alias for `Result<T, GatewayError>`.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// A generic error type for optional capability ports (speech in/out).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The external LLM-backed generation service. All operations are
/// asynchronous, network-bound, and may fail; the orchestrator serializes
/// main-flow calls so at most one is in flight per session.
#[async_trait]
pub trait InterviewGateway: Send + Sync {
    /// Produces the opening scenario text for the configured interview
    /// type, difficulty tier, and domain.
    async fn generate_scenario(&self, config: &SessionConfig) -> GatewayResult<String>;

    /// Produces the first question for a freshly generated scenario.
    async fn ask_first_question(
        &self,
        scenario: &str,
        interview_type: InterviewType,
    ) -> GatewayResult<String>;

    /// Evaluates the candidate's latest answer and decides the next step.
    /// The result must conform to the `EvaluationResult` shape; adapters
    /// report malformed upstream data as `GatewayError::Evaluation`.
    async fn evaluate_answer(
        &self,
        request: &EvaluationRequest,
    ) -> GatewayResult<EvaluationResult>;

    /// Produces an exemplar answer for the current question. Independent
    /// of session state beyond the inputs given.
    async fn generate_sample_answer(
        &self,
        request: &SampleAnswerRequest,
    ) -> GatewayResult<String>;
}

/// Optional capability: transcribes a slice of audio data into text.
/// Core logic never requires this; absence degrades to text-only input.
#[async_trait]
pub trait SpeechToTextService: Send + Sync {
    async fn transcribe_audio(&self, audio_data: &[u8]) -> PortResult<String>;
}

/// Optional capability: generates audio data from a string of text.
#[async_trait]
pub trait TextToSpeechService: Send + Sync {
    async fn generate_audio(&self, text: &str) -> PortResult<Vec<u8>>;
}
