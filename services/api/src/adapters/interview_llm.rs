//! services/api/src/adapters/interview_llm.rs
//!
//! This module contains the adapter for the interview LLM.
//! It implements the `InterviewGateway` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use interview_core::domain::{
    EvaluationRequest, EvaluationResult, InterviewType, SampleAnswerRequest, SessionConfig,
};
use interview_core::ports::{GatewayError, GatewayResult, InterviewGateway};
use serde::Deserialize;

use crate::adapters::prompts;

const INTERVIEWER_SYSTEM_MESSAGE: &str =
    "You are simulating a professional job interview. Follow the instructions in the user message exactly.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `InterviewGateway` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiInterviewAdapter {
    client: Client<OpenAIConfig>,
    interview_model: String,
    sample_model: String,
}

impl OpenAiInterviewAdapter {
    /// Creates a new `OpenAiInterviewAdapter`.
    pub fn new(client: Client<OpenAIConfig>, interview_model: String, sample_model: String) -> Self {
        Self {
            client,
            interview_model,
            sample_model,
        }
    }

    /// Sends a single prompt and returns the trimmed text of the first choice.
    async fn chat_text(
        &self,
        model: &str,
        prompt: String,
        json_response: bool,
    ) -> Result<String, String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(INTERVIEWER_SYSTEM_MESSAGE)
                .build()
                .map_err(|e| e.to_string())?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| e.to_string())?
                .into(),
        ];

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(model).messages(messages).n(1);
        if json_response {
            builder.response_format(ResponseFormat::JsonObject);
        }
        let request = builder.build().map_err(|e| e.to_string())?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| e.to_string())?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| "The LLM response contained no text content.".to_string())?;

        Ok(content.trim().to_string())
    }
}

//=========================================================================================
// Evaluation response parsing
//=========================================================================================

/// The exact wire shape of an evaluation verdict. Unknown or missing fields
/// are a parse failure by contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct EvaluationPayload {
    feedback: String,
    next_question: String,
    next_question_category: String,
    is_game_over: bool,
    final_feedback: String,
}

impl From<EvaluationPayload> for EvaluationResult {
    fn from(payload: EvaluationPayload) -> Self {
        EvaluationResult {
            feedback: payload.feedback,
            next_question: payload.next_question,
            next_question_category: payload.next_question_category,
            is_game_over: payload.is_game_over,
            final_feedback: payload.final_feedback,
        }
    }
}

/// Parses the evaluation JSON, tolerating a surrounding markdown code fence
/// but nothing else.
fn parse_evaluation(raw: &str) -> Result<EvaluationResult, String> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    let payload: EvaluationPayload = serde_json::from_str(body).map_err(|e| e.to_string())?;
    Ok(payload.into())
}

//=========================================================================================
// `InterviewGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl InterviewGateway for OpenAiInterviewAdapter {
    /// Generates the opening scenario for the configured interview type.
    async fn generate_scenario(&self, config: &SessionConfig) -> GatewayResult<String> {
        let prompt = prompts::scenario_prompt(config);
        self.chat_text(&self.interview_model, prompt, false)
            .await
            .map_err(GatewayError::Generation)
    }

    /// Generates the first question for a freshly generated scenario.
    async fn ask_first_question(
        &self,
        scenario: &str,
        interview_type: InterviewType,
    ) -> GatewayResult<String> {
        let prompt = prompts::first_question_prompt(interview_type, scenario);
        self.chat_text(&self.interview_model, prompt, false)
            .await
            .map_err(GatewayError::Generation)
    }

    /// Evaluates the candidate's latest answer. The response is requested as
    /// a JSON object and validated against the exact verdict shape.
    async fn evaluate_answer(
        &self,
        request: &EvaluationRequest,
    ) -> GatewayResult<EvaluationResult> {
        let prompt = prompts::evaluation_prompt(request);
        let raw = self
            .chat_text(&self.interview_model, prompt, true)
            .await
            .map_err(GatewayError::Evaluation)?;
        parse_evaluation(&raw).map_err(|e| {
            GatewayError::Evaluation(format!("The evaluation response was malformed: {e}"))
        })
    }

    /// Generates an exemplar answer for the current question.
    async fn generate_sample_answer(
        &self,
        request: &SampleAnswerRequest,
    ) -> GatewayResult<String> {
        let prompt = prompts::sample_answer_prompt(request);
        self.chat_text(&self.sample_model, prompt, false)
            .await
            .map_err(GatewayError::SampleAnswer)
    }
}
