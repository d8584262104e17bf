//! services/api/src/adapters/tts.rs
//!
//! This module contains the adapter for OpenAI's Text-to-Speech (TTS)
//! service. It implements the optional `TextToSpeechService` capability port
//! from the `core` crate, used for reading interview questions aloud.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::audio::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use interview_core::ports::{PortError, PortResult, TextToSpeechService};

/// An adapter that implements the `TextToSpeechService` port using the
/// OpenAI TTS API.
#[derive(Clone)]
pub struct OpenAiTtsAdapter {
    client: Client<OpenAIConfig>,
    model: SpeechModel,
    voice: Voice,
}

impl OpenAiTtsAdapter {
    pub fn new(client: Client<OpenAIConfig>, model: SpeechModel, voice: Voice) -> Self {
        Self {
            client,
            model,
            voice,
        }
    }
}

#[async_trait]
impl TextToSpeechService for OpenAiTtsAdapter {
    /// Generates a vector of audio data (`Vec<u8>`) from the given text.
    async fn generate_audio(&self, text: &str) -> PortResult<Vec<u8>> {
        let request = CreateSpeechRequest {
            model: self.model.clone(),
            input: text.to_string(),
            voice: self.voice.clone(),
            ..Default::default()
        };

        let response = self
            .client
            .audio()
            .speech()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        Ok(response.bytes.to_vec())
    }
}
