//! services/api/src/adapters/stt.rs
//!
//! This module contains the adapter for OpenAI's Speech-to-Text (Whisper)
//! service. It implements the optional `SpeechToTextService` capability port
//! from the `core` crate, used for dictating answers.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::audio::{AudioInput, CreateTranscriptionRequest},
    Client,
};
use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use interview_core::ports::{PortError, PortResult, SpeechToTextService};

/// An adapter that implements the `SpeechToTextService` port using the
/// OpenAI Whisper API. Incoming audio is raw mono PCM16 from the browser.
#[derive(Clone)]
pub struct OpenAiSttAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    sample_rate: u32,
}

impl OpenAiSttAdapter {
    pub fn new(client: Client<OpenAIConfig>, model: String, sample_rate: u32) -> Self {
        Self {
            client,
            model,
            sample_rate,
        }
    }

    /// Wraps raw PCM16 samples in a WAV container, which is what the
    /// transcription endpoint expects.
    fn pcm16_to_wav(&self, pcm_data: &[u8]) -> Result<Vec<u8>, hound::Error> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for chunk in pcm_data.chunks_exact(2) {
            let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl SpeechToTextService for OpenAiSttAdapter {
    /// Transcribes a buffer of recorded answer audio into text.
    async fn transcribe_audio(&self, audio_data: &[u8]) -> PortResult<String> {
        let wav_data = self
            .pcm16_to_wav(audio_data)
            .map_err(|e| PortError::Unexpected(format!("Failed to encode WAV: {e}")))?;

        let request = CreateTranscriptionRequest {
            file: AudioInput::from_vec_u8("answer_audio.wav".into(), wav_data),
            model: self.model.clone(),
            ..Default::default()
        };

        let response = self
            .client
            .audio()
            .transcription()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        Ok(response.text)
    }
}
