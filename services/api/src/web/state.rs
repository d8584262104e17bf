//! services/api/src/web/state.rs
//!
//! Defines the application's shared and per-connection states.

use crate::config::Config;
use interview_core::orchestrator::Orchestrator;
use interview_core::ports::{InterviewGateway, SpeechToTextService, TextToSpeechService};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all
/// handlers. The speech adapters are optional capabilities: when absent the
/// related features are simply not advertised to the client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<dyn InterviewGateway>,
    pub stt_adapter: Option<Arc<dyn SpeechToTextService>>,
    pub tts_adapter: Option<Arc<dyn TextToSpeechService>>,
}

//=========================================================================================
// ConnectionState (Specific to One WebSocket Connection)
//=========================================================================================

/// The state for a single, active WebSocket connection. All session mutation
/// happens through the orchestrator on the connection task, so no locking
/// beyond the connection mutex is needed.
pub struct ConnectionState {
    pub orchestrator: Orchestrator,
    /// Whether binary frames are currently buffered as answer audio.
    pub recording: bool,
    pub audio_buffer: Vec<u8>,
    /// Request-generation token for the sample-answer side-channel. A task
    /// only delivers its result while its id is still the current one, so a
    /// newer request or a session reset silently retires it.
    sample_epoch: Arc<AtomicU64>,
}

impl ConnectionState {
    pub fn new(gateway: Arc<dyn InterviewGateway>) -> Self {
        Self {
            orchestrator: Orchestrator::new(gateway),
            recording: false,
            audio_buffer: Vec::new(),
            sample_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Claims a fresh sample-request id, superseding any in-flight request.
    pub fn next_sample_request(&self) -> u64 {
        self.sample_epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Retires all outstanding sample requests (on restart or a new start).
    pub fn invalidate_sample_requests(&self) {
        self.sample_epoch.fetch_add(1, Ordering::SeqCst);
    }

    pub fn sample_epoch(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.sample_epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use interview_core::domain::{
        EvaluationRequest, EvaluationResult, InterviewType, SampleAnswerRequest, SessionConfig,
    };
    use interview_core::ports::{GatewayError, GatewayResult};

    struct NullGateway;

    #[async_trait]
    impl interview_core::ports::InterviewGateway for NullGateway {
        async fn generate_scenario(&self, _config: &SessionConfig) -> GatewayResult<String> {
            Err(GatewayError::Generation("unavailable".into()))
        }
        async fn ask_first_question(
            &self,
            _scenario: &str,
            _interview_type: InterviewType,
        ) -> GatewayResult<String> {
            Err(GatewayError::Generation("unavailable".into()))
        }
        async fn evaluate_answer(
            &self,
            _request: &EvaluationRequest,
        ) -> GatewayResult<EvaluationResult> {
            Err(GatewayError::Evaluation("unavailable".into()))
        }
        async fn generate_sample_answer(
            &self,
            _request: &SampleAnswerRequest,
        ) -> GatewayResult<String> {
            Err(GatewayError::SampleAnswer("unavailable".into()))
        }
    }

    #[test]
    fn newer_sample_requests_supersede_older_ones() {
        let state = ConnectionState::new(Arc::new(NullGateway));
        let first = state.next_sample_request();
        let second = state.next_sample_request();
        assert!(second > first);
        let epoch = state.sample_epoch();
        // Only the latest request is still current.
        assert_ne!(epoch.load(Ordering::SeqCst), first);
        assert_eq!(epoch.load(Ordering::SeqCst), second);
    }

    #[test]
    fn invalidation_retires_the_current_request() {
        let state = ConnectionState::new(Arc::new(NullGateway));
        let id = state.next_sample_request();
        state.invalidate_sample_requests();
        assert_ne!(state.sample_epoch().load(Ordering::SeqCst), id);
    }
}
