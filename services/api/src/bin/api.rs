//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{OpenAiInterviewAdapter, OpenAiSttAdapter, OpenAiTtsAdapter},
    config::Config,
    error::ApiError,
    web::{state::AppState, ws_handler},
};
use async_openai::{
    config::OpenAIConfig,
    types::audio::{SpeechModel, Voice},
    Client,
};
use axum::{routing::get, Router};
use interview_core::ports::{InterviewGateway, SpeechToTextService, TextToSpeechService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);

    let gateway: Arc<dyn InterviewGateway> = Arc::new(OpenAiInterviewAdapter::new(
        openai_client.clone(),
        config.interview_model.clone(),
        config.sample_model.clone(),
    ));

    // The speech capabilities are optional; when disabled the client is told
    // so and the related intents are rejected with a clear message.
    let (stt_adapter, tts_adapter): (
        Option<Arc<dyn SpeechToTextService>>,
        Option<Arc<dyn TextToSpeechService>>,
    ) = if config.voice_enabled {
        let stt = Arc::new(OpenAiSttAdapter::new(
            openai_client.clone(),
            config.stt_model.clone(),
            config.stt_sample_rate,
        ));

        let tts_voice = match config.tts_voice.to_lowercase().as_str() {
            "alloy" => Voice::Alloy,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "shimmer" => Voice::Shimmer,
            _ => {
                return Err(ApiError::Internal(format!(
                    "Invalid TTS voice specified in config: '{}'",
                    config.tts_voice
                )))
            }
        };
        let tts = Arc::new(OpenAiTtsAdapter::new(
            openai_client.clone(),
            SpeechModel::Tts1Hd,
            tts_voice,
        ));
        (Some(stt as _), Some(tts as _))
    } else {
        (None, None)
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        gateway,
        stt_adapter,
        tts_adapter,
    });

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
