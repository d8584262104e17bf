//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! Each connection owns one interview session; all intents arrive as text
//! frames and results are observed through session snapshots.

use crate::web::{
    protocol::{ClientMessage, ServerMessage, SessionSnapshot},
    sample_task::sample_answer_process,
    state::{AppState, ConnectionState},
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

type WsSender = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New WebSocket connection established.");

    // The sender is wrapped in an Arc<Mutex<>> so detached sample-answer
    // tasks can deliver results alongside the main loop.
    let (sender, mut receiver) = socket.split();
    let ws_sender: WsSender = Arc::new(Mutex::new(sender));

    let connection = Arc::new(Mutex::new(ConnectionState::new(app_state.gateway.clone())));

    let capabilities = ServerMessage::Capabilities {
        speech_to_text: app_state.stt_adapter.is_some(),
        text_to_speech: app_state.tts_adapter.is_some(),
    };
    if !send_message(&ws_sender, &capabilities).await {
        return;
    }
    {
        let conn = connection.lock().await;
        if !send_snapshot(&ws_sender, &conn).await {
            return;
        }
    }

    loop {
        if let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    handle_text_message(
                        text.to_string(),
                        &app_state,
                        &connection,
                        &ws_sender,
                    )
                    .await;
                }
                Message::Binary(data) => {
                    let mut conn = connection.lock().await;
                    if conn.recording {
                        conn.audio_buffer.extend_from_slice(&data);
                    }
                }
                Message::Close(_) => {
                    info!("Client sent close message.");
                    break;
                }
                _ => {}
            }
        } else {
            info!("Client disconnected.");
            break;
        }
    }

    info!("WebSocket connection closed.");
}

/// Helper function to handle the logic for different `ClientMessage` variants.
async fn handle_text_message(
    text: String,
    app_state: &Arc<AppState>,
    connection: &Arc<Mutex<ConnectionState>>,
    ws_sender: &WsSender,
) {
    let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
            return;
        }
    };

    match client_msg {
        ClientMessage::StartInterview {
            difficulty,
            domain,
            interview_type,
            company_name,
            job_description,
        } => {
            let config = match crate::web::protocol::parse_session_config(
                &difficulty,
                &domain,
                &interview_type,
                company_name,
                job_description,
            ) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Rejected start intent: {e}");
                    send_message(
                        ws_sender,
                        &ServerMessage::Error {
                            message: e.to_string(),
                        },
                    )
                    .await;
                    return;
                }
            };

            let mut conn = connection.lock().await;
            conn.invalidate_sample_requests();
            send_message(ws_sender, &ServerMessage::GenerationStarted).await;
            if let Err(rejected) = conn.orchestrator.start_interview(config).await {
                warn!("Start intent ignored: {rejected}");
            }
            send_snapshot(ws_sender, &conn).await;
        }

        ClientMessage::SubmitAnswer { text } => {
            let mut conn = connection.lock().await;
            send_message(ws_sender, &ServerMessage::EvaluationStarted).await;
            if let Err(rejected) = conn.orchestrator.submit_answer(&text).await {
                warn!("Submit intent ignored: {rejected}");
            }
            send_snapshot(ws_sender, &conn).await;
        }

        ClientMessage::RequestSampleAnswer => {
            let conn = connection.lock().await;
            let Some(request) = conn.orchestrator.sample_request() else {
                warn!("Sample answer requested with no question on the table.");
                send_message(
                    ws_sender,
                    &ServerMessage::Error {
                        message: "No question is currently available.".to_string(),
                    },
                )
                .await;
                return;
            };

            let request_id = conn.next_sample_request();
            send_message(ws_sender, &ServerMessage::SampleAnswerStarted { request_id }).await;

            let gateway = conn.orchestrator.gateway();
            let epoch = conn.sample_epoch();
            let ws_sender = ws_sender.clone();
            tokio::spawn(async move {
                sample_answer_process(gateway, request, request_id, epoch, ws_sender).await;
            });
        }

        ClientMessage::Retry => {
            let mut conn = connection.lock().await;
            // The busy indicator depends on which step is being re-issued.
            let busy = if conn.orchestrator.session().conversation().is_empty() {
                ServerMessage::GenerationStarted
            } else {
                ServerMessage::EvaluationStarted
            };
            send_message(ws_sender, &busy).await;
            if let Err(rejected) = conn.orchestrator.retry().await {
                warn!("Retry intent ignored: {rejected}");
            }
            send_snapshot(ws_sender, &conn).await;
        }

        ClientMessage::Restart => {
            let mut conn = connection.lock().await;
            conn.invalidate_sample_requests();
            conn.recording = false;
            conn.audio_buffer.clear();
            conn.orchestrator.restart();
            send_snapshot(ws_sender, &conn).await;
        }

        ClientMessage::RecordingStarted => {
            let Some(_stt) = app_state.stt_adapter.as_ref() else {
                send_message(
                    ws_sender,
                    &ServerMessage::Error {
                        message: "Speech-to-text is not available.".to_string(),
                    },
                )
                .await;
                return;
            };
            let mut conn = connection.lock().await;
            conn.recording = true;
            conn.audio_buffer.clear();
        }

        ClientMessage::RecordingEnded => {
            let audio = {
                let mut conn = connection.lock().await;
                conn.recording = false;
                std::mem::take(&mut conn.audio_buffer)
            };
            let Some(stt) = app_state.stt_adapter.as_ref() else {
                return;
            };
            if audio.is_empty() {
                warn!("Recording ended with no audio buffered.");
                return;
            }
            match stt.transcribe_audio(&audio).await {
                Ok(text) => {
                    send_message(ws_sender, &ServerMessage::AnswerTranscript { text }).await;
                }
                Err(e) => {
                    error!("Transcription failed: {e}");
                    send_message(
                        ws_sender,
                        &ServerMessage::Error {
                            message: "Could not transcribe the recording.".to_string(),
                        },
                    )
                    .await;
                }
            }
        }

        ClientMessage::ReadQuestion => {
            let Some(tts) = app_state.tts_adapter.as_ref() else {
                send_message(
                    ws_sender,
                    &ServerMessage::Error {
                        message: "Text-to-speech is not available.".to_string(),
                    },
                )
                .await;
                return;
            };
            let question = {
                let conn = connection.lock().await;
                conn.orchestrator
                    .session()
                    .conversation()
                    .last()
                    .map(|turn| turn.question.clone())
            };
            let Some(question) = question else {
                warn!("Read intent received with no question on the table.");
                return;
            };
            match tts.generate_audio(&question).await {
                Ok(audio) => {
                    if ws_sender
                        .lock()
                        .await
                        .send(Message::Binary(audio.into()))
                        .await
                        .is_err()
                    {
                        error!("Failed to send question audio.");
                    }
                }
                Err(e) => {
                    error!("Failed to generate question audio: {e}");
                    send_message(
                        ws_sender,
                        &ServerMessage::Error {
                            message: "Could not read the question aloud.".to_string(),
                        },
                    )
                    .await;
                }
            }
        }
    }
}

/// Serializes and sends a message, returning false when the socket is gone.
async fn send_message(ws_sender: &WsSender, msg: &ServerMessage) -> bool {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize server message: {e}");
            return false;
        }
    };
    ws_sender
        .lock()
        .await
        .send(Message::Text(json.into()))
        .await
        .is_ok()
}

async fn send_snapshot(ws_sender: &WsSender, conn: &ConnectionState) -> bool {
    let snapshot = SessionSnapshot::of(conn.orchestrator.session());
    send_message(ws_sender, &ServerMessage::Snapshot { session: snapshot }).await
}
