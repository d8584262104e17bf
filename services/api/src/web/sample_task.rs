//! services/api/src/web/sample_task.rs
//!
//! This module contains the asynchronous "worker" function for the
//! sample-answer side-channel. It runs detached from the main connection
//! loop so a slow exemplar never blocks the interview itself.

use crate::web::protocol::ServerMessage;
use axum::extract::ws::{Message, WebSocket};
use futures::{stream::SplitSink, SinkExt};
use interview_core::domain::SampleAnswerRequest;
use interview_core::ports::InterviewGateway;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Generates a sample answer and delivers it to the client, unless the
/// request has been superseded in the meantime.
///
/// The `request_id` was claimed from the connection's epoch counter when the
/// request arrived. If the counter has moved on by the time the gateway
/// responds, the result belongs to a question the candidate is no longer
/// looking at and is dropped without a message.
pub async fn sample_answer_process(
    gateway: Arc<dyn InterviewGateway>,
    request: SampleAnswerRequest,
    request_id: u64,
    epoch: Arc<AtomicU64>,
    ws_sender: Arc<Mutex<SplitSink<WebSocket, Message>>>,
) {
    let outcome = gateway.generate_sample_answer(&request).await;

    if epoch.load(Ordering::SeqCst) != request_id {
        info!(request_id, "Sample answer superseded; dropping result.");
        return;
    }

    let msg = match outcome {
        Ok(text) => ServerMessage::SampleAnswer { request_id, text },
        Err(e) => {
            warn!(request_id, "Sample answer generation failed: {e}");
            ServerMessage::SampleAnswerFailed {
                request_id,
                message: e.to_string(),
            }
        }
    };

    let json = match serde_json::to_string(&msg) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize sample answer message: {e}");
            return;
        }
    };
    if ws_sender
        .lock()
        .await
        .send(Message::Text(json.into()))
        .await
        .is_err()
    {
        warn!(request_id, "Failed to deliver sample answer to client.");
    }
}
