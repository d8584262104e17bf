//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the
//! API server for the interview simulator.

use chrono::{DateTime, Utc};
use interview_core::domain::{SessionConfig, UnknownVariant};
use interview_core::session::{InterviewSession, Phase};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================
// NOTE: Recorded answer audio is sent as raw Binary frames between
// `recording_started` and `recording_ended`, not as part of this enum.
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
/// Every intent is fire-and-forget; results are observed through snapshots.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Starts a new interview run with the chosen configuration.
    StartInterview {
        difficulty: String,
        domain: String,
        interview_type: String,
        #[serde(default)]
        company_name: Option<String>,
        #[serde(default)]
        job_description: Option<String>,
    },

    /// Submits the candidate's answer to the current question.
    SubmitAnswer { text: String },

    /// Asks for an exemplar answer to the current question (side-channel).
    RequestSampleAnswer,

    /// Re-issues the exact step that failed, with identical inputs.
    Retry,

    /// Discards all session data and returns to the welcome state.
    Restart,

    /// Signals that answer audio frames are about to arrive.
    RecordingStarted,

    /// Signals the end of answer audio; the buffer should be transcribed.
    RecordingEnded,

    /// Asks the server to read the current question aloud.
    ReadQuestion,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================
// NOTE: Question audio is sent as raw Binary frames, not as part of this enum.
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Advertises the optional speech capabilities once per connection, so
    /// the UI can hide the features when they are absent.
    Capabilities {
        speech_to_text: bool,
        text_to_speech: bool,
    },

    /// The scenario and first question are being generated. The UI should
    /// show a busy indicator and disable inputs.
    GenerationStarted,

    /// The submitted answer is being evaluated. The UI should disable the
    /// submit path until the next snapshot arrives.
    EvaluationStarted,

    /// The full session state after an intent completed.
    Snapshot { session: SessionSnapshot },

    /// A sample answer is being generated for `request_id`.
    SampleAnswerStarted { request_id: u64 },

    /// The sample answer for `request_id`. Stale requests are never
    /// delivered; the latest request wins.
    SampleAnswer { request_id: u64, text: String },

    /// The side-channel failed. Local to the sample-answer feature; the
    /// main session state is unaffected.
    SampleAnswerFailed { request_id: u64, message: String },

    /// The transcription of the recorded answer audio, for the UI to place
    /// in the answer input.
    AnswerTranscript { text: String },

    /// Reports an error to the client, which should display a message.
    Error { message: String },
}

//=========================================================================================
// Session snapshots
//=========================================================================================

/// One conversation turn as exposed to the client.
#[derive(Serialize, Debug, Clone)]
pub struct TurnSnapshot {
    pub question: String,
    pub category: Option<String>,
    pub answer: Option<String>,
    pub feedback: Option<String>,
}

/// The complete observable state of a session.
#[derive(Serialize, Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: &'static str,
    pub difficulty: &'static str,
    pub domain: &'static str,
    pub interview_type: &'static str,
    pub max_turns: u32,
    pub scenario: String,
    pub conversation: Vec<TurnSnapshot>,
    pub final_feedback: String,
    pub last_error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    pub fn of(session: &InterviewSession) -> Self {
        Self {
            session_id: session.id(),
            phase: phase_label(session.phase()),
            difficulty: session.config().difficulty.label(),
            domain: session.config().domain.label(),
            interview_type: session.config().interview_type.label(),
            max_turns: session.max_turns(),
            scenario: session.scenario().to_string(),
            conversation: session
                .conversation()
                .iter()
                .map(|turn| TurnSnapshot {
                    question: turn.question.clone(),
                    category: turn.category.clone(),
                    answer: turn.answer.clone(),
                    feedback: turn.feedback.clone(),
                })
                .collect(),
            final_feedback: session.final_feedback().to_string(),
            last_error: session.last_error().map(str::to_string),
            started_at: session.started_at(),
        }
    }
}

pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Welcome => "WELCOME",
        Phase::Generating => "GENERATING",
        Phase::Playing => "PLAYING",
        Phase::Evaluating => "EVALUATING",
        Phase::Finished => "FINISHED",
        Phase::Error => "ERROR",
    }
}

/// Parses the closed configuration enumerations out of a start intent.
pub fn parse_session_config(
    difficulty: &str,
    domain: &str,
    interview_type: &str,
    company_name: Option<String>,
    job_description: Option<String>,
) -> Result<SessionConfig, UnknownVariant> {
    Ok(SessionConfig {
        difficulty: difficulty.parse()?,
        domain: domain.parse()?,
        interview_type: interview_type.parse()?,
        company_name: company_name.filter(|s| !s.trim().is_empty()),
        job_description: job_description.filter(|s| !s.trim().is_empty()),
    })
}
