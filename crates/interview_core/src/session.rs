//! crates/interview_core/src/session.rs
//!
//! The session state machine: Welcome -> Generating -> Playing <-> Evaluating
//! -> Finished, with Error reachable from either async phase and recoverable
//! via retry.
//!
//! The machine is deliberately split into synchronous `begin_*` / `complete_*`
//! halves. `begin_*` validates the intent and performs the transition into the
//! busy phase, handing back the gateway work to perform; `complete_*` applies
//! the gateway outcome. The async plumbing lives in the orchestrator, which
//! keeps every transition here exhaustively testable without a runtime.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    ConversationTurn, EvaluationRequest, EvaluationResult, SampleAnswerRequest, SessionConfig,
};
use crate::ports::GatewayResult;

/// Closing feedback used when the gateway signals game over without
/// providing any.
pub const DEFAULT_CLOSING_FEEDBACK: &str = "Great job! The interview is now complete.";

/// Per-turn feedback synthesized when evaluation fails at the final turn.
const FALLBACK_TURN_FEEDBACK: &str =
    "There was an issue processing your response, but since we've reached the end, let's wrap up.";

/// Final feedback synthesized when evaluation fails at the final turn.
const FALLBACK_FINAL_FEEDBACK: &str =
    "A technical error prevented a full evaluation. Thank you for completing the simulation.";

/// The lifecycle phase of a session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Welcome,
    Generating,
    Playing,
    Evaluating,
    Finished,
    Error,
}

/// The result of the two sequential opening calls (scenario, then first
/// question).
#[derive(Debug, Clone)]
pub struct OpeningExchange {
    pub scenario: String,
    pub first_question: String,
}

/// Why an intent was ignored. Rejections are no-ops: the session is left
/// exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntentRejected {
    #[error("The session does not accept this intent in its current phase")]
    WrongPhase,
    #[error("An answer cannot be empty")]
    EmptyAnswer,
    #[error("There is no failed step to retry")]
    NothingToRetry,
}

/// The work a retry intent resolves to: re-run the opening generation, or
/// re-evaluate the stored answer with identical inputs.
#[derive(Debug, Clone)]
pub enum RetryStep {
    Regenerate,
    Reevaluate(EvaluationRequest),
}

/// One interview run, from start to restart. Owns the conversation
/// sequence; nothing mutates turns except through the intents below.
#[derive(Debug)]
pub struct InterviewSession {
    id: Uuid,
    phase: Phase,
    config: SessionConfig,
    scenario: String,
    conversation: Vec<ConversationTurn>,
    final_feedback: String,
    last_error: Option<String>,
    started_at: Option<DateTime<Utc>>,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Welcome,
            config: SessionConfig::default(),
            scenario: String::new(),
            conversation: Vec::new(),
            final_feedback: String::new(),
            last_error: None,
            started_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn conversation(&self) -> &[ConversationTurn] {
        &self.conversation
    }

    pub fn final_feedback(&self) -> &str {
        &self.final_feedback
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn max_turns(&self) -> u32 {
        self.config.difficulty.max_turns()
    }

    //=====================================================================================
    // Intents
    //=====================================================================================

    /// Start intent: Welcome -> Generating. Clears any prior conversation,
    /// scenario, and final feedback before the opening calls run.
    pub fn begin_start(&mut self, config: SessionConfig) -> Result<(), IntentRejected> {
        if self.phase != Phase::Welcome {
            return Err(IntentRejected::WrongPhase);
        }
        self.config = config;
        self.scenario.clear();
        self.conversation.clear();
        self.final_feedback.clear();
        self.last_error = None;
        self.started_at = Some(Utc::now());
        self.phase = Phase::Generating;
        Ok(())
    }

    /// Applies the outcome of the opening calls. Success seeds the first
    /// turn and enters Playing; failure enters Error with the conversation
    /// still empty, so retry re-runs the whole opening.
    pub fn complete_generation(&mut self, outcome: GatewayResult<OpeningExchange>) {
        if self.phase != Phase::Generating {
            return;
        }
        match outcome {
            Ok(opening) => {
                self.scenario = opening.scenario;
                let category = self.config.interview_type.first_question_category();
                self.conversation.push(ConversationTurn::new(
                    opening.first_question,
                    Some(category.to_string()),
                ));
                self.phase = Phase::Playing;
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                self.phase = Phase::Error;
            }
        }
    }

    /// Submit intent: Playing -> Evaluating. Records the answer on the last
    /// turn (first submission wins; a repeat never overwrites it) and
    /// returns the evaluation request for the gateway.
    pub fn begin_answer(&mut self, text: &str) -> Result<EvaluationRequest, IntentRejected> {
        if self.phase != Phase::Playing {
            return Err(IntentRejected::WrongPhase);
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(IntentRejected::EmptyAnswer);
        }
        let Some(last) = self.conversation.last_mut() else {
            return Err(IntentRejected::WrongPhase);
        };
        if last.answer.is_none() {
            last.answer = Some(trimmed.to_string());
        }
        self.phase = Phase::Evaluating;
        Ok(self.evaluation_request())
    }

    /// Applies the outcome of an evaluation call for the given turn.
    pub fn complete_evaluation(
        &mut self,
        turn_number: u32,
        outcome: GatewayResult<EvaluationResult>,
    ) {
        if self.phase != Phase::Evaluating {
            return;
        }
        let budget_exhausted = turn_number >= self.max_turns();
        match outcome {
            Ok(result) => {
                if let Some(last) = self.conversation.last_mut() {
                    last.feedback = Some(result.feedback);
                }
                // `is_game_over` wins over a non-empty next question, and an
                // exhausted turn budget ends the interview no matter what the
                // gateway asked for next.
                if result.is_game_over || result.next_question.is_empty() || budget_exhausted {
                    self.final_feedback = if result.final_feedback.is_empty() {
                        DEFAULT_CLOSING_FEEDBACK.to_string()
                    } else {
                        result.final_feedback
                    };
                    self.phase = Phase::Finished;
                } else {
                    let category = if result.next_question_category.is_empty() {
                        None
                    } else {
                        Some(result.next_question_category)
                    };
                    self.conversation
                        .push(ConversationTurn::new(result.next_question, category));
                    self.phase = Phase::Playing;
                }
            }
            Err(_) if budget_exhausted => {
                // The user-facing outcome (ending the interview) is still
                // achievable without the gateway's cooperation.
                if let Some(last) = self.conversation.last_mut() {
                    last.feedback = Some(FALLBACK_TURN_FEEDBACK.to_string());
                }
                self.final_feedback = FALLBACK_FINAL_FEEDBACK.to_string();
                self.phase = Phase::Finished;
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                self.phase = Phase::Error;
            }
        }
    }

    /// Retry intent, valid only in Error. Resolves to re-running the opening
    /// when the failure happened before any question was asked, or to
    /// re-evaluating the stored answer with identical inputs.
    pub fn begin_retry(&mut self) -> Result<RetryStep, IntentRejected> {
        if self.phase != Phase::Error {
            return Err(IntentRejected::WrongPhase);
        }
        if self.conversation.is_empty() {
            self.last_error = None;
            self.phase = Phase::Generating;
            return Ok(RetryStep::Regenerate);
        }
        let last_answered = self
            .conversation
            .last()
            .map(|t| t.answer.is_some())
            .unwrap_or(false);
        if !last_answered {
            return Err(IntentRejected::NothingToRetry);
        }
        self.last_error = None;
        self.phase = Phase::Evaluating;
        Ok(RetryStep::Reevaluate(self.evaluation_request()))
    }

    /// Restart intent: unconditional, discards all session data and returns
    /// a pristine Welcome with a fresh session identity.
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    /// Snapshot for the sample-answer side-channel: the last turn's question
    /// plus the transcript strictly before it. `None` while no question has
    /// been asked. Never touches the phase.
    pub fn sample_request(&self) -> Option<SampleAnswerRequest> {
        let last = self.conversation.last()?;
        Some(SampleAnswerRequest {
            scenario: self.scenario.clone(),
            history: transcript(&self.conversation[..self.conversation.len() - 1]),
            current_question: last.question.clone(),
            config: self.config.clone(),
        })
    }

    //=====================================================================================
    // Helpers
    //=====================================================================================

    /// Builds the evaluation request for the last turn. The last turn must
    /// already carry the submitted answer.
    fn evaluation_request(&self) -> EvaluationRequest {
        let answer = self
            .conversation
            .last()
            .and_then(|t| t.answer.clone())
            .unwrap_or_default();
        EvaluationRequest {
            scenario: self.scenario.clone(),
            history: self.evaluation_history(),
            answer,
            turn_number: self.conversation.len() as u32,
            max_turns: self.max_turns(),
            config: self.config.clone(),
        }
    }

    /// Transcript of every turn, with the turn under evaluation shown with
    /// an empty candidate line (its answer travels separately).
    fn evaluation_history(&self) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.conversation.len());
        for (index, turn) in self.conversation.iter().enumerate() {
            let answer = if index + 1 == self.conversation.len() {
                ""
            } else {
                turn.answer.as_deref().unwrap_or("")
            };
            lines.push(transcript_line(turn, answer));
        }
        lines.join("\n\n")
    }
}

/// Serializes completed turns as alternating interviewer/candidate lines.
fn transcript(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|turn| transcript_line(turn, turn.answer.as_deref().unwrap_or("")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn transcript_line(turn: &ConversationTurn, answer: &str) -> String {
    format!(
        "Interviewer ({}): {}\nCandidate: {}",
        turn.category.as_deref().unwrap_or("General"),
        turn.question,
        answer
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, InterviewType};
    use crate::ports::GatewayError;

    fn playing_session() -> InterviewSession {
        let mut session = InterviewSession::new();
        session.begin_start(SessionConfig::default()).unwrap();
        session.complete_generation(Ok(OpeningExchange {
            scenario: "A retailer wants to modernize checkout.".to_string(),
            first_question: "How would you begin to approach this problem?".to_string(),
        }));
        session
    }

    fn next_question_result(question: &str, category: &str, feedback: &str) -> EvaluationResult {
        EvaluationResult {
            feedback: feedback.to_string(),
            next_question: question.to_string(),
            next_question_category: category.to_string(),
            is_game_over: false,
            final_feedback: String::new(),
        }
    }

    #[test]
    fn turn_budget_tracks_difficulty() {
        assert_eq!(Difficulty::Easy.max_turns(), 3);
        assert_eq!(Difficulty::Medium.max_turns(), 5);
        assert_eq!(Difficulty::Hard.max_turns(), 7);
    }

    #[test]
    fn start_seeds_first_turn_with_strategy_analysis_for_case_study() {
        let session = playing_session();
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.conversation().len(), 1);
        let first = &session.conversation()[0];
        assert_eq!(
            first.question,
            "How would you begin to approach this problem?"
        );
        assert_eq!(first.category.as_deref(), Some("Strategy Analysis"));
        assert_eq!(session.scenario(), "A retailer wants to modernize checkout.");
    }

    #[test]
    fn first_turn_category_defaults_to_type_label_for_other_types() {
        let mut session = InterviewSession::new();
        session
            .begin_start(SessionConfig {
                interview_type: InterviewType::SystemDesign,
                ..SessionConfig::default()
            })
            .unwrap();
        session.complete_generation(Ok(OpeningExchange {
            scenario: "Design a URL shortener.".to_string(),
            first_question: "How would you approach designing this system?".to_string(),
        }));
        assert_eq!(
            session.conversation()[0].category.as_deref(),
            Some("System Design")
        );
    }

    #[test]
    fn start_is_rejected_outside_welcome() {
        let mut session = playing_session();
        assert_eq!(
            session.begin_start(SessionConfig::default()),
            Err(IntentRejected::WrongPhase)
        );
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn failed_generation_enters_error_with_empty_conversation() {
        let mut session = InterviewSession::new();
        session.begin_start(SessionConfig::default()).unwrap();
        session.complete_generation(Err(GatewayError::Generation("upstream 503".to_string())));
        assert_eq!(session.phase(), Phase::Error);
        assert!(session.conversation().is_empty());
        assert!(session.last_error().unwrap().contains("upstream 503"));
    }

    #[test]
    fn submit_builds_request_with_turn_number_and_budget() {
        let mut session = playing_session();
        let request = session
            .begin_answer("We should interview stakeholders first")
            .unwrap();
        assert_eq!(session.phase(), Phase::Evaluating);
        assert_eq!(request.turn_number, 1);
        assert_eq!(request.max_turns, 5);
        assert_eq!(request.answer, "We should interview stakeholders first");
        // The turn under evaluation shows an empty candidate line.
        assert_eq!(
            request.history,
            "Interviewer (Strategy Analysis): How would you begin to approach this problem?\nCandidate: "
        );
    }

    #[test]
    fn blank_answers_are_rejected_without_a_transition() {
        let mut session = playing_session();
        assert!(matches!(
            session.begin_answer("   \n\t"),
            Err(IntentRejected::EmptyAnswer)
        ));
        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.conversation()[0].answer.is_none());
    }

    #[test]
    fn submit_is_rejected_while_evaluating() {
        let mut session = playing_session();
        session.begin_answer("First answer").unwrap();
        assert!(matches!(
            session.begin_answer("Second answer"),
            Err(IntentRejected::WrongPhase)
        ));
        assert_eq!(
            session.conversation()[0].answer.as_deref(),
            Some("First answer")
        );
    }

    #[test]
    fn answer_recording_is_idempotent() {
        let mut session = playing_session();
        session.begin_answer("Original answer").unwrap();
        // Evaluation fails, the user retries via a fresh submission path.
        session.complete_evaluation(1, Err(GatewayError::Evaluation("timeout".to_string())));
        assert_eq!(session.phase(), Phase::Error);
        let step = session.begin_retry().unwrap();
        let RetryStep::Reevaluate(request) = step else {
            panic!("expected a re-evaluation step");
        };
        assert_eq!(request.answer, "Original answer");
        assert_eq!(request.turn_number, 1);
    }

    #[test]
    fn successful_evaluation_appends_next_turn() {
        let mut session = playing_session();
        session
            .begin_answer("We should interview stakeholders first")
            .unwrap();
        session.complete_evaluation(
            1,
            Ok(next_question_result(
                "Q2",
                "Elicitation and Collaboration",
                "Good start.",
            )),
        );
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.conversation().len(), 2);
        assert_eq!(
            session.conversation()[0].feedback.as_deref(),
            Some("Good start.")
        );
        assert_eq!(session.conversation()[1].question, "Q2");
        assert_eq!(
            session.conversation()[1].category.as_deref(),
            Some("Elicitation and Collaboration")
        );
    }

    #[test]
    fn game_over_finishes_without_appending_a_turn() {
        let mut session = playing_session();
        session.begin_answer("My answer").unwrap();
        session.complete_evaluation(
            1,
            Ok(EvaluationResult {
                feedback: "Well reasoned.".to_string(),
                next_question: String::new(),
                next_question_category: String::new(),
                is_game_over: true,
                final_feedback: "Solid performance overall.".to_string(),
            }),
        );
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.final_feedback(), "Solid performance overall.");
        assert_eq!(session.conversation().len(), 1);
    }

    #[test]
    fn game_over_wins_over_a_non_empty_next_question() {
        let mut session = playing_session();
        session.begin_answer("My answer").unwrap();
        session.complete_evaluation(
            1,
            Ok(EvaluationResult {
                feedback: "Fine.".to_string(),
                next_question: "A stray question".to_string(),
                next_question_category: "Stray".to_string(),
                is_game_over: true,
                final_feedback: String::new(),
            }),
        );
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.final_feedback(), DEFAULT_CLOSING_FEEDBACK);
        assert_eq!(session.conversation().len(), 1);
    }

    #[test]
    fn conversation_never_exceeds_the_turn_budget() {
        let mut session = InterviewSession::new();
        session
            .begin_start(SessionConfig {
                difficulty: Difficulty::Easy,
                ..SessionConfig::default()
            })
            .unwrap();
        session.complete_generation(Ok(OpeningExchange {
            scenario: "Scenario".to_string(),
            first_question: "Q1".to_string(),
        }));
        for turn in 1..=3u32 {
            session.begin_answer(&format!("Answer {turn}")).unwrap();
            session.complete_evaluation(
                turn,
                Ok(next_question_result(
                    &format!("Q{}", turn + 1),
                    "General",
                    "Noted.",
                )),
            );
        }
        // Even though the gateway kept offering questions, the Easy budget
        // of 3 capped the conversation and finished the session.
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.conversation().len(), 3);
        assert_eq!(session.final_feedback(), DEFAULT_CLOSING_FEEDBACK);
    }

    #[test]
    fn every_completed_turn_has_answer_and_feedback() {
        let mut session = playing_session();
        for turn in 1..=3u32 {
            session.begin_answer(&format!("Answer {turn}")).unwrap();
            session.complete_evaluation(
                turn,
                Ok(next_question_result(
                    &format!("Q{}", turn + 1),
                    "General",
                    "Noted.",
                )),
            );
        }
        let turns = session.conversation();
        assert_eq!(turns.len(), 4);
        for turn in &turns[..turns.len() - 1] {
            assert!(turn.answer.is_some());
            assert!(turn.feedback.is_some());
        }
        assert!(turns.last().unwrap().answer.is_none());
        assert!(turns.last().unwrap().feedback.is_none());
    }

    #[test]
    fn evaluation_failure_below_budget_preserves_the_conversation() {
        let mut session = playing_session();
        session.begin_answer("My answer").unwrap();
        session.complete_evaluation(1, Err(GatewayError::Evaluation("timeout".to_string())));
        assert_eq!(session.phase(), Phase::Error);
        assert!(session.last_error().is_some());
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation()[0].answer.as_deref(), Some("My answer"));
        assert!(session.conversation()[0].feedback.is_none());
    }

    #[test]
    fn evaluation_failure_at_budget_synthesizes_a_fallback_finish() {
        let mut session = InterviewSession::new();
        session
            .begin_start(SessionConfig {
                difficulty: Difficulty::Easy,
                ..SessionConfig::default()
            })
            .unwrap();
        session.complete_generation(Ok(OpeningExchange {
            scenario: "Scenario".to_string(),
            first_question: "Q1".to_string(),
        }));
        for turn in 1..=2u32 {
            session.begin_answer(&format!("Answer {turn}")).unwrap();
            session.complete_evaluation(
                turn,
                Ok(next_question_result(
                    &format!("Q{}", turn + 1),
                    "General",
                    "Noted.",
                )),
            );
        }
        session.begin_answer("Final answer").unwrap();
        session.complete_evaluation(3, Err(GatewayError::Evaluation("upstream down".to_string())));
        assert_eq!(session.phase(), Phase::Finished);
        assert!(session.last_error().is_none());
        assert!(!session.final_feedback().is_empty());
        assert!(session.conversation()[2].feedback.is_some());
    }

    #[test]
    fn retry_after_failed_opening_regenerates() {
        let mut session = InterviewSession::new();
        session.begin_start(SessionConfig::default()).unwrap();
        session.complete_generation(Err(GatewayError::Generation("boom".to_string())));
        let step = session.begin_retry().unwrap();
        assert!(matches!(step, RetryStep::Regenerate));
        assert_eq!(session.phase(), Phase::Generating);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn retry_is_rejected_outside_error() {
        let mut session = playing_session();
        assert!(matches!(
            session.begin_retry(),
            Err(IntentRejected::WrongPhase)
        ));
    }

    #[test]
    fn restart_returns_to_a_pristine_welcome_from_any_state() {
        let mut session = playing_session();
        session.begin_answer("My answer").unwrap();
        session.complete_evaluation(1, Err(GatewayError::Evaluation("timeout".to_string())));
        let old_id = session.id();
        session.restart();
        assert_eq!(session.phase(), Phase::Welcome);
        assert!(session.conversation().is_empty());
        assert!(session.scenario().is_empty());
        assert!(session.final_feedback().is_empty());
        assert!(session.last_error().is_none());
        assert_ne!(session.id(), old_id);
    }

    #[test]
    fn finished_iff_final_feedback_and_error_iff_last_error() {
        let mut session = playing_session();
        assert!(session.final_feedback().is_empty());
        assert!(session.last_error().is_none());

        session.begin_answer("My answer").unwrap();
        session.complete_evaluation(1, Err(GatewayError::Evaluation("timeout".to_string())));
        assert_eq!(session.phase(), Phase::Error);
        assert!(session.last_error().is_some());
        assert!(session.final_feedback().is_empty());

        session.begin_retry().unwrap();
        assert!(session.last_error().is_none());
        session.complete_evaluation(
            1,
            Ok(EvaluationResult {
                feedback: "Done.".to_string(),
                next_question: String::new(),
                next_question_category: String::new(),
                is_game_over: true,
                final_feedback: "Strong finish.".to_string(),
            }),
        );
        assert_eq!(session.phase(), Phase::Finished);
        assert!(!session.final_feedback().is_empty());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn sample_request_uses_history_strictly_before_the_current_question() {
        let mut session = playing_session();
        session.begin_answer("Answer one").unwrap();
        session.complete_evaluation(1, Ok(next_question_result("Q2", "RADD", "Nice.")));

        let request = session.sample_request().unwrap();
        assert_eq!(request.current_question, "Q2");
        assert_eq!(
            request.history,
            "Interviewer (Strategy Analysis): How would you begin to approach this problem?\nCandidate: Answer one"
        );
    }

    #[test]
    fn sample_request_is_none_before_the_first_question() {
        let session = InterviewSession::new();
        assert!(session.sample_request().is_none());
    }
}
