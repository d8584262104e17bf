//! crates/interview_core/src/orchestrator.rs
//!
//! The Interview Orchestrator: owns the session state machine and drives the
//! asynchronous half of each intent against the gateway. Callers issue one
//! intent at a time and observe progress through `session()` snapshots; main
//! flow gateway calls are never overlapped.

use std::sync::Arc;

use crate::domain::{SampleAnswerRequest, SessionConfig};
use crate::ports::{GatewayError, GatewayResult, InterviewGateway};
use crate::session::{IntentRejected, InterviewSession, OpeningExchange, RetryStep};

pub struct Orchestrator {
    session: InterviewSession,
    gateway: Arc<dyn InterviewGateway>,
}

impl Orchestrator {
    pub fn new(gateway: Arc<dyn InterviewGateway>) -> Self {
        Self {
            session: InterviewSession::new(),
            gateway,
        }
    }

    /// Read-only view of the session for snapshotting.
    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    /// A handle to the gateway, for side-channel tasks that must run
    /// without holding the session.
    pub fn gateway(&self) -> Arc<dyn InterviewGateway> {
        Arc::clone(&self.gateway)
    }

    /// Start intent: generates the scenario and the first question with two
    /// sequential gateway calls, then enters Playing (or Error).
    pub async fn start_interview(&mut self, config: SessionConfig) -> Result<(), IntentRejected> {
        self.session.begin_start(config)?;
        let outcome = self.run_opening().await;
        self.session.complete_generation(outcome);
        Ok(())
    }

    /// Submit intent: records the answer, invokes evaluation, and applies
    /// the verdict (next turn, finish, fallback finish, or error).
    pub async fn submit_answer(&mut self, text: &str) -> Result<(), IntentRejected> {
        let request = self.session.begin_answer(text)?;
        let outcome = self.gateway.evaluate_answer(&request).await;
        self.session.complete_evaluation(request.turn_number, outcome);
        Ok(())
    }

    /// Retry intent: re-issues the exact failed step with identical inputs.
    pub async fn retry(&mut self) -> Result<(), IntentRejected> {
        match self.session.begin_retry()? {
            RetryStep::Regenerate => {
                let outcome = self.run_opening().await;
                self.session.complete_generation(outcome);
            }
            RetryStep::Reevaluate(request) => {
                let outcome = self.gateway.evaluate_answer(&request).await;
                self.session.complete_evaluation(request.turn_number, outcome);
            }
        }
        Ok(())
    }

    /// Restart intent: unconditional, discards all session data.
    pub fn restart(&mut self) {
        self.session.restart();
    }

    /// Side-channel snapshot for the sample-answer feature.
    pub fn sample_request(&self) -> Option<SampleAnswerRequest> {
        self.session.sample_request()
    }

    /// Generates a sample answer for the current question. Independent of
    /// the main state machine: failures stay local to the caller and the
    /// session phase is never touched.
    pub async fn generate_sample_answer(&self) -> GatewayResult<String> {
        let request = self.sample_request().ok_or_else(|| {
            GatewayError::SampleAnswer("No question has been asked yet.".to_string())
        })?;
        self.gateway.generate_sample_answer(&request).await
    }

    async fn run_opening(&self) -> GatewayResult<OpeningExchange> {
        let config = self.session.config().clone();
        let scenario = self.gateway.generate_scenario(&config).await?;
        let first_question = self
            .gateway
            .ask_first_question(&scenario, config.interview_type)
            .await?;
        Ok(OpeningExchange {
            scenario,
            first_question,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Difficulty, EvaluationRequest, EvaluationResult, InterviewType, SampleAnswerRequest,
    };
    use crate::session::Phase;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A gateway whose responses are scripted per operation, recording every
    /// evaluation request it sees.
    #[derive(Default)]
    struct ScriptedGateway {
        scenarios: Mutex<VecDeque<GatewayResult<String>>>,
        first_questions: Mutex<VecDeque<GatewayResult<String>>>,
        evaluations: Mutex<VecDeque<GatewayResult<EvaluationResult>>>,
        samples: Mutex<VecDeque<GatewayResult<String>>>,
        seen_evaluations: Mutex<Vec<EvaluationRequest>>,
    }

    impl ScriptedGateway {
        fn exhausted(kind: &str) -> GatewayError {
            GatewayError::Generation(format!("no scripted {kind} response left"))
        }
    }

    #[async_trait]
    impl InterviewGateway for ScriptedGateway {
        async fn generate_scenario(&self, _config: &SessionConfig) -> GatewayResult<String> {
            self.scenarios
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Self::exhausted("scenario")))
        }

        async fn ask_first_question(
            &self,
            _scenario: &str,
            _interview_type: InterviewType,
        ) -> GatewayResult<String> {
            self.first_questions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Self::exhausted("first question")))
        }

        async fn evaluate_answer(
            &self,
            request: &EvaluationRequest,
        ) -> GatewayResult<EvaluationResult> {
            self.seen_evaluations.lock().unwrap().push(request.clone());
            self.evaluations
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Evaluation("no scripted verdict".into())))
        }

        async fn generate_sample_answer(
            &self,
            _request: &SampleAnswerRequest,
        ) -> GatewayResult<String> {
            self.samples
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::SampleAnswer("no scripted sample".into())))
        }
    }

    fn case_study_config() -> SessionConfig {
        SessionConfig {
            difficulty: Difficulty::Medium,
            interview_type: InterviewType::CaseStudy,
            ..SessionConfig::default()
        }
    }

    async fn playing_orchestrator(gateway: Arc<ScriptedGateway>) -> Orchestrator {
        gateway
            .scenarios
            .lock()
            .unwrap()
            .push_back(Ok("A hospital network is consolidating records.".to_string()));
        gateway
            .first_questions
            .lock()
            .unwrap()
            .push_back(Ok("How would you begin?".to_string()));
        let mut orchestrator = Orchestrator::new(gateway);
        orchestrator
            .start_interview(case_study_config())
            .await
            .unwrap();
        orchestrator
    }

    #[tokio::test]
    async fn start_runs_scenario_then_first_question() {
        let gateway = Arc::new(ScriptedGateway::default());
        let orchestrator = playing_orchestrator(gateway).await;
        let session = orchestrator.session();
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(
            session.conversation()[0].category.as_deref(),
            Some("Strategy Analysis")
        );
    }

    #[tokio::test]
    async fn submit_passes_turn_number_and_budget_to_the_gateway() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.evaluations.lock().unwrap().push_back(Ok(EvaluationResult {
            feedback: "Good start.".to_string(),
            next_question: "Q2".to_string(),
            next_question_category: "Elicitation and Collaboration".to_string(),
            is_game_over: false,
            final_feedback: String::new(),
        }));
        let mut orchestrator = playing_orchestrator(gateway.clone()).await;
        orchestrator
            .submit_answer("We should interview stakeholders first")
            .await
            .unwrap();

        let seen = gateway.seen_evaluations.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].turn_number, 1);
        assert_eq!(seen[0].max_turns, 5);

        let session = orchestrator.session();
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.conversation().len(), 2);
        assert_eq!(
            session.conversation()[0].feedback.as_deref(),
            Some("Good start.")
        );
        assert_eq!(session.conversation()[1].question, "Q2");
    }

    #[tokio::test]
    async fn game_over_verdict_finishes_the_session() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.evaluations.lock().unwrap().push_back(Ok(EvaluationResult {
            feedback: "Well done.".to_string(),
            next_question: String::new(),
            next_question_category: String::new(),
            is_game_over: true,
            final_feedback: "Solid performance overall.".to_string(),
        }));
        let mut orchestrator = playing_orchestrator(gateway).await;
        orchestrator.submit_answer("My answer").await.unwrap();

        let session = orchestrator.session();
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.final_feedback(), "Solid performance overall.");
        assert_eq!(session.conversation().len(), 1);
    }

    #[tokio::test]
    async fn retry_reissues_evaluation_with_identical_inputs() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway
            .evaluations
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::Evaluation("socket closed".into())));
        gateway.evaluations.lock().unwrap().push_back(Ok(EvaluationResult {
            feedback: "Recovered.".to_string(),
            next_question: "Q2".to_string(),
            next_question_category: "RADD".to_string(),
            is_game_over: false,
            final_feedback: String::new(),
        }));
        let mut orchestrator = playing_orchestrator(gateway.clone()).await;
        orchestrator.submit_answer("My answer").await.unwrap();
        assert_eq!(orchestrator.session().phase(), Phase::Error);

        orchestrator.retry().await.unwrap();
        assert_eq!(orchestrator.session().phase(), Phase::Playing);

        let seen = gateway.seen_evaluations.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].answer, seen[1].answer);
        assert_eq!(seen[0].turn_number, seen[1].turn_number);
        assert_eq!(seen[0].history, seen[1].history);
    }

    #[tokio::test]
    async fn retry_after_failed_opening_regenerates() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway
            .scenarios
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::Generation("upstream 500".into())));
        gateway
            .scenarios
            .lock()
            .unwrap()
            .push_back(Ok("Second attempt scenario".to_string()));
        gateway
            .first_questions
            .lock()
            .unwrap()
            .push_back(Ok("Q1".to_string()));

        let mut orchestrator = Orchestrator::new(gateway);
        orchestrator
            .start_interview(case_study_config())
            .await
            .unwrap();
        assert_eq!(orchestrator.session().phase(), Phase::Error);
        assert!(orchestrator.session().conversation().is_empty());

        orchestrator.retry().await.unwrap();
        assert_eq!(orchestrator.session().phase(), Phase::Playing);
        assert_eq!(orchestrator.session().scenario(), "Second attempt scenario");
    }

    #[tokio::test]
    async fn sample_answer_failures_never_touch_the_session() {
        let gateway = Arc::new(ScriptedGateway::default());
        let orchestrator = playing_orchestrator(gateway).await;
        let err = orchestrator.generate_sample_answer().await.unwrap_err();
        assert!(matches!(err, GatewayError::SampleAnswer(_)));
        assert_eq!(orchestrator.session().phase(), Phase::Playing);
    }

    #[tokio::test]
    async fn sample_answer_uses_the_current_question() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway
            .samples
            .lock()
            .unwrap()
            .push_back(Ok("An exemplar answer.".to_string()));
        let orchestrator = playing_orchestrator(gateway).await;
        let sample = orchestrator.generate_sample_answer().await.unwrap();
        assert_eq!(sample, "An exemplar answer.");
        let request = orchestrator.sample_request().unwrap();
        assert_eq!(request.current_question, "How would you begin?");
        assert!(request.history.is_empty());
    }
}
