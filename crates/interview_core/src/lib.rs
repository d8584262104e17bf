pub mod domain;
pub mod orchestrator;
pub mod ports;
pub mod session;

pub use domain::{
    ConversationTurn, Difficulty, Domain, EvaluationRequest, EvaluationResult, InterviewType,
    SampleAnswerRequest, SessionConfig, UnknownVariant,
};
pub use orchestrator::Orchestrator;
pub use ports::{
    GatewayError, GatewayResult, InterviewGateway, PortError, PortResult, SpeechToTextService,
    TextToSpeechService,
};
pub use session::{IntentRejected, InterviewSession, OpeningExchange, Phase, RetryStep};
