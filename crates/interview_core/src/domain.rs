//! crates/interview_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use std::fmt;
use std::str::FromStr;

/// How demanding the simulated interview is. The difficulty also fixes
/// the turn budget for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The number of questions asked before the interview must end.
    pub fn max_turns(&self) -> u32 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 5,
            Difficulty::Hard => 7,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(UnknownVariant::new("Difficulty", other)),
        }
    }
}

/// The industry the scenario is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    General,
    FinanceBanking,
    Healthcare,
    EcommerceRetail,
    TechnologySaas,
    Insurance,
    Telecommunications,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::General,
        Domain::FinanceBanking,
        Domain::Healthcare,
        Domain::EcommerceRetail,
        Domain::TechnologySaas,
        Domain::Insurance,
        Domain::Telecommunications,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Domain::General => "General",
            Domain::FinanceBanking => "Finance / Banking",
            Domain::Healthcare => "Healthcare",
            Domain::EcommerceRetail => "E-commerce / Retail",
            Domain::TechnologySaas => "Technology / SaaS",
            Domain::Insurance => "Insurance",
            Domain::Telecommunications => "Telecommunications",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Domain {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .iter()
            .find(|d| d.label() == s)
            .copied()
            .ok_or_else(|| UnknownVariant::new("Domain", s))
    }
}

/// The closed set of interview styles the simulator supports. Prompt
/// templates are keyed by this enum, so adding a style is a data change,
/// not a control-flow change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterviewType {
    CaseStudy,
    ProductManagement,
    RequirementGathering,
    SystemDesign,
    DataStructuresAlgorithms,
    TechnicalQuestions,
    AgileScrum,
    UserAcceptanceTesting,
    BehavioralQuestions,
    SituationalJudgement,
}

impl InterviewType {
    pub const ALL: [InterviewType; 10] = [
        InterviewType::CaseStudy,
        InterviewType::ProductManagement,
        InterviewType::RequirementGathering,
        InterviewType::SystemDesign,
        InterviewType::DataStructuresAlgorithms,
        InterviewType::TechnicalQuestions,
        InterviewType::AgileScrum,
        InterviewType::UserAcceptanceTesting,
        InterviewType::BehavioralQuestions,
        InterviewType::SituationalJudgement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InterviewType::CaseStudy => "Case Study",
            InterviewType::ProductManagement => "Product Management",
            InterviewType::RequirementGathering => "Requirement Gathering",
            InterviewType::SystemDesign => "System Design",
            InterviewType::DataStructuresAlgorithms => "Data Structures & Algorithms (DSA)",
            InterviewType::TechnicalQuestions => "Technical Questions (SQL, API, etc.)",
            InterviewType::AgileScrum => "Agile / Scrum Methodology",
            InterviewType::UserAcceptanceTesting => "User Acceptance Testing (UAT)",
            InterviewType::BehavioralQuestions => "Behavioral Questions",
            InterviewType::SituationalJudgement => "Situational Judgement Tests",
        }
    }

    /// The category attached to the opening question. Case studies always
    /// open with strategy analysis; every other style opens under its own
    /// label.
    pub fn first_question_category(&self) -> &'static str {
        match self {
            InterviewType::CaseStudy => "Strategy Analysis",
            other => other.label(),
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InterviewType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterviewType::ALL
            .iter()
            .find(|t| t.label() == s)
            .copied()
            .ok_or_else(|| UnknownVariant::new("InterviewType", s))
    }
}

/// Error returned when parsing a closed enumeration from a label string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// The immutable parameters of one interview run, chosen on the welcome
/// screen and discarded on restart.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub domain: Domain,
    pub interview_type: InterviewType,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            domain: Domain::General,
            interview_type: InterviewType::CaseStudy,
            company_name: None,
            job_description: None,
        }
    }
}

/// One question/answer/feedback exchange in the conversation.
///
/// Turns are append-only: only the last turn's `answer` and `feedback`
/// are filled in after creation, each exactly once.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub question: String,
    pub category: Option<String>,
    pub answer: Option<String>,
    pub feedback: Option<String>,
}

impl ConversationTurn {
    pub fn new(question: String, category: Option<String>) -> Self {
        Self {
            question,
            category,
            answer: None,
            feedback: None,
        }
    }
}

/// The structured verdict the gateway returns for a submitted answer.
///
/// All strings are present but possibly empty, never null: `next_question`
/// and `next_question_category` are empty iff the interview is over, and
/// `final_feedback` is non-empty only when it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    pub feedback: String,
    pub next_question: String,
    pub next_question_category: String,
    pub is_game_over: bool,
    pub final_feedback: String,
}

/// Everything the gateway needs to evaluate one submitted answer.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub scenario: String,
    /// Alternating interviewer/candidate transcript of every turn so far.
    /// The turn under evaluation shows an empty candidate line; its answer
    /// travels in `answer`.
    pub history: String,
    pub answer: String,
    /// 1-based count of questions asked so far.
    pub turn_number: u32,
    pub max_turns: u32,
    pub config: SessionConfig,
}

/// Inputs for the sample-answer side-channel: the question being answered
/// plus the transcript strictly before it. Never part of the session state.
#[derive(Debug, Clone)]
pub struct SampleAnswerRequest {
    pub scenario: String,
    pub history: String,
    pub current_question: String,
    pub config: SessionConfig,
}
