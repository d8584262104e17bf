pub mod interview_llm;
pub mod prompts;
pub mod stt;
pub mod tts;

pub use interview_llm::OpenAiInterviewAdapter;
pub use stt::OpenAiSttAdapter;
pub use tts::OpenAiTtsAdapter;
