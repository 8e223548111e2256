//now people using the types library can use these types
pub mod assistant;
pub mod events;
pub mod feedback;
pub mod interview;
pub mod message;
pub mod transcript;

//re-export types for easier access
pub use assistant::{Assistant, AssistantOverrides};
pub use events::{ClientEvent, ServerEvent};
pub use feedback::{FeedbackRequest, FeedbackResponse};
pub use interview::{GenerateInterviewRequest, InterviewType};
pub use message::{SessionMessage, TranscriptEvent, TranscriptType};
pub use transcript::{Role, TranscriptMessage};
