use crate::types::{Assistant, AssistantOverrides, SessionMessage};

/// Name of the template variable that carries the interview questions.
pub const QUESTIONS_VARIABLE: &str = "questions";

/// Everything the voice session needs to start a call.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStartConfig {
    pub assistant: Assistant,
    pub overrides: AssistantOverrides,
}

impl SessionStartConfig {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant,
            overrides: AssistantOverrides::default(),
        }
    }

    /// Sets the `questions` variable from the interview's question list.
    pub fn with_questions(mut self, questions: &[String]) -> Self {
        self.overrides = self
            .overrides
            .with_variable(QUESTIONS_VARIABLE, &format_questions(questions));
        self
    }

    pub fn questions(&self) -> Option<&str> {
        self.overrides.variable(QUESTIONS_VARIABLE)
    }
}

/// Renders questions as a bullet list, one `- question` per line.
pub fn format_questions(questions: &[String]) -> String {
    questions
        .iter()
        .map(|q| format!("- {q}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The six event kinds a voice session emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    CallStart,
    CallEnd,
    Message,
    SpeechStart,
    SpeechEnd,
    Error,
}

impl SessionEventKind {
    pub const ALL: [SessionEventKind; 6] = [
        SessionEventKind::CallStart,
        SessionEventKind::CallEnd,
        SessionEventKind::Message,
        SessionEventKind::SpeechStart,
        SessionEventKind::SpeechEnd,
        SessionEventKind::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEventKind::CallStart => "call-start",
            SessionEventKind::CallEnd => "call-end",
            SessionEventKind::Message => "message",
            SessionEventKind::SpeechStart => "speech-start",
            SessionEventKind::SpeechEnd => "speech-end",
            SessionEventKind::Error => "error",
        }
    }
}

/// Provider-independent events delivered to session listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CallStart,
    CallEnd,
    Message(SessionMessage),
    SpeechStart,
    SpeechEnd,
    Error(String),
}

impl SessionEvent {
    pub fn kind(&self) -> SessionEventKind {
        match self {
            SessionEvent::CallStart => SessionEventKind::CallStart,
            SessionEvent::CallEnd => SessionEventKind::CallEnd,
            SessionEvent::Message(_) => SessionEventKind::Message,
            SessionEvent::SpeechStart => SessionEventKind::SpeechStart,
            SessionEvent::SpeechEnd => SessionEventKind::SpeechEnd,
            SessionEvent::Error(_) => SessionEventKind::Error,
        }
    }
}
