use crate::transcript::Role;

/// Whether a transcript fragment is still being revised or is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptType {
    Partial,
    Final,
}

/// The payload of a `message` server event.
///
/// Only transcripts matter to the call; every other message type the voice
/// provider sends (function calls, status updates, ...) lands in `Other`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum SessionMessage {
    #[serde(rename = "transcript")]
    Transcript(TranscriptEvent),
    #[serde(other, rename = "other")]
    Other,
}

impl SessionMessage {
    /// The transcript carried by this message, if it is a finalized one.
    pub fn final_transcript(&self) -> Option<&TranscriptEvent> {
        match self {
            SessionMessage::Transcript(event) if event.is_final() => Some(event),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEvent {
    role: Role,
    transcript_type: TranscriptType,
    transcript: String,
}

impl TranscriptEvent {
    pub fn new(role: Role, transcript_type: TranscriptType, transcript: &str) -> Self {
        Self {
            role,
            transcript_type,
            transcript: transcript.to_string(),
        }
    }

    pub fn partial(role: Role, transcript: &str) -> Self {
        Self::new(role, TranscriptType::Partial, transcript)
    }

    pub fn finalized(role: Role, transcript: &str) -> Self {
        Self::new(role, TranscriptType::Final, transcript)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn transcript_type(&self) -> TranscriptType {
        self.transcript_type
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn is_final(&self) -> bool {
        self.transcript_type == TranscriptType::Final
    }
}
