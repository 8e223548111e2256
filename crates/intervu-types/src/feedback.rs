use crate::transcript::TranscriptMessage;

/// Body of the feedback-creation call made once a call has finished.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    interview_id: String,
    user_id: String,
    transcript: Vec<TranscriptMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback_id: Option<String>,
}

impl FeedbackRequest {
    pub fn new(interview_id: &str, user_id: &str, transcript: Vec<TranscriptMessage>) -> Self {
        Self {
            interview_id: interview_id.to_string(),
            user_id: user_id.to_string(),
            transcript,
            feedback_id: None,
        }
    }

    /// Reuse an existing feedback record instead of creating a new one.
    pub fn with_feedback_id(mut self, feedback_id: &str) -> Self {
        self.feedback_id = Some(feedback_id.to_string());
        self
    }

    pub fn interview_id(&self) -> &str {
        &self.interview_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn transcript(&self) -> &[TranscriptMessage] {
        &self.transcript
    }

    pub fn feedback_id(&self) -> Option<&str> {
        self.feedback_id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    success: bool,
    #[serde(default)]
    feedback_id: Option<String>,
}

impl FeedbackResponse {
    pub fn succeeded(feedback_id: &str) -> Self {
        Self {
            success: true,
            feedback_id: Some(feedback_id.to_string()),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            feedback_id: None,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn feedback_id(&self) -> Option<&str> {
        self.feedback_id.as_deref()
    }
}
