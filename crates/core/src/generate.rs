//! Interview-creation form flow.
//!
//! This path never touches the call controller: the draft goes straight to
//! the generation gateway and the outcome becomes a single host command.

use crate::Command;
use crate::gateway::InterviewGenerationGateway;
use crate::route::Route;
use crate::types::{GenerateInterviewRequest, InterviewType};

pub const GENERATE_FAILED_ALERT: &str = "Failed to create interview.";

/// Form state for a new interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewDraft {
    pub role: String,
    pub level: String,
    pub interview_type: InterviewType,
    pub question_count: u32,
    pub tech_stack: String,
}

impl Default for InterviewDraft {
    fn default() -> Self {
        Self {
            role: String::new(),
            level: String::new(),
            interview_type: InterviewType::Technical,
            question_count: 5,
            tech_stack: String::new(),
        }
    }
}

impl InterviewDraft {
    pub fn into_request(self, user_id: &str) -> GenerateInterviewRequest {
        GenerateInterviewRequest::new(self.interview_type, &self.role, &self.level, user_id)
            .with_techstack(&self.tech_stack)
            .with_amount(self.question_count)
    }
}

/// Submits the draft. Success sends the user home; failure raises an alert
/// and leaves them on the form so they can retry.
pub async fn submit_draft(
    gateway: &dyn InterviewGenerationGateway,
    draft: InterviewDraft,
    user_id: &str,
) -> Command {
    match gateway.generate_interview(draft.into_request(user_id)).await {
        Ok(()) => {
            tracing::info!("interview generated successfully");
            Command::Navigate(Route::Home)
        }
        Err(e) => {
            tracing::error!("error creating interview: {}", e);
            Command::Alert(GENERATE_FAILED_ALERT.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, MockInterviewGenerationGateway};

    fn draft() -> InterviewDraft {
        InterviewDraft {
            role: "Full Stack Developer".to_string(),
            level: "Senior".to_string(),
            tech_stack: "React, Node.js".to_string(),
            ..InterviewDraft::default()
        }
    }

    #[test]
    fn test_draft_defaults() {
        let draft = InterviewDraft::default();
        assert_eq!(draft.interview_type, InterviewType::Technical);
        assert_eq!(draft.question_count, 5);
    }

    #[tokio::test]
    async fn test_success_navigates_home() {
        let mut gateway = MockInterviewGenerationGateway::new();
        gateway
            .expect_generate_interview()
            .withf(|request| {
                request.role() == "Full Stack Developer"
                    && request.amount() == "5"
                    && request.user_id() == "u1"
                    && request.techstack() == "React, Node.js"
            })
            .times(1)
            .returning(|_| Ok(()));

        let command = submit_draft(&gateway, draft(), "u1").await;
        assert_eq!(command, Command::Navigate(Route::Home));
    }

    #[tokio::test]
    async fn test_server_error_alerts_without_navigation() {
        let mut gateway = MockInterviewGenerationGateway::new();
        gateway
            .expect_generate_interview()
            .times(1)
            .returning(|_| {
                Err(GatewayError::Status {
                    status: 500,
                    body: "internal error".to_string(),
                })
            });

        let command = submit_draft(&gateway, draft(), "u1").await;
        assert_eq!(command, Command::Alert(GENERATE_FAILED_ALERT.to_string()));
    }
}
