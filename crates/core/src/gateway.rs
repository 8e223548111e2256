use crate::types::{FeedbackRequest, FeedbackResponse, GenerateInterviewRequest};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;

pub const GENERATE_PATH: &str = "/api/vapi/generate";
pub const FEEDBACK_PATH: &str = "/api/feedback";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The endpoint answered with a non-2xx status; `body` is its error detail.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request could not be sent: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response could not be decoded: {0}")]
    Decode(String),
}

// The gateways are the two remote calls the app makes. Keeping them behind
// traits lets the controller and the generate flow run against mocks.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FeedbackGateway: Send + Sync {
    /// Stores the transcript and returns the feedback identifier, if any.
    async fn create_feedback(
        &self,
        request: FeedbackRequest,
    ) -> Result<FeedbackResponse, GatewayError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait InterviewGenerationGateway: Send + Sync {
    /// Creates an interview record. A 2xx answer is all success means.
    async fn generate_interview(&self, request: GenerateInterviewRequest)
    -> Result<(), GatewayError>;
}

/// JSON-over-HTTP implementation of both gateways against the app backend.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<T: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<String, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl FeedbackGateway for HttpGateway {
    async fn create_feedback(
        &self,
        request: FeedbackRequest,
    ) -> Result<FeedbackResponse, GatewayError> {
        let body = self.post_json(FEEDBACK_PATH, &request).await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl InterviewGenerationGateway for HttpGateway {
    async fn generate_interview(
        &self,
        request: GenerateInterviewRequest,
    ) -> Result<(), GatewayError> {
        self.post_json(GENERATE_PATH, &request).await?;
        Ok(())
    }
}
