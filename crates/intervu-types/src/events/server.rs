use crate::message::SessionMessage;

/// `call-start` event
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStartEvent {
    #[serde(default)]
    call_id: Option<String>,
}

impl CallStartEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_id(&self) -> Option<&str> {
        self.call_id.as_deref()
    }
}

/// `call-end` event
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEndEvent {
    /// Why the provider ended the call, ex: "customer-ended-call"
    #[serde(default)]
    ended_reason: Option<String>,
}

impl CallEndEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ended_reason(mut self, reason: &str) -> Self {
        self.ended_reason = Some(reason.to_string());
        self
    }

    pub fn ended_reason(&self) -> Option<&str> {
        self.ended_reason.as_deref()
    }
}

/// `message` event
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MessageEvent {
    message: SessionMessage,
}

impl MessageEvent {
    pub fn new(message: SessionMessage) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &SessionMessage {
        &self.message
    }

    pub fn into_message(self) -> SessionMessage {
        self.message
    }
}

/// `error` event
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ErrorEvent {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl ErrorEvent {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}
