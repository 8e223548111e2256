use crate::assistant::{Assistant, AssistantOverrides};

/// `start` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartEvent {
    /// The assistant that runs the call
    assistant: Assistant,

    /// Template variables and other per-call overrides
    assistant_overrides: AssistantOverrides,
}

impl StartEvent {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant,
            assistant_overrides: AssistantOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: AssistantOverrides) -> Self {
        self.assistant_overrides = overrides;
        self
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn overrides(&self) -> &AssistantOverrides {
        &self.assistant_overrides
    }
}

/// `stop` event
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct StopEvent {}

impl StopEvent {
    pub fn new() -> Self {
        Self {}
    }
}
