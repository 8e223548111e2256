use std::collections::BTreeMap;

/// The AI interviewer the voice provider runs for a call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    /// Display name of the assistant.
    name: String,

    /// What the assistant says as soon as the call connects.
    first_message: String,

    /// System prompt. May reference template variables such as `{{questions}}`.
    system_prompt: String,

    /// Provider voice identifier, ex: "sarah"
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<String>,

    /// Provider model identifier, ex: "gpt-4"
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

impl Assistant {
    pub fn builder() -> AssistantBuilder {
        AssistantBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_message(&self) -> &str {
        &self.first_message
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

pub struct AssistantBuilder {
    assistant: Assistant,
}

impl Default for AssistantBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistantBuilder {
    pub fn new() -> Self {
        Self {
            assistant: Assistant {
                name: "Interviewer".to_string(),
                first_message: String::new(),
                system_prompt: String::new(),
                voice: None,
                model: None,
            },
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.assistant.name = name.to_string();
        self
    }

    pub fn with_first_message(mut self, first_message: &str) -> Self {
        self.assistant.first_message = first_message.to_string();
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: &str) -> Self {
        self.assistant.system_prompt = system_prompt.to_string();
        self
    }

    pub fn with_voice(mut self, voice: &str) -> Self {
        self.assistant.voice = Some(voice.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.assistant.model = Some(model.to_string());
        self
    }

    pub fn build(self) -> Assistant {
        self.assistant
    }
}

/// Per-call overrides applied on top of the assistant definition.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantOverrides {
    /// Values substituted for `{{name}}` placeholders in the assistant prompts.
    variable_values: BTreeMap<String, String>,
}

impl AssistantOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: &str, value: &str) -> Self {
        self.variable_values
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variable_values.get(name).map(String::as_str)
    }

    pub fn variable_values(&self) -> &BTreeMap<String, String> {
        &self.variable_values
    }
}
