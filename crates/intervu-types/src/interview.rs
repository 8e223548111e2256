use std::fmt;
use std::str::FromStr;

/// The flavour of interview to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    #[default]
    Technical,
    Mixed,
    Behavioural,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Mixed => "mixed",
            InterviewType::Behavioural => "behavioural",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(InterviewType::Technical),
            "mixed" => Ok(InterviewType::Mixed),
            "behavioural" | "behavioral" => Ok(InterviewType::Behavioural),
            other => Err(format!(
                "unknown interview type '{other}', expected technical, mixed or behavioural"
            )),
        }
    }
}

/// Body of `POST /api/vapi/generate`.
///
/// Field names are part of the endpoint contract, including the lowercase
/// `techstack` and `userid`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerateInterviewRequest {
    #[serde(rename = "type")]
    interview_type: InterviewType,
    role: String,
    level: String,
    techstack: String,
    amount: String,
    userid: String,
}

impl GenerateInterviewRequest {
    pub fn new(interview_type: InterviewType, role: &str, level: &str, user_id: &str) -> Self {
        Self {
            interview_type,
            role: role.to_string(),
            level: level.to_string(),
            techstack: String::new(),
            amount: String::new(),
            userid: user_id.to_string(),
        }
    }

    pub fn with_techstack(mut self, techstack: &str) -> Self {
        self.techstack = techstack.to_string();
        self
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount.to_string();
        self
    }

    pub fn interview_type(&self) -> InterviewType {
        self.interview_type
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn techstack(&self) -> &str {
        &self.techstack
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn user_id(&self) -> &str {
        &self.userid
    }
}
