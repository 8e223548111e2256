use crate::transcript::TranscriptAccumulator;
use crate::types::{FeedbackRequest, SessionMessage, TranscriptMessage};
use std::fmt;

/// Lifecycle of a call attempt.
///
/// `Inactive -> Connecting -> Active -> Finished`, and `Finished -> Connecting`
/// when the user calls again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallStatus {
    #[default]
    Inactive,
    Connecting,
    Active,
    Finished,
}

impl CallStatus {
    pub fn can_start(self) -> bool {
        matches!(self, CallStatus::Inactive | CallStatus::Finished)
    }

    pub fn can_end(self) -> bool {
        matches!(self, CallStatus::Connecting | CallStatus::Active)
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CallStatus::Inactive => "INACTIVE",
            CallStatus::Connecting => "CONNECTING",
            CallStatus::Active => "ACTIVE",
            CallStatus::Finished => "FINISHED",
        };
        f.write_str(s)
    }
}

/// Which view the controller backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    /// Interview-creation form. No call, no feedback.
    Generate,
    /// Live call with the AI interviewer.
    Interview,
}

/// Identifiers the host passes in for a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewContext {
    pub interview_id: String,
    pub user_id: String,
    pub feedback_id: Option<String>,
}

impl InterviewContext {
    pub fn new(interview_id: &str, user_id: &str) -> Self {
        Self {
            interview_id: interview_id.to_string(),
            user_id: user_id.to_string(),
            feedback_id: None,
        }
    }

    pub fn with_feedback_id(mut self, feedback_id: &str) -> Self {
        self.feedback_id = Some(feedback_id.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot start a call while {0}")]
    CannotStart(CallStatus),
    #[error("cannot end a call while {0}")]
    CannotEnd(CallStatus),
    #[error("calls are not available in generate mode")]
    GenerateMode,
}

/// In-memory state of one mounted call view.
///
/// Pure bookkeeping: no I/O happens here. Every method that changes the
/// status reports whether it did, so the caller knows when to notify.
#[derive(Debug)]
pub struct CallSession {
    mode: AgentMode,
    status: CallStatus,
    transcript: TranscriptAccumulator,
    speaking: bool,
    // Incremented by every accepted start; identifies the current attempt.
    attempt: u64,
    // The attempt whose Finished transition already produced a feedback request.
    feedback_attempt: Option<u64>,
}

impl CallSession {
    pub fn new(mode: AgentMode) -> Self {
        Self {
            mode,
            status: CallStatus::Inactive,
            transcript: TranscriptAccumulator::new(),
            speaking: false,
            attempt: 0,
            feedback_attempt: None,
        }
    }

    pub fn mode(&self) -> AgentMode {
        self.mode
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn transcript(&self) -> &TranscriptAccumulator {
        &self.transcript
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Begins a new call attempt and moves to `Connecting`.
    pub fn begin_attempt(&mut self) -> Result<u64, TransitionError> {
        if self.mode == AgentMode::Generate {
            return Err(TransitionError::GenerateMode);
        }
        if !self.status.can_start() {
            return Err(TransitionError::CannotStart(self.status));
        }
        self.attempt += 1;
        self.status = CallStatus::Connecting;
        self.speaking = false;
        Ok(self.attempt)
    }

    /// The provider confirmed the call. Only meaningful while connecting.
    pub fn mark_active(&mut self) -> bool {
        if self.status != CallStatus::Connecting {
            return false;
        }
        self.status = CallStatus::Active;
        true
    }

    /// User-initiated end. Moves straight to `Finished` without waiting for
    /// the provider to confirm.
    pub fn request_end(&mut self) -> Result<(), TransitionError> {
        if !self.status.can_end() {
            return Err(TransitionError::CannotEnd(self.status));
        }
        self.finish();
        Ok(())
    }

    /// Ends the running attempt. A no-op when already finished or when no
    /// call was ever started.
    pub fn finish(&mut self) -> bool {
        if !self.status.can_end() {
            return false;
        }
        self.status = CallStatus::Finished;
        self.speaking = false;
        true
    }

    /// Appends finalized transcripts; everything else is ignored.
    pub fn record_message(&mut self, message: &SessionMessage) -> Option<&TranscriptMessage> {
        let event = message.final_transcript()?;
        self.transcript
            .append(TranscriptMessage::new(event.role(), event.transcript()));
        self.transcript.last()
    }

    pub fn set_speaking(&mut self, speaking: bool) -> bool {
        if self.speaking == speaking {
            return false;
        }
        self.speaking = speaking;
        true
    }

    /// Builds the feedback request for the attempt that just finished.
    ///
    /// Returns `Some` at most once per attempt, never in generate mode and
    /// never before the attempt is finished.
    pub fn take_feedback_request(&mut self, context: &InterviewContext) -> Option<FeedbackRequest> {
        if self.mode == AgentMode::Generate || self.status != CallStatus::Finished {
            return None;
        }
        if self.feedback_attempt == Some(self.attempt) {
            return None;
        }
        self.feedback_attempt = Some(self.attempt);

        let request = FeedbackRequest::new(
            &context.interview_id,
            &context.user_id,
            self.transcript.snapshot(),
        );
        Some(match &context.feedback_id {
            Some(feedback_id) => request.with_feedback_id(feedback_id),
            None => request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Role, TranscriptEvent};

    fn context() -> InterviewContext {
        InterviewContext::new("i1", "u1")
    }

    fn final_line(role: Role, text: &str) -> SessionMessage {
        SessionMessage::Transcript(TranscriptEvent::finalized(role, text))
    }

    #[test]
    fn test_full_lifecycle() {
        let mut session = CallSession::new(AgentMode::Interview);
        assert_eq!(session.status(), CallStatus::Inactive);

        assert_eq!(session.begin_attempt(), Ok(1));
        assert_eq!(session.status(), CallStatus::Connecting);

        assert!(session.mark_active());
        assert_eq!(session.status(), CallStatus::Active);

        assert!(session.finish());
        assert_eq!(session.status(), CallStatus::Finished);

        // Restart from Finished.
        assert_eq!(session.begin_attempt(), Ok(2));
        assert_eq!(session.status(), CallStatus::Connecting);
    }

    #[test]
    fn test_start_rejected_while_running() {
        let mut session = CallSession::new(AgentMode::Interview);
        session.begin_attempt().unwrap();
        assert_eq!(
            session.begin_attempt(),
            Err(TransitionError::CannotStart(CallStatus::Connecting))
        );
        session.mark_active();
        assert_eq!(
            session.begin_attempt(),
            Err(TransitionError::CannotStart(CallStatus::Active))
        );
        assert_eq!(session.attempt(), 1);
    }

    #[test]
    fn test_end_is_immediate_from_connecting_and_active() {
        let mut session = CallSession::new(AgentMode::Interview);
        session.begin_attempt().unwrap();
        session.request_end().unwrap();
        assert_eq!(session.status(), CallStatus::Finished);

        session.begin_attempt().unwrap();
        session.mark_active();
        session.request_end().unwrap();
        assert_eq!(session.status(), CallStatus::Finished);
    }

    #[test]
    fn test_end_rejected_when_not_running() {
        let mut session = CallSession::new(AgentMode::Interview);
        assert_eq!(
            session.request_end(),
            Err(TransitionError::CannotEnd(CallStatus::Inactive))
        );
        session.begin_attempt().unwrap();
        session.finish();
        assert_eq!(
            session.request_end(),
            Err(TransitionError::CannotEnd(CallStatus::Finished))
        );
    }

    #[test]
    fn test_finish_is_idempotent_and_ignores_inactive() {
        let mut session = CallSession::new(AgentMode::Interview);
        assert!(!session.finish());
        assert_eq!(session.status(), CallStatus::Inactive);

        session.begin_attempt().unwrap();
        assert!(session.finish());
        assert!(!session.finish());
        assert_eq!(session.status(), CallStatus::Finished);
    }

    #[test]
    fn test_late_call_start_does_not_reopen_finished_call() {
        let mut session = CallSession::new(AgentMode::Interview);
        session.begin_attempt().unwrap();
        session.request_end().unwrap();
        assert!(!session.mark_active());
        assert_eq!(session.status(), CallStatus::Finished);
    }

    #[test]
    fn test_only_final_transcripts_are_recorded() {
        let mut session = CallSession::new(AgentMode::Interview);
        let events = vec![
            SessionMessage::Transcript(TranscriptEvent::partial(Role::Assistant, "Hel")),
            final_line(Role::Assistant, "Hello there."),
            SessionMessage::Other,
            SessionMessage::Transcript(TranscriptEvent::partial(Role::User, "I")),
            final_line(Role::User, "I am ready."),
        ];
        for event in &events {
            session.record_message(event);
        }

        let recorded: Vec<(Role, &str)> = session
            .transcript()
            .entries()
            .iter()
            .map(|m| (m.role(), m.content()))
            .collect();
        assert_eq!(
            recorded,
            vec![(Role::Assistant, "Hello there."), (Role::User, "I am ready.")]
        );
        assert_eq!(session.transcript().latest(), "I am ready.");
    }

    #[test]
    fn test_feedback_request_once_per_attempt() {
        let mut session = CallSession::new(AgentMode::Interview);
        assert!(session.take_feedback_request(&context()).is_none());

        session.begin_attempt().unwrap();
        session.record_message(&final_line(Role::User, "Closures capture variables."));
        assert!(session.take_feedback_request(&context()).is_none());

        session.request_end().unwrap();
        let request = session.take_feedback_request(&context()).expect("request");
        assert_eq!(request.interview_id(), "i1");
        assert_eq!(request.user_id(), "u1");
        assert_eq!(request.transcript().len(), 1);
        assert_eq!(request.feedback_id(), None);

        // Same Finished transition, unchanged or grown transcript: nothing new.
        assert!(session.take_feedback_request(&context()).is_none());
        session.record_message(&final_line(Role::Assistant, "Thanks!"));
        assert!(session.take_feedback_request(&context()).is_none());

        // A new attempt gets its own handoff.
        session.begin_attempt().unwrap();
        session.finish();
        let request = session.take_feedback_request(&context()).expect("second request");
        assert_eq!(request.transcript().len(), 2);
    }

    #[test]
    fn test_empty_transcript_is_forwarded_with_feedback_id() {
        let mut session = CallSession::new(AgentMode::Interview);
        session.begin_attempt().unwrap();
        session.request_end().unwrap();
        let request = session
            .take_feedback_request(&context().with_feedback_id("f0"))
            .expect("request");
        assert!(request.transcript().is_empty());
        assert_eq!(request.feedback_id(), Some("f0"));
    }

    #[test]
    fn test_generate_mode_never_calls() {
        let mut session = CallSession::new(AgentMode::Generate);
        assert_eq!(session.begin_attempt(), Err(TransitionError::GenerateMode));
        assert!(session.take_feedback_request(&context()).is_none());
    }

    #[test]
    fn test_speaking_resets_when_call_finishes() {
        let mut session = CallSession::new(AgentMode::Interview);
        session.begin_attempt().unwrap();
        session.mark_active();
        assert!(session.set_speaking(true));
        assert!(!session.set_speaking(true));
        session.finish();
        assert!(!session.is_speaking());
    }
}
