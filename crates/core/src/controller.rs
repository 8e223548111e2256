use crate::gateway::{FeedbackGateway, GatewayError};
use crate::generic_types::{SessionEvent, SessionStartConfig};
use crate::route::Route;
use crate::session_state::{AgentMode, CallSession, CallStatus, InterviewContext, TransitionError};
use crate::transcript::TranscriptAccumulator;
use crate::types::{Assistant, FeedbackResponse};
use crate::voice_session::{ListenerScope, VoiceSession};
use crate::{Command, Input};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a call may stay open after a session error without a call-end.
pub const DEFAULT_ERROR_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("host stopped receiving commands")]
    HostClosed,
}

/// What the host supplies when mounting a controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub mode: AgentMode,
    pub context: InterviewContext,
    pub questions: Vec<String>,
    pub assistant: Assistant,
    /// `None` leaves a call open after an error until the session ends it.
    pub error_grace: Option<Duration>,
}

impl ControllerConfig {
    pub fn interview(context: InterviewContext, assistant: Assistant) -> Self {
        Self {
            mode: AgentMode::Interview,
            context,
            questions: Vec::new(),
            assistant,
            error_grace: Some(DEFAULT_ERROR_GRACE),
        }
    }

    pub fn generate(user_id: &str) -> Self {
        Self {
            mode: AgentMode::Generate,
            context: InterviewContext::new("", user_id),
            questions: Vec::new(),
            assistant: Assistant::builder().build(),
            error_grace: None,
        }
    }

    pub fn with_questions(mut self, questions: Vec<String>) -> Self {
        self.questions = questions;
        self
    }

    pub fn with_error_grace(mut self, error_grace: Option<Duration>) -> Self {
        self.error_grace = error_grace;
        self
    }
}

/// Drives one call view: status, transcript and the feedback handoff.
///
/// All state changes happen on the task that runs [`CallController::run`].
/// Session callbacks only forward events into a channel, and the feedback
/// request runs on its own task whose result comes back through another
/// channel. Dropping the controller detaches its listeners and cancels any
/// feedback request still in flight.
pub struct CallController {
    session: CallSession,
    context: InterviewContext,
    questions: Vec<String>,
    assistant: Assistant,
    error_grace: Option<Duration>,
    error_deadline: Option<Instant>,
    voice: Arc<dyn VoiceSession>,
    feedback: Arc<dyn FeedbackGateway>,
    command_tx: mpsc::Sender<Command>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    listeners: ListenerScope,
    feedback_tx: mpsc::Sender<(u64, Route)>,
    feedback_rx: mpsc::Receiver<(u64, Route)>,
    feedback_task: Option<JoinHandle<()>>,
}

impl CallController {
    /// Creates the controller and, in interview mode, attaches its listeners.
    pub fn mount(
        config: ControllerConfig,
        voice: Arc<dyn VoiceSession>,
        feedback: Arc<dyn FeedbackGateway>,
        command_tx: mpsc::Sender<Command>,
    ) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        let listeners = match config.mode {
            AgentMode::Interview => ListenerScope::attach(voice.clone(), events_tx),
            AgentMode::Generate => ListenerScope::detached(),
        };
        let (feedback_tx, feedback_rx) = mpsc::channel(4);
        tracing::info!("call controller mounted in {:?} mode", config.mode);

        Self {
            session: CallSession::new(config.mode),
            context: config.context,
            questions: config.questions,
            assistant: config.assistant,
            error_grace: config.error_grace,
            error_deadline: None,
            voice,
            feedback,
            command_tx,
            events,
            listeners,
            feedback_tx,
            feedback_rx,
            feedback_task: None,
        }
    }

    pub fn status(&self) -> CallStatus {
        self.session.status()
    }

    pub fn transcript(&self) -> &TranscriptAccumulator {
        self.session.transcript()
    }

    pub fn is_speaking(&self) -> bool {
        self.session.is_speaking()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn feedback_in_flight(&self) -> bool {
        self.feedback_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Processes user input, session events and feedback results until the
    /// host unmounts the view or drops its input sender.
    pub async fn run(mut self, mut input_rx: mpsc::Receiver<Input>) -> Result<(), ControllerError> {
        let result = self.event_loop(&mut input_rx).await;
        self.unmount();
        result
    }

    async fn event_loop(&mut self, input_rx: &mut mpsc::Receiver<Input>) -> Result<(), ControllerError> {
        loop {
            tokio::select! {
                Some(event) = self.events.recv() => self.handle_session_event(event).await?,
                Some((attempt, route)) = self.feedback_rx.recv() => {
                    self.handle_feedback_route(attempt, route).await?
                }
                _ = deadline_elapsed(self.error_deadline) => self.expire_error_grace().await?,
                input = input_rx.recv() => match input {
                    Some(Input::StartCall) => tolerate_rejection(self.start_call().await)?,
                    Some(Input::EndCall) => tolerate_rejection(self.end_call().await)?,
                    Some(Input::Unmount) | None => return Ok(()),
                },
            }
        }
    }

    /// Starts a new call attempt with the configured questions.
    pub async fn start_call(&mut self) -> Result<(), ControllerError> {
        let attempt = self.session.begin_attempt()?;
        self.error_deadline = None;
        tracing::info!(attempt, "starting call");
        self.notify(Command::StatusChanged(CallStatus::Connecting))
            .await?;

        let config =
            SessionStartConfig::new(self.assistant.clone()).with_questions(&self.questions);
        if let Err(e) = self.voice.start(config).await {
            // Same path as an error event: the grace timer decides when to give up.
            tracing::error!("voice session failed to start: {:?}", e);
            self.arm_error_grace();
        }
        Ok(())
    }

    /// Ends the call. The status is `Finished` before the session is asked to
    /// stop, so the view updates without waiting for the provider.
    pub async fn end_call(&mut self) -> Result<(), ControllerError> {
        let was_speaking = self.session.is_speaking();
        self.session.request_end()?;
        self.error_deadline = None;
        tracing::info!(attempt = self.session.attempt(), "call ended by user");
        self.notify_finished(was_speaking).await?;

        if let Err(e) = self.voice.stop().await {
            tracing::warn!("failed to stop voice session: {:?}", e);
        }
        self.hand_off_feedback();
        Ok(())
    }

    pub async fn handle_session_event(&mut self, event: SessionEvent) -> Result<(), ControllerError> {
        match event {
            SessionEvent::CallStart => {
                if self.session.mark_active() {
                    tracing::info!(attempt = self.session.attempt(), "call started");
                    self.notify(Command::StatusChanged(CallStatus::Active))
                        .await?;
                } else {
                    tracing::debug!("ignoring call-start while {}", self.session.status());
                }
            }
            SessionEvent::CallEnd => self.finish_call("call ended by session").await?,
            SessionEvent::Message(message) => {
                if let Some(entry) = self.session.record_message(&message) {
                    let latest = entry.content().to_string();
                    tracing::debug!("{:?} said: {:?}", entry.role(), latest);
                    self.notify(Command::ShowTranscript(latest)).await?;
                }
            }
            SessionEvent::SpeechStart => self.set_speaking(true).await?,
            SessionEvent::SpeechEnd => self.set_speaking(false).await?,
            SessionEvent::Error(message) => {
                tracing::error!("voice session error: {}", message);
                self.arm_error_grace();
            }
        }
        Ok(())
    }

    async fn set_speaking(&mut self, speaking: bool) -> Result<(), ControllerError> {
        if self.session.set_speaking(speaking) {
            self.notify(Command::SpeakingChanged(speaking)).await?;
        }
        Ok(())
    }

    async fn finish_call(&mut self, reason: &str) -> Result<(), ControllerError> {
        let was_speaking = self.session.is_speaking();
        if !self.session.finish() {
            tracing::debug!("{} while {}, nothing to finish", reason, self.session.status());
            return Ok(());
        }
        self.error_deadline = None;
        tracing::info!(attempt = self.session.attempt(), "{}", reason);
        self.notify_finished(was_speaking).await?;
        self.hand_off_feedback();
        Ok(())
    }

    async fn notify_finished(&mut self, was_speaking: bool) -> Result<(), ControllerError> {
        if was_speaking {
            self.notify(Command::SpeakingChanged(false)).await?;
        }
        self.notify(Command::StatusChanged(CallStatus::Finished))
            .await
    }

    fn arm_error_grace(&mut self) {
        if !self.session.status().can_end() || self.error_deadline.is_some() {
            return;
        }
        let Some(grace) = self.error_grace else {
            return;
        };
        match Instant::now().checked_add(grace) {
            Some(deadline) => self.error_deadline = Some(deadline),
            None => tracing::warn!("error grace of {:?} is out of range, not arming it", grace),
        }
    }

    async fn expire_error_grace(&mut self) -> Result<(), ControllerError> {
        self.error_deadline = None;
        if !self.session.status().can_end() {
            return Ok(());
        }
        tracing::warn!("no call-end after session error, forcing the call to finish");
        if let Err(e) = self.voice.stop().await {
            tracing::warn!("failed to stop voice session: {:?}", e);
        }
        self.finish_call("call finished after session error").await
    }

    fn hand_off_feedback(&mut self) {
        let Some(request) = self.session.take_feedback_request(&self.context) else {
            return;
        };
        if let Some(previous) = self.feedback_task.take() {
            previous.abort();
        }
        tracing::info!(
            transcript_len = request.transcript().len(),
            "requesting feedback for interview {}",
            request.interview_id()
        );

        let gateway = self.feedback.clone();
        let tx = self.feedback_tx.clone();
        let interview_id = self.context.interview_id.clone();
        let attempt = self.session.attempt();
        self.feedback_task = Some(tokio::spawn(async move {
            let route = route_for_feedback(&interview_id, gateway.create_feedback(request).await);
            if tx.send((attempt, route)).await.is_err() {
                tracing::debug!("controller gone before feedback completed");
            }
        }));
    }

    /// Navigates with a finished feedback request's route, unless a newer
    /// attempt has started since that request was made.
    async fn handle_feedback_route(&mut self, attempt: u64, route: Route) -> Result<(), ControllerError> {
        if attempt != self.session.attempt() {
            tracing::debug!(
                attempt,
                current = self.session.attempt(),
                "dropping feedback route {} from an earlier attempt",
                route
            );
            return Ok(());
        }
        self.navigate(route).await
    }

    async fn navigate(&mut self, route: Route) -> Result<(), ControllerError> {
        self.feedback_task = None;
        tracing::info!("navigating to {}", route);
        self.notify(Command::Navigate(route)).await
    }

    async fn notify(&self, command: Command) -> Result<(), ControllerError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| ControllerError::HostClosed)
    }

    fn unmount(&mut self) {
        if let Some(task) = self.feedback_task.take() {
            task.abort();
            tracing::info!("cancelled feedback request on unmount");
        }
        self.listeners = ListenerScope::detached();
        tracing::info!("call controller unmounted");
    }
}

impl Drop for CallController {
    fn drop(&mut self) {
        if let Some(task) = self.feedback_task.take() {
            task.abort();
        }
    }
}

/// Maps the feedback call's outcome to where the user goes next.
pub fn route_for_feedback(
    interview_id: &str,
    outcome: Result<FeedbackResponse, GatewayError>,
) -> Route {
    match outcome {
        Ok(response) if response.success() && response.feedback_id().is_some() => {
            Route::feedback(interview_id)
        }
        Ok(_) => {
            tracing::warn!("feedback was not created for interview {}", interview_id);
            Route::Home
        }
        Err(e) => {
            tracing::warn!("error saving feedback: {}", e);
            Route::Home
        }
    }
}

async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// Invalid user actions are logged and dropped; only a vanished host stops the loop.
fn tolerate_rejection(result: Result<(), ControllerError>) -> Result<(), ControllerError> {
    match result {
        Err(ControllerError::Transition(e)) => {
            tracing::warn!("ignoring user action: {}", e);
            Ok(())
        }
        other => other,
    }
}
