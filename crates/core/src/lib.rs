pub mod controller;
pub mod gateway;
pub mod generate;
pub mod generic_types;
pub mod route;
pub mod session_state;
pub mod transcript;
pub mod voice_session;

pub use intervu_types as types;

use route::Route;
use session_state::CallStatus;

/// Represents commands that the core logic issues to the host (the UI shell).
///
/// This enum decouples the controller's decisions from how the host renders
/// state or follows navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The call moved to a new status.
    StatusChanged(CallStatus),
    /// A finalized transcript line arrived; carries the latest line for display.
    ShowTranscript(String),
    /// The interviewer started or stopped speaking.
    SpeakingChanged(bool),
    /// Leave the current view.
    Navigate(Route),
    /// Show a blocking alert to the user.
    Alert(String),
}

/// User actions the host forwards to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    StartCall,
    EndCall,
    /// The view is going away; tear the controller down.
    Unmount,
}
