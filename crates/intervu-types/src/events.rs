pub mod client;
pub mod server;

use client::*;
use server::*;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "start")]
    Start(StartEvent),
    #[serde(rename = "stop")]
    Stop(StopEvent),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Synthesized locally when the socket closes; never sent by the server.
    #[serde(rename = "close")]
    Close {
        reason: Option<String>,
    },
    #[serde(rename = "call-start")]
    CallStart(CallStartEvent),
    #[serde(rename = "call-end")]
    CallEnd(CallEndEvent),
    #[serde(rename = "speech-start")]
    SpeechStart,
    #[serde(rename = "speech-end")]
    SpeechEnd,
    #[serde(rename = "message")]
    Message(MessageEvent),
    #[serde(rename = "error")]
    Error(ErrorEvent),
    /// Any event type this client does not act on, ex: "status-update".
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Close { .. } => "close",
            ServerEvent::CallStart(_) => "call-start",
            ServerEvent::CallEnd(_) => "call-end",
            ServerEvent::SpeechStart => "speech-start",
            ServerEvent::SpeechEnd => "speech-end",
            ServerEvent::Message(_) => "message",
            ServerEvent::Error(_) => "error",
            ServerEvent::Unknown => "unknown",
        }
    }
}
