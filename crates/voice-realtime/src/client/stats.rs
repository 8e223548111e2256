use crate::types::{ServerEvent, SessionMessage};

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    events_received: u64,
    final_transcripts: u64,
    errors: u64,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, event: &ServerEvent) {
        self.events_received += 1;
        match event {
            ServerEvent::Message(message) => {
                if let SessionMessage::Transcript(transcript) = message.message() {
                    if transcript.is_final() {
                        self.final_transcripts += 1;
                    }
                }
            }
            ServerEvent::Error(_) => self.errors += 1,
            _ => {}
        }
    }

    pub fn events_received(&self) -> u64 {
        self.events_received
    }

    pub fn final_transcripts(&self) -> u64 {
        self.final_transcripts
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }
}
