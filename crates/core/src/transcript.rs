use crate::types::TranscriptMessage;

/// Append-only record of the finalized lines of a call.
///
/// Entries keep the order they were appended in and are never removed; the
/// whole accumulator is dropped together with its controller.
#[derive(Debug, Clone, Default)]
pub struct TranscriptAccumulator {
    entries: Vec<TranscriptMessage>,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: TranscriptMessage) {
        self.entries.push(message);
    }

    /// Content of the most recent entry, or `""` when nothing was said yet.
    pub fn latest(&self) -> &str {
        self.entries.last().map_or("", |m| m.content())
    }

    pub fn last(&self) -> Option<&TranscriptMessage> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[TranscriptMessage] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<TranscriptMessage> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
