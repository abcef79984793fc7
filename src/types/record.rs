use crate::types::Position;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Payload encoding of a custom-field segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Encoding {
    Text,
    Binary,
}

/// One decoded message from a message file
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecodedMessage {
    /// 1-based line number in the source file
    pub line_number: usize,
    pub form: String,
    pub position: Position,
}

/// A message that failed to decode, kept for reporting
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FailedMessage {
    pub line_number: usize,
    pub error: String,
}

/// All messages decoded from a single file
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageFile {
    pub filename: String,
    pub encoding: Encoding,
    pub messages: Vec<DecodedMessage>,
    pub failures: Vec<FailedMessage>,
}

impl MessageFile {
    pub fn new(filename: String, encoding: Encoding) -> Self {
        Self {
            filename,
            encoding,
            messages: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn add_message(&mut self, message: DecodedMessage) {
        self.messages.push(message);
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Check if any message carried network information
    pub fn has_network_data(&self) -> bool {
        self.messages.iter().any(|m| m.position.network.is_some())
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.messages.iter().map(|m| &m.position)
    }
}
