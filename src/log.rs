//! Player-facing message log.
//!
//! Every subsystem reports outcomes here instead of returning errors: a failed
//! craft, an unpaid upkeep bill and a lethal hit all become log lines. Entries
//! are mirrored to `tracing` so a headless run can be followed from the
//! terminal.

use crate::core::constants::LOG_CAPACITY;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTopic {
    Combat,
    Event,
    Story,
    Farming,
    Followers,
    Home,
}

impl LogTopic {
    pub fn name(&self) -> &'static str {
        match self {
            LogTopic::Combat => "combat",
            LogTopic::Event => "event",
            LogTopic::Story => "story",
            LogTopic::Farming => "farming",
            LogTopic::Followers => "followers",
            LogTopic::Home => "home",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub topic: LogTopic,
    pub message: String,
    /// Injuries are rendered differently by the UI.
    pub injury: bool,
}

#[derive(Debug, Clone)]
pub struct LogService {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogService {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

impl LogService {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(LOG_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    /// Records a message. Never fails; the oldest entry is dropped when full.
    pub fn log(&mut self, topic: LogTopic, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(topic = topic.name(), "{}", message);
        self.push(LogEntry {
            topic,
            message,
            injury: false,
        });
    }

    /// Records a message describing harm done to the player.
    pub fn injury(&mut self, topic: LogTopic, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(topic = topic.name(), injury = true, "{}", message);
        self.push(LogEntry {
            topic,
            message,
            injury: true,
        });
    }

    fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The most recent `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .skip(self.entries.len().saturating_sub(count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True if any entry contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}
