use chrono::{DateTime, Local};
use std::collections::VecDeque;

const MAX_ENTRIES: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    /// `[HH:MM:SS] message`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// User-visible session log, mirrored to tracing.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    entries: VecDeque<LogEntry>,
}

impl SessionLog {
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "ripforge::session", "{}", message);
        if self.entries.len() == MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            timestamp: Local::now(),
            message,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The last `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn last_message(&self) -> Option<&str> {
        self.entries.back().map(|e| e.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_returns_newest_in_order() {
        let mut log = SessionLog::default();
        for i in 0..5 {
            log.push(format!("line {i}"));
        }
        let tail: Vec<&str> = log.tail(2).map(|e| e.message.as_str()).collect();
        assert_eq!(tail, vec!["line 3", "line 4"]);
        assert_eq!(log.tail(10).count(), 5);
    }

    #[test]
    fn oldest_entries_are_dropped() {
        let mut log = SessionLog::default();
        for i in 0..MAX_ENTRIES + 3 {
            log.push(format!("{i}"));
        }
        assert_eq!(log.len(), MAX_ENTRIES);
        assert_eq!(log.entries().next().map(|e| e.message.as_str()), Some("3"));
    }

    #[test]
    fn rendered_entry_has_timestamp() {
        let mut log = SessionLog::default();
        log.push("hello");
        let line = log.entries().next().unwrap().render();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] hello"));
        assert_eq!(line.len(), "[00:00:00] hello".len());
    }
}
