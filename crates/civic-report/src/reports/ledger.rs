//! Append-only update trail attached to each report.
//!
//! Entries are never edited or removed once appended; insertion order is
//! chronological order, so the latest update is always the last element.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author recorded on entries generated by the service itself.
pub const SYSTEM_AUTHOR: &str = "System";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    System,
    Comment,
    StatusChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEntry {
    pub id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub kind: UpdateKind,
}

static UPDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_update_id() -> String {
    let id = UPDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("upd-{id:06}")
}

impl UpdateEntry {
    pub fn system(message: impl Into<String>) -> Self {
        Self::stamped(message, SYSTEM_AUTHOR, UpdateKind::System)
    }

    pub fn status_change(message: impl Into<String>) -> Self {
        Self::stamped(message, SYSTEM_AUTHOR, UpdateKind::StatusChange)
    }

    pub fn comment(message: impl Into<String>, author: impl Into<String>) -> Self {
        Self::stamped(message, author, UpdateKind::Comment)
    }

    fn stamped(message: impl Into<String>, author: impl Into<String>, kind: UpdateKind) -> Self {
        Self {
            id: next_update_id(),
            message: message.into(),
            timestamp: Utc::now(),
            author: author.into(),
            kind,
        }
    }
}

/// The ledger exposes append and read access only; there is no surface for
/// editing or removing an entry once it is in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateLedger {
    entries: Vec<UpdateEntry>,
}

impl UpdateLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: UpdateEntry) {
        self.entries.push(entry);
    }

    /// Last element, i.e. the most recent update.
    pub fn latest(&self) -> Option<&UpdateEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[UpdateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_existing_prefix() {
        let mut ledger = UpdateLedger::new();
        ledger.append(UpdateEntry::comment("first", "Jane"));
        let snapshot: Vec<UpdateEntry> = ledger.entries().to_vec();

        ledger.append(UpdateEntry::system("second"));

        assert_eq!(ledger.len(), 2);
        assert_eq!(&ledger.entries()[..1], snapshot.as_slice());
    }

    #[test]
    fn latest_returns_most_recent_entry() {
        let mut ledger = UpdateLedger::new();
        assert!(ledger.latest().is_none());

        for n in 1..=5 {
            ledger.append(UpdateEntry::comment(format!("note {n}"), "Jane"));
        }

        let latest = ledger.latest().expect("ledger has entries");
        assert_eq!(latest.message, "note 5");
    }

    #[test]
    fn entry_constructors_set_kind_and_author() {
        let system = UpdateEntry::system("dispatched");
        assert_eq!(system.kind, UpdateKind::System);
        assert_eq!(system.author, SYSTEM_AUTHOR);

        let comment = UpdateEntry::comment("thanks", "John Doe");
        assert_eq!(comment.kind, UpdateKind::Comment);
        assert_eq!(comment.author, "John Doe");
    }
}
