use bytes::Bytes;

/// A single applied write. On any one node the sequence of entries is
/// contiguous and strictly increasing by 1 starting at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub index: i64,
    pub key: String,
    pub value: Bytes,
}

/// ReplicationLog is an append only log of the writes a node has applied, in
/// application order. Masters append to it on every Put; replicas pull from
/// their master's log to catch up. Entries are never mutated or removed.
pub struct ReplicationLog {
    entries: Vec<LogEntry>,
}

impl ReplicationLog {
    pub fn new() -> Self {
        ReplicationLog { entries: Vec::new() }
    }

    /// The index the next appended entry will receive.
    pub fn next_index(&self) -> i64 {
        self.entries.len() as i64
    }

    pub fn append(&mut self, key: String, value: Bytes) -> &LogEntry {
        let entry = LogEntry {
            index: self.next_index(),
            key,
            value,
        };
        self.entries.push(entry);

        // Just pushed, cannot be empty.
        self.entries.last().unwrap()
    }

    /// Returns the entry following `after_index`, or None if the caller is
    /// caught up (a normal condition, not a fault).
    pub fn entry_after(&self, after_index: i64) -> Option<&LogEntry> {
        let position = after_index.checked_add(1)?;
        if position < 0 {
            return None;
        }
        self.entries.get(position as usize)
    }

    /// The most recently appended entry, or None if nothing has been written.
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn appended_entries_are_contiguous_from_zero() {
        let mut log = ReplicationLog::new();
        for i in 0..5 {
            let entry = log.append(format!("key-{}", i), value("v"));
            assert_eq!(entry.index, i);
        }
        assert_eq!(log.next_index(), 5);
    }

    #[test]
    fn entry_after_walks_the_log_in_order() {
        let mut log = ReplicationLog::new();
        log.append("foo".to_string(), value("v0"));
        log.append("foo".to_string(), value("v1"));

        // Same key written twice still occupies two log positions.
        let first = log.entry_after(-1).unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.value, value("v0"));

        let second = log.entry_after(0).unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.value, value("v1"));

        assert!(log.entry_after(1).is_none());
    }

    #[test]
    fn entry_after_handles_out_of_range_cursors() {
        let mut log = ReplicationLog::new();
        log.append("k".to_string(), value("v"));

        assert!(log.entry_after(50).is_none());
        assert!(log.entry_after(i64::MAX).is_none());
        assert!(log.entry_after(-10).is_none());
    }

    #[test]
    fn last_is_none_until_first_append() {
        let mut log = ReplicationLog::new();
        assert!(log.last().is_none());

        log.append("k".to_string(), value("v"));
        assert_eq!(log.last().unwrap().index, 0);
    }
}
