use crate::storage::{KeyValueStore, LogEntry, ReplicationLog};
use bytes::Bytes;
use std::io;
use std::sync::Mutex;

/// ShardService is a node's local execution of reads and writes. It is
/// invoked directly by the local dispatcher, over RPC by dispatchers on other
/// nodes, and over RPC by replicas pulling this node's log.
///
/// Each instance exclusively owns its store and log, so multiple nodes can
/// coexist in one process (which is how the integration tests run a whole
/// cluster in a single binary).
pub struct ShardService {
    logger: slog::Logger,
    is_replica: bool,
    state: Mutex<NodeState>,
}

// Store and log live under one lock: a reader must never observe a log append
// without the corresponding store write, or vice versa.
struct NodeState {
    store: Box<dyn KeyValueStore>,
    log: ReplicationLog,
}

#[derive(Debug, thiserror::Error)]
pub enum PutError {
    #[error("shard node is read-only")]
    ReadOnly,
    #[error("store write failed: {0}")]
    Store(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("non-contiguous log entry: expected index {expected}, got {actual}")]
    NonContiguous { expected: i64, actual: i64 },
    #[error("store write failed: {0}")]
    Store(#[from] io::Error),
}

impl ShardService {
    pub fn new(logger: slog::Logger, store: Box<dyn KeyValueStore>, is_replica: bool) -> Self {
        ShardService {
            logger,
            is_replica,
            state: Mutex::new(NodeState {
                store,
                log: ReplicationLog::new(),
            }),
        }
    }

    /// Reads never mutate state and are permitted regardless of role.
    pub fn get(&self, key: &str) -> Result<Option<Bytes>, io::Error> {
        let state = self.lock_state();
        state.store.get(key)
    }

    /// Writes the value and appends the matching log entry as one critical
    /// section. Only masters accept writes; replicas mutate state exclusively
    /// through [`ShardService::apply_log_entry`].
    pub fn put(&self, key: &str, value: Bytes) -> Result<i64, PutError> {
        if self.is_replica {
            return Err(PutError::ReadOnly);
        }

        let mut state = self.lock_state();
        state.store.put(key, value.clone())?;
        let entry = state.log.append(key.to_string(), value);
        let index = entry.index;
        slog::debug!(self.logger, "Appended log entry {} for key '{}'", index, key);

        Ok(index)
    }

    /// Log export for replicas: the entry after `after_index`, or None when
    /// the caller is caught up.
    pub fn next_log_entry(&self, after_index: i64) -> Option<LogEntry> {
        let state = self.lock_state();
        state.log.entry_after(after_index).cloned()
    }

    /// The most recently appended entry, used by a replica at startup to
    /// discover where to resume replication.
    pub fn last_log_entry(&self) -> Option<LogEntry> {
        let state = self.lock_state();
        state.log.last().cloned()
    }

    /// The one path allowed to mutate a replica: applies an entry pulled from
    /// the shard master, keeping store and log in lockstep. Rejects entries
    /// that would create a gap.
    pub fn apply_log_entry(&self, entry: LogEntry) -> Result<(), ApplyError> {
        let mut state = self.lock_state();

        let expected = state.log.next_index();
        if entry.index != expected {
            return Err(ApplyError::NonContiguous {
                expected,
                actual: entry.index,
            });
        }

        state.store.put(&entry.key, entry.value.clone())?;
        state.log.append(entry.key, entry.value);
        Ok(())
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, NodeState> {
        self.state.lock().expect("shard state lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    fn master() -> ShardService {
        ShardService::new(test_logger(), Box::new(InMemoryStore::new()), false)
    }

    fn replica() -> ShardService {
        ShardService::new(test_logger(), Box::new(InMemoryStore::new()), true)
    }

    fn test_logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    fn value(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn put_then_get_roundtrip() {
        let service = master();
        service.put("foo", value("bar")).unwrap();
        assert_eq!(service.get("foo").unwrap(), Some(value("bar")));
        assert_eq!(service.get("missing").unwrap(), None);
    }

    #[test]
    fn puts_produce_contiguous_log_indices() {
        let service = master();
        for i in 0..4 {
            let index = service.put("k", value("v")).unwrap();
            assert_eq!(index, i);
        }
        assert_eq!(service.last_log_entry().unwrap().index, 3);
    }

    #[test]
    fn replica_rejects_put_and_stays_unchanged() {
        let service = replica();

        let result = service.put("foo", value("bar"));
        assert!(matches!(result, Err(PutError::ReadOnly)));

        assert_eq!(service.get("foo").unwrap(), None);
        assert!(service.last_log_entry().is_none());
    }

    #[test]
    fn log_export_walks_entries_in_order() {
        let service = master();
        service.put("foo", value("v0")).unwrap();
        service.put("foo", value("v1")).unwrap();

        assert_eq!(service.next_log_entry(-1).unwrap().index, 0);
        assert_eq!(service.next_log_entry(0).unwrap().index, 1);
        assert!(service.next_log_entry(1).is_none());
    }

    #[test]
    fn last_log_entry_is_none_for_empty_log() {
        assert!(master().last_log_entry().is_none());
    }

    #[test]
    fn apply_log_entry_mirrors_master_write() {
        let service = replica();

        service
            .apply_log_entry(LogEntry {
                index: 0,
                key: "foo".to_string(),
                value: value("bar"),
            })
            .unwrap();

        assert_eq!(service.get("foo").unwrap(), Some(value("bar")));
        assert_eq!(service.last_log_entry().unwrap().index, 0);
    }

    #[test]
    fn apply_log_entry_rejects_gaps() {
        let service = replica();

        let result = service.apply_log_entry(LogEntry {
            index: 5,
            key: "foo".to_string(),
            value: value("bar"),
        });

        assert!(matches!(
            result,
            Err(ApplyError::NonContiguous { expected: 0, actual: 5 })
        ));
        assert_eq!(service.get("foo").unwrap(), None);
    }
}
