use bytes::Bytes;
use std::collections::HashMap;
use std::io;

/// KeyValueStore is the single-node storage engine under a shard service.
/// The distribution layer only requires it to preserve previously-written
/// values until they are overwritten; last write wins per key.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<Bytes>, io::Error>;

    fn put(&mut self, key: &str, value: Bytes) -> Result<(), io::Error>;
}

// The real system would back this with a persistent embedded store. Routing,
// dispatch and replication don't care, so we model it in memory.
pub struct InMemoryStore {
    data: HashMap<String, Bytes>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore { data: HashMap::new() }
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Bytes>, io::Error> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Bytes) -> Result<(), io::Error> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_last_written_value() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.put("k", Bytes::from_static(b"v1")).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(Bytes::from_static(b"v1")));

        store.put("k", Bytes::from_static(b"v2")).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(Bytes::from_static(b"v2")));
    }
}
