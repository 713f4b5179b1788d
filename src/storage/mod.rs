mod kv;
mod log;

pub use kv::InMemoryStore;
pub use kv::KeyValueStore;
pub use log::LogEntry;
pub use log::ReplicationLog;
