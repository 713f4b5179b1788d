mod peer_client;
mod replication;
mod service;

pub use peer_client::ConnectError;
pub use peer_client::RemotePutError;
pub use peer_client::ShardClientPool;
pub use replication::ReplicationLoopHandle;
pub use service::ApplyError;
pub use service::PutError;
pub use service::ShardService;
