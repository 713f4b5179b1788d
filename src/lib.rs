mod server;
mod shard;
mod storage;
mod topology;
mod wiring;
mod grpc {
    include!("../generated/shardkv.rs");
}

pub use server::SHARD_HEADER_NAME;
pub use topology::ClusterFile;
pub use topology::NodeEntry;
pub use topology::NodeInfo;
pub use topology::ShardEntry;
pub use topology::ShardInfo;
pub use topology::Topology;
pub use topology::TopologyError;
pub use wiring::try_start_node;
pub use wiring::NodeHandle;
pub use wiring::NodeOptions;
pub use wiring::NodeStartConfig;
pub use wiring::NodeStartError;
