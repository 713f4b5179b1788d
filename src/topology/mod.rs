mod file;
mod router;

pub use file::ClusterFile;
pub use file::ClusterFileError;
pub use file::NodeEntry;
pub use file::ShardEntry;
pub use router::NodeInfo;
pub use router::ShardInfo;
pub use router::Topology;
pub use router::TopologyError;
