use crate::topology::file::{ClusterFile, ClusterFileError, NodeEntry};
use std::collections::HashSet;
use std::path::Path;

/// A single node of the cluster, as described by the topology file. Identity
/// is `name`. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub shard_index: usize,
    pub is_replica: bool,
    pub name: String,
    pub host: String,
    pub http_port: u16,
    pub rpc_port: u16,
}

impl NodeInfo {
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    pub fn rpc_addr(&self) -> String {
        format!("{}:{}", self.host, self.rpc_port)
    }

    fn from_entry(entry: &NodeEntry, shard_index: usize, is_replica: bool) -> Self {
        NodeInfo {
            shard_index,
            is_replica,
            name: entry.name.clone(),
            host: entry.host.clone(),
            http_port: entry.http_port,
            rpc_port: entry.rpc_port,
        }
    }
}

/// One partition of the keyspace: exactly one master plus zero or more
/// read-only replicas.
#[derive(Debug, Clone)]
pub struct ShardInfo {
    master: NodeInfo,
    replicas: Vec<NodeInfo>,
}

impl ShardInfo {
    pub fn master(&self) -> &NodeInfo {
        &self.master
    }

    pub fn replicas(&self) -> &[NodeInfo] {
        &self.replicas
    }

    /// Nodes of this shard, master first, replicas in configured order. The
    /// ordering is load-bearing: callers treat position 0 as the writable
    /// node and the rest as read fallbacks.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeInfo> {
        std::iter::once(&self.master).chain(self.replicas.iter())
    }

    pub fn contains(&self, node_name: &str) -> bool {
        self.nodes().any(|n| n.name == node_name)
    }
}

/// Process-wide, read-only view of the cluster: which shard each key hashes
/// to, which nodes serve each shard, and which of those nodes is "this"
/// process.
#[derive(Debug, Clone)]
pub struct Topology {
    shards: Vec<ShardInfo>,
    this_node: NodeInfo,
}

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error(transparent)]
    File(#[from] ClusterFileError),
    #[error("topology file declares no shards")]
    NoShards,
    #[error("node name '{0}' appears more than once in topology")]
    DuplicateNodeName(String),
    #[error("node with name '{0}' not found in topology")]
    UnknownNodeName(String),
}

impl Topology {
    pub fn load<P: AsRef<Path>>(path: P, this_name: &str) -> Result<Topology, TopologyError> {
        let file = ClusterFile::read(path)?;
        Self::from_cluster_file(&file, this_name)
    }

    pub fn from_cluster_file(file: &ClusterFile, this_name: &str) -> Result<Topology, TopologyError> {
        if file.shards.is_empty() {
            return Err(TopologyError::NoShards);
        }

        let mut shards = Vec::with_capacity(file.shards.len());
        for (index, entry) in file.shards.iter().enumerate() {
            shards.push(ShardInfo {
                master: NodeInfo::from_entry(&entry.master, index, false),
                replicas: entry
                    .replicas
                    .iter()
                    .map(|r| NodeInfo::from_entry(r, index, true))
                    .collect(),
            });
        }

        let mut seen_names = HashSet::new();
        for node in shards.iter().flat_map(|s| s.nodes()) {
            if !seen_names.insert(node.name.clone()) {
                return Err(TopologyError::DuplicateNodeName(node.name.clone()));
            }
        }

        let this_node = shards
            .iter()
            .flat_map(|s| s.nodes())
            .find(|n| n.name == this_name)
            .cloned()
            .ok_or_else(|| TopologyError::UnknownNodeName(this_name.to_string()))?;

        Ok(Topology { shards, this_node })
    }

    pub fn this_node(&self) -> &NodeInfo {
        &self.this_node
    }

    pub fn this_shard_master(&self) -> &NodeInfo {
        self.shards[self.this_node.shard_index].master()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Resolves the shard owning `key`. Pure function of the immutable
    /// topology; identical key yields the identical shard on every node.
    pub fn shard_for_key(&self, key: &[u8]) -> &ShardInfo {
        let shard_index = fnv1a_32(key) as usize % self.shards.len();
        &self.shards[shard_index]
    }

    pub fn master_for_key(&self, key: &[u8]) -> &NodeInfo {
        self.shard_for_key(key).master()
    }
}

// 32-bit FNV-1a over the raw key bytes. Must stay byte-for-byte deterministic
// across processes; routing correctness depends on it.
fn fnv1a_32(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 16_777_619;

    let mut hash = OFFSET_BASIS;
    for b in bytes {
        hash ^= u32::from(*b);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
