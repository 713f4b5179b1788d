use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

/// On-disk shape of the cluster topology file. All nodes must load a
/// byte-identical copy of this file, otherwise routing diverges across the
/// cluster.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterFile {
    pub shards: Vec<ShardEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShardEntry {
    pub master: NodeEntry,
    #[serde(default)]
    pub replicas: Vec<NodeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeEntry {
    pub name: String,
    pub host: String,
    pub http_port: u16,
    pub rpc_port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum ClusterFileError {
    #[error("failed to read topology file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse topology file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl ClusterFile {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<ClusterFile, ClusterFileError> {
        let contents = fs::read_to_string(path)?;
        let file = serde_yaml::from_str(&contents)?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cluster_file() {
        let yaml = "
shards:
  - master: { name: a, host: 127.0.0.1, http_port: 8080, rpc_port: 9080 }
    replicas:
      - { name: b, host: 127.0.0.1, http_port: 8081, rpc_port: 9081 }
  - master: { name: c, host: 127.0.0.1, http_port: 8082, rpc_port: 9082 }
";
        let file: ClusterFile = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(file.shards.len(), 2);
        assert_eq!(file.shards[0].master.name, "a");
        assert_eq!(file.shards[0].replicas.len(), 1);
        assert_eq!(file.shards[0].replicas[0].name, "b");
        // `replicas` is optional.
        assert!(file.shards[1].replicas.is_empty());
        assert_eq!(file.shards[1].master.rpc_port, 9082);
    }
}
