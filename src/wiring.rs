use crate::server::{shutdown_signal, HttpServer, RpcServer, ShutdownHandle};
use crate::shard::{ConnectError, ReplicationLoopHandle, ShardClientPool, ShardService};
use crate::storage::InMemoryStore;
use crate::topology::Topology;
use std::convert::TryFrom;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Duration;

pub struct NodeStartConfig {
    pub topology: Topology,
    pub logger: slog::Logger,
    pub options: NodeOptions,
}

#[derive(Clone, Default)]
pub struct NodeOptions {
    /// How often a replica polls its master for new log entries.
    pub replication_interval: Option<Duration>,
    /// Per-call timeout on inter-node RPCs, so a dead peer can't block a
    /// caller forever.
    pub rpc_timeout: Option<Duration>,
}

pub(crate) struct NodeOptionsValidated {
    pub replication_interval: Duration,
    pub rpc_timeout: Duration,
}

impl NodeOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.replication_interval.as_millis() == 0 {
            return Err("Replication interval must be non-zero");
        }
        if self.rpc_timeout.as_millis() == 0 {
            return Err("RPC timeout must be non-zero");
        }

        Ok(())
    }
}

impl TryFrom<NodeOptions> for NodeOptionsValidated {
    type Error = &'static str;

    fn try_from(options: NodeOptions) -> Result<Self, Self::Error> {
        let values = NodeOptionsValidated {
            replication_interval: options.replication_interval.unwrap_or(Duration::from_millis(250)),
            rpc_timeout: options.rpc_timeout.unwrap_or(Duration::from_secs(5)),
        };

        values.validate()?;
        Ok(values)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NodeStartError {
    #[error("Illegal options for configuring node: {0}")]
    IllegalNodeOptions(String),
    #[error("Failed to bind HTTP listener: {0}")]
    HttpBind(hyper::Error),
    #[error("Failed to bind RPC listener: {0}")]
    RpcBind(io::Error),
    #[error("This node has an unparseable address: {0}")]
    BadAddress(std::net::AddrParseError),
    #[error("Replica could not reach its shard master at startup: {0}")]
    MasterUnreachable(ConnectError),
}

/// NodeHandle owns everything a running node spawned. Dropping it shuts down
/// both servers and, on replicas, the replication loop. This is how the
/// integration tests stop individual nodes.
pub struct NodeHandle {
    node_name: String,
    _http_shutdown: ShutdownHandle,
    _rpc_shutdown: ShutdownHandle,
    _replication: Option<ReplicationLoopHandle>,
}

impl NodeHandle {
    pub fn node_name(&self) -> &str {
        &self.node_name
    }
}

/// Constructs and wires a node's full stack: shard service, client pool,
/// pre-bound HTTP and RPC listeners, and (for replicas) the replication loop
/// with its fatal initial master dial.
pub async fn try_start_node(config: NodeStartConfig) -> Result<NodeHandle, NodeStartError> {
    let root_logger = config.logger;
    let topology = Arc::new(config.topology);
    let this_node = topology.this_node().clone();

    let options =
        NodeOptionsValidated::try_from(config.options).map_err(|e| NodeStartError::IllegalNodeOptions(e.to_string()))?;

    let service = Arc::new(ShardService::new(
        root_logger.clone(),
        Box::new(InMemoryStore::new()),
        this_node.is_replica,
    ));
    let pool = Arc::new(ShardClientPool::new(root_logger.clone(), options.rpc_timeout));

    // Bind both listeners before spawning anything, so that a returned
    // handle means the node is reachable and bind failures abort startup.
    let http_addr: SocketAddr = this_node.http_addr().parse().map_err(NodeStartError::BadAddress)?;
    let rpc_addr: SocketAddr = this_node.rpc_addr().parse().map_err(NodeStartError::BadAddress)?;

    let http_builder = hyper::Server::try_bind(&http_addr).map_err(NodeStartError::HttpBind)?;
    let rpc_listener = TcpListener::bind(rpc_addr).await.map_err(NodeStartError::RpcBind)?;

    let (http_shutdown_handle, http_shutdown_signal) = shutdown_signal();
    let (rpc_shutdown_handle, rpc_shutdown_signal) = shutdown_signal();

    let rpc_server = RpcServer::new(root_logger.clone(), service.clone());
    tokio::spawn(rpc_server.run(rpc_listener, rpc_shutdown_signal));

    let http_server = HttpServer::new(root_logger.clone(), topology.clone(), service.clone(), pool.clone());
    slog::info!(root_logger, "HTTP server listening on '{}'", http_addr);
    tokio::spawn(http_server.run(http_builder, http_shutdown_signal));

    let replication = if this_node.is_replica {
        let master = topology.this_shard_master().clone();

        // A replica that can't reach its master at all can't function.
        pool.client_for(&master)
            .await
            .map_err(NodeStartError::MasterUnreachable)?;

        Some(ReplicationLoopHandle::spawn_background_task(
            root_logger.clone(),
            options.replication_interval,
            service.clone(),
            pool.clone(),
            master,
        ))
    } else {
        None
    };

    Ok(NodeHandle {
        node_name: this_node.name,
        _http_shutdown: http_shutdown_handle,
        _rpc_shutdown: rpc_shutdown_handle,
        _replication: replication,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_validate() {
        let validated = NodeOptionsValidated::try_from(NodeOptions::default()).unwrap();
        assert_eq!(validated.replication_interval, Duration::from_millis(250));
        assert_eq!(validated.rpc_timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_replication_interval_is_rejected() {
        let options = NodeOptions {
            replication_interval: Some(Duration::from_millis(0)),
            ..NodeOptions::default()
        };
        assert!(NodeOptionsValidated::try_from(options).is_err());
    }
}
