use crate::grpc::grpc_shard_client::GrpcShardClient;
use crate::grpc::{
    proto_next_log_entry_result, proto_put_error, proto_put_result, ProtoGetReq, ProtoLogEntry,
    ProtoNextLogEntryReq, ProtoPutReq,
};
use crate::storage::LogEntry;
use crate::topology::NodeInfo;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::time::Duration;
use tonic::codegen::http::uri;
use tonic::transport::{Channel, Endpoint};

/// ShardClient is one node's RPC handle onto another node's shard service.
/// Cheap to clone; clones share the underlying connection.
#[derive(Clone)]
pub struct ShardClient {
    inner: GrpcShardClient<Channel>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("invalid node address: {0}")]
    InvalidUri(#[from] uri::InvalidUri),
    #[error("failed to connect: {0}")]
    ConnectFailure(#[from] tonic::transport::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RemotePutError {
    #[error("remote shard node is read-only")]
    ReadOnly,
    #[error("remote shard fault: {0}")]
    Fault(String),
    #[error("rpc failure: {0}")]
    Rpc(#[from] tonic::Status),
}

impl ShardClient {
    pub async fn connect(node: &NodeInfo, timeout: Duration) -> Result<Self, ConnectError> {
        let url = format!("http://{}", node.rpc_addr());
        let endpoint = Endpoint::from_shared(url)?.timeout(timeout);

        let connection = endpoint.connect().await?;

        Ok(ShardClient {
            inner: GrpcShardClient::new(connection),
        })
    }

    pub async fn get(&mut self, key: &str) -> Result<Bytes, tonic::Status> {
        let reply = self
            .inner
            .get(ProtoGetReq { key: key.to_string() })
            .await?
            .into_inner();

        Ok(Bytes::from(reply.value))
    }

    pub async fn put(&mut self, key: &str, value: Bytes) -> Result<(), RemotePutError> {
        let reply = self
            .inner
            .put(ProtoPutReq {
                key: key.to_string(),
                value: value.to_vec(),
            })
            .await?
            .into_inner();

        match reply.result {
            Some(proto_put_result::Result::Ok(_)) => Ok(()),
            Some(proto_put_result::Result::Err(put_error)) => match put_error.err {
                Some(proto_put_error::Err::ReadOnly(_)) => Err(RemotePutError::ReadOnly),
                Some(proto_put_error::Err::Fault(fault)) => Err(RemotePutError::Fault(fault.message)),
                None => Err(RemotePutError::Fault("malformed put error".to_string())),
            },
            None => Err(RemotePutError::Fault("malformed put result".to_string())),
        }
    }

    /// None means the remote log has nothing after `after_index`, i.e. the
    /// caller is caught up.
    pub async fn next_log_entry(&mut self, after_index: i64) -> Result<Option<LogEntry>, tonic::Status> {
        let reply = self
            .inner
            .get_next_log_entry(ProtoNextLogEntryReq { after_index })
            .await?
            .into_inner();

        match reply.result {
            Some(proto_next_log_entry_result::Result::Entry(entry)) => {
                Ok(Some(convert_log_entry(entry)))
            }
            Some(proto_next_log_entry_result::Result::CaughtUp(_)) | None => Ok(None),
        }
    }

}

fn convert_log_entry(proto: ProtoLogEntry) -> LogEntry {
    LogEntry {
        index: proto.index,
        key: proto.key,
        value: Bytes::from(proto.value),
    }
}

/// ShardClientPool keeps one persistent connection per remote node, dialed
/// lazily on first use and reused thereafter. A broken connection surfaces as
/// a call error to the caller, which is responsible for fallback; the pool
/// does no health checking of its own.
pub struct ShardClientPool {
    logger: slog::Logger,
    rpc_timeout: Duration,
    // Outer lock only guards slot lookup; the per-node async lock is held
    // across the dial so slow dials don't block lookups for other nodes.
    clients: Mutex<HashMap<String, Arc<tokio::sync::Mutex<Option<ShardClient>>>>>,
}

impl ShardClientPool {
    pub fn new(logger: slog::Logger, rpc_timeout: Duration) -> Self {
        ShardClientPool {
            logger,
            rpc_timeout,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub async fn client_for(&self, node: &NodeInfo) -> Result<ShardClient, ConnectError> {
        let slot = {
            let mut clients = self.clients.lock().expect("client pool lock poisoned");
            clients
                .entry(node.name.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(None)))
                .clone()
        };

        let mut slot = slot.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        slog::info!(self.logger, "Connecting to node '{}' at {}", node.name, node.rpc_addr());
        let client = ShardClient::connect(node, self.rpc_timeout).await?;

        // Only successful dials are cached; a failed dial leaves the slot
        // empty so a later call retries.
        *slot = Some(client.clone());
        Ok(client)
    }
}
