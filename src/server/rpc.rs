use crate::grpc::grpc_shard_server::{GrpcShard, GrpcShardServer};
use crate::grpc::{
    proto_last_log_entry_result, proto_next_log_entry_result, proto_put_error, proto_put_result,
    ProtoEmptyLog, ProtoGetReq, ProtoGetResult, ProtoLastLogEntryReq, ProtoLastLogEntryResult,
    ProtoLogEntry, ProtoNextLogEntryReq, ProtoNextLogEntryResult, ProtoNoNewEntries, ProtoPutError,
    ProtoPutReq, ProtoPutResult, ProtoPutSuccess, ProtoReadOnlyNode, ProtoServerFault,
};
use crate::server::shutdown::ShutdownSignal;
use crate::shard::{PutError, ShardService};
use crate::storage::LogEntry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// RpcServer exposes the local ShardService over the inter-node gRPC
/// interface.
pub struct RpcServer {
    logger: slog::Logger,
    service: Arc<ShardService>,
}

impl RpcServer {
    pub fn new(logger: slog::Logger, service: Arc<ShardService>) -> Self {
        RpcServer { logger, service }
    }

    /// Serves on a listener the caller has already bound, so that a node is
    /// reachable by the time its startup returns.
    pub async fn run(self, listener: TcpListener, shutdown_signal: ShutdownSignal) {
        let logger = self.logger.clone();
        match listener.local_addr() {
            Ok(addr) => slog::info!(logger, "RPC server listening on '{}'", addr),
            Err(e) => slog::warn!(logger, "RPC server listener has no local addr: {}", e),
        }

        let result = Server::builder()
            .add_service(GrpcShardServer::new(self))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown_signal)
            .await;

        slog::info!(logger, "RPC server run() has exited: {:?}", result);
    }

    fn convert_put_result(app_result: Result<i64, PutError>) -> ProtoPutResult {
        match app_result {
            Ok(_) => ProtoPutResult {
                result: Some(proto_put_result::Result::Ok(ProtoPutSuccess {
                    // Empty
                })),
            },
            Err(PutError::ReadOnly) => ProtoPutResult {
                result: Some(proto_put_result::Result::Err(ProtoPutError {
                    err: Some(proto_put_error::Err::ReadOnly(ProtoReadOnlyNode {
                        // Empty
                    })),
                })),
            },
            Err(PutError::Store(e)) => ProtoPutResult {
                result: Some(proto_put_result::Result::Err(ProtoPutError {
                    err: Some(proto_put_error::Err::Fault(ProtoServerFault {
                        message: format!("store write failed: {}", e),
                    })),
                })),
            },
        }
    }

    fn convert_log_entry(entry: LogEntry) -> ProtoLogEntry {
        ProtoLogEntry {
            index: entry.index,
            key: entry.key,
            value: entry.value.to_vec(),
        }
    }
}

#[async_trait::async_trait]
impl GrpcShard for RpcServer {
    async fn get(
        &self,
        rpc_request_wrapped: Request<ProtoGetReq>,
    ) -> Result<Response<ProtoGetResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ServerWire - Get '{}'", rpc_request.key);

        let value = self
            .service
            .get(&rpc_request.key)
            .map_err(|e| Status::internal(format!("store read failed: {}", e)))?;

        Ok(Response::new(ProtoGetResult {
            value: value.map(|v| v.to_vec()).unwrap_or_default(),
        }))
    }

    async fn put(
        &self,
        rpc_request_wrapped: Request<ProtoPutReq>,
    ) -> Result<Response<ProtoPutResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ServerWire - Put '{}'", rpc_request.key);

        let app_result = self
            .service
            .put(&rpc_request.key, bytes::Bytes::from(rpc_request.value));
        let rpc_reply = Self::convert_put_result(app_result);

        Ok(Response::new(rpc_reply))
    }

    async fn get_next_log_entry(
        &self,
        rpc_request_wrapped: Request<ProtoNextLogEntryReq>,
    ) -> Result<Response<ProtoNextLogEntryResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        let rpc_reply = match self.service.next_log_entry(rpc_request.after_index) {
            Some(entry) => ProtoNextLogEntryResult {
                result: Some(proto_next_log_entry_result::Result::Entry(
                    Self::convert_log_entry(entry),
                )),
            },
            None => ProtoNextLogEntryResult {
                result: Some(proto_next_log_entry_result::Result::CaughtUp(
                    ProtoNoNewEntries {
                        // Empty
                    },
                )),
            },
        };

        Ok(Response::new(rpc_reply))
    }

    async fn get_last_log_entry(
        &self,
        _rpc_request_wrapped: Request<ProtoLastLogEntryReq>,
    ) -> Result<Response<ProtoLastLogEntryResult>, Status> {
        let rpc_reply = match self.service.last_log_entry() {
            Some(entry) => ProtoLastLogEntryResult {
                result: Some(proto_last_log_entry_result::Result::Entry(
                    Self::convert_log_entry(entry),
                )),
            },
            None => ProtoLastLogEntryResult {
                result: Some(proto_last_log_entry_result::Result::Empty(ProtoEmptyLog {
                    // Empty
                })),
            },
        };

        Ok(Response::new(rpc_reply))
    }
}
