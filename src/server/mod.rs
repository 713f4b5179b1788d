mod http;
mod rpc;
mod shutdown;

pub use http::HttpServer;
pub use http::SHARD_HEADER_NAME;
pub use rpc::RpcServer;
pub use shutdown::shutdown_signal;
pub use shutdown::ShutdownHandle;
pub use shutdown::ShutdownSignal;
