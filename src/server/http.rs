use crate::server::shutdown::ShutdownSignal;
use crate::shard::{ShardClientPool, ShardService};
use crate::topology::{NodeInfo, Topology};
use hyper::server::conn::AddrIncoming;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

/// Response header naming the node that ultimately produced the answer.
pub const SHARD_HEADER_NAME: &str = "X-From-Shard";

/// HttpServer is the network-facing entry point: it resolves each request's
/// key to its owning shard and either serves locally or forwards over RPC.
pub struct HttpServer {
    logger: slog::Logger,
    dispatcher: Arc<Dispatcher>,
}

impl HttpServer {
    pub fn new(
        logger: slog::Logger,
        topology: Arc<Topology>,
        service: Arc<ShardService>,
        pool: Arc<ShardClientPool>,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher {
            logger: logger.clone(),
            topology,
            service,
            pool,
        });

        HttpServer { logger, dispatcher }
    }

    /// Serves on a builder the caller has already bound (bind failures are
    /// startup failures, not background-task failures).
    pub async fn run(self, builder: hyper::server::Builder<AddrIncoming>, shutdown_signal: ShutdownSignal) {
        let logger = self.logger.clone();
        let dispatcher = self.dispatcher;

        let make_svc = make_service_fn(move |_conn| {
            let dispatcher = dispatcher.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |request| {
                    let dispatcher = dispatcher.clone();
                    async move { Ok::<_, Infallible>(dispatcher.dispatch(request).await) }
                }))
            }
        });

        let result = builder.serve(make_svc).with_graceful_shutdown(shutdown_signal).await;

        slog::info!(logger, "HTTP server run() has exited: {:?}", result);
    }
}

struct Dispatcher {
    logger: slog::Logger,
    topology: Arc<Topology>,
    service: Arc<ShardService>,
    pool: Arc<ShardClientPool>,
}

impl Dispatcher {
    async fn dispatch(&self, request: Request<Body>) -> Response<Body> {
        slog::info!(
            self.logger,
            "{} {}",
            request.method(),
            request.uri().path()
        );

        let key = match request_key(&request) {
            Some(key) => key,
            None => return text_response(StatusCode::BAD_REQUEST, "missing key"),
        };

        let method = request.method().clone();
        match method {
            Method::GET => self.handle_get(&key).await,
            Method::PUT => self.handle_put(&key, request).await,
            _ => text_response(StatusCode::BAD_REQUEST, "unsupported method"),
        }
    }

    /// Reads may be served by any node of the owning shard: locally if this
    /// node belongs to the shard, otherwise by trying the shard's nodes
    /// master-first and falling through on call errors.
    async fn handle_get(&self, key: &str) -> Response<Body> {
        let shard = self.topology.shard_for_key(key.as_bytes());
        let this_node = self.topology.this_node();

        if shard.contains(&this_node.name) {
            return match self.service.get(key) {
                Ok(value) => value_response(value.unwrap_or_default(), &this_node.name),
                Err(e) => text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("store read failed: {}", e),
                ),
            };
        }

        for node in shard.nodes() {
            match self.remote_get(node, key).await {
                Ok(value) => return value_response(value, &node.name),
                Err(e) => {
                    slog::warn!(
                        self.logger,
                        "Get '{}' via node '{}' failed, trying next: {}",
                        key,
                        node.name,
                        e
                    );
                }
            }
        }

        text_response(StatusCode::INTERNAL_SERVER_ERROR, "all shard nodes unreachable")
    }

    async fn remote_get(
        &self,
        node: &NodeInfo,
        key: &str,
    ) -> Result<bytes::Bytes, Box<dyn std::error::Error + Send + Sync>> {
        let mut client = self.pool.client_for(node).await?;
        let value = client.get(key).await?;
        Ok(value)
    }

    /// Writes are funneled to the single master of the key's shard. A
    /// replica never performs or forwards a write; it redirects the client
    /// to the master instead.
    async fn handle_put(&self, key: &str, request: Request<Body>) -> Response<Body> {
        let this_node = self.topology.this_node().clone();
        let master = self.topology.master_for_key(key.as_bytes()).clone();

        if this_node.is_replica {
            return redirect_response(&master, key);
        }

        let value = match hyper::body::to_bytes(request.into_body()).await {
            Ok(value) => value,
            Err(e) => {
                return text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("error reading request body: {}", e),
                )
            }
        };

        if master.name == this_node.name {
            return match self.service.put(key, value) {
                Ok(_) => ack_response(&this_node.name),
                Err(e) => text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("local write failed: {}", e),
                ),
            };
        }

        let mut client = match self.pool.client_for(&master).await {
            Ok(client) => client,
            Err(e) => {
                return text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("failed to reach shard master '{}': {}", master.name, e),
                )
            }
        };

        match client.put(key, value).await {
            Ok(()) => ack_response(&master.name),
            Err(e) => text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("remote write to '{}' failed: {}", master.name, e),
            ),
        }
    }
}

fn request_key(request: &Request<Body>) -> Option<String> {
    let key = request.uri().path().trim_start_matches('/');
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

fn value_response(value: bytes::Bytes, node_name: &str) -> Response<Body> {
    response_builder(StatusCode::OK, node_name).body(Body::from(value)).unwrap()
}

fn ack_response(node_name: &str) -> Response<Body> {
    response_builder(StatusCode::OK, node_name).body(Body::empty()).unwrap()
}

fn redirect_response(master: &NodeInfo, key: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::PERMANENT_REDIRECT)
        .header(hyper::header::LOCATION, format!("http://{}/{}", master.http_addr(), key))
        .body(Body::empty())
        .unwrap()
}

fn text_response(status: StatusCode, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .body(Body::from(message.to_string()))
        .unwrap()
}

fn response_builder(status: StatusCode, node_name: &str) -> hyper::http::response::Builder {
    Response::builder().status(status).header(SHARD_HEADER_NAME, node_name)
}
