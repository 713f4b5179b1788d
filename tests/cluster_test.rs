use bytes::Bytes;
use hyper::{Body, Method, Request, StatusCode};
use shardkv::{
    try_start_node, ClusterFile, NodeEntry, NodeHandle, NodeOptions, NodeStartConfig, ShardEntry,
    Topology, SHARD_HEADER_NAME,
};
use slog::Drain;
use std::collections::HashMap;
use std::error::Error;
use tokio::time::{Duration, Instant};

const REPLICATION_INTERVAL: Duration = Duration::from_millis(50);

// Cluster under test: shard 0 is master "a" + replica "b", shard 1 is master
// "c" with no replicas.
fn cluster_file(port_base: u16) -> ClusterFile {
    ClusterFile {
        shards: vec![
            ShardEntry {
                master: node_entry("a", port_base),
                replicas: vec![node_entry("b", port_base + 1)],
            },
            ShardEntry {
                master: node_entry("c", port_base + 2),
                replicas: vec![],
            },
        ],
    }
}

fn node_entry(name: &str, port: u16) -> NodeEntry {
    NodeEntry {
        name: name.to_string(),
        host: "127.0.0.1".to_string(),
        http_port: port,
        rpc_port: port + 50,
    }
}

// Starts masters before replicas: a replica's startup fatally requires its
// master to be dialable.
async fn start_cluster(port_base: u16) -> Result<HashMap<String, NodeHandle>, Box<dyn Error>> {
    let file = cluster_file(port_base);
    let mut handles = HashMap::new();

    for name in &["a", "c", "b"] {
        let handle = try_start_node(NodeStartConfig {
            topology: Topology::from_cluster_file(&file, name)?,
            logger: create_root_logger_for_stdout(name.to_string()),
            options: NodeOptions {
                replication_interval: Some(REPLICATION_INTERVAL),
                rpc_timeout: Some(Duration::from_secs(1)),
            },
        })
        .await?;
        handles.insert(name.to_string(), handle);
    }

    Ok(handles)
}

// Keys are routed by hash, so tests derive a key known to live on the wanted
// shard instead of hard-coding one.
fn key_for_shard(file: &ClusterFile, shard_master: &str) -> String {
    let topology = Topology::from_cluster_file(file, "a").unwrap();
    for i in 0.. {
        let key = format!("key-{}", i);
        if topology.master_for_key(key.as_bytes()).name == shard_master {
            return key;
        }
    }
    unreachable!()
}

fn node_url(file: &ClusterFile, name: &str, key: &str) -> String {
    let topology = Topology::from_cluster_file(file, name).unwrap();
    format!("http://{}/{}", topology.this_node().http_addr(), key)
}

async fn http_put(url: &str, value: &str) -> Result<hyper::Response<Body>, hyper::Error> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(url)
        .body(Body::from(value.to_string()))
        .unwrap();
    hyper::Client::new().request(request).await
}

async fn http_get(url: &str) -> Result<(hyper::Response<Body>, Bytes), Box<dyn Error>> {
    let response = hyper::Client::new().get(url.parse()?).await?;
    let (parts, body) = response.into_parts();
    let body = hyper::body::to_bytes(body).await?;
    Ok((hyper::Response::from_parts(parts, Body::empty()), body))
}

fn from_shard_header(response: &hyper::Response<Body>) -> &str {
    response
        .headers()
        .get(SHARD_HEADER_NAME)
        .expect("response missing X-From-Shard header")
        .to_str()
        .unwrap()
}

// Polls until the node at `url` serves `expected` for the key, or panics at
// the deadline. Replication is asynchronous; a replica may lag by a tick.
async fn await_value(url: &str, expected: &str, timeout: Duration) -> hyper::Response<Body> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok((response, body)) = http_get(url).await {
            if body == Bytes::copy_from_slice(expected.as_bytes()) {
                return response;
            }
        }
        assert!(
            Instant::now() < deadline,
            "node at {} did not converge to expected value in time",
            url
        );
        tokio::time::sleep(REPLICATION_INTERVAL).await;
    }
}

#[tokio::test]
async fn write_is_funneled_to_master_and_replicated() -> Result<(), Box<dyn Error>> {
    let port_base = 15000;
    let file = cluster_file(port_base);
    let _handles = start_cluster(port_base).await?;

    let key = key_for_shard(&file, "a");

    // Write through node "c", which owns a different shard entirely. It must
    // forward the write to shard 0's master.
    let put_response = http_put(&node_url(&file, "c", &key), "bar").await?;
    assert_eq!(put_response.status(), StatusCode::OK);
    assert_eq!(from_shard_header(&put_response), "a");

    // The master serves the value immediately.
    let (get_response, body) = http_get(&node_url(&file, "a", &key)).await?;
    assert_eq!(get_response.status(), StatusCode::OK);
    assert_eq!(body, Bytes::from_static(b"bar"));
    assert_eq!(from_shard_header(&get_response), "a");

    // The replica converges after it pulls the entry, and answers under its
    // own name.
    let replica_response = await_value(&node_url(&file, "b", &key), "bar", Duration::from_secs(5)).await;
    assert_eq!(from_shard_header(&replica_response), "b");

    Ok(())
}

#[tokio::test]
async fn replica_redirects_client_writes_to_master() -> Result<(), Box<dyn Error>> {
    let port_base = 15100;
    let file = cluster_file(port_base);
    let _handles = start_cluster(port_base).await?;

    let key = key_for_shard(&file, "a");

    // hyper's client does not follow redirects, so the 308 is observable.
    let response = http_put(&node_url(&file, "b", &key), "bar").await?;
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);

    let location = response.headers().get(hyper::header::LOCATION).unwrap().to_str()?;
    let master_addr = format!("127.0.0.1:{}", port_base);
    assert_eq!(location, format!("http://{}/{}", master_addr, key));

    // The replica refused the write, so nobody in the shard has the value.
    let (_, master_body) = http_get(&node_url(&file, "a", &key)).await?;
    assert!(master_body.is_empty());
    let (_, replica_body) = http_get(&node_url(&file, "b", &key)).await?;
    assert!(replica_body.is_empty());

    Ok(())
}

#[tokio::test]
async fn reads_fall_back_to_replica_when_master_is_down() -> Result<(), Box<dyn Error>> {
    let port_base = 15200;
    let file = cluster_file(port_base);
    let mut handles = start_cluster(port_base).await?;

    let key = key_for_shard(&file, "a");

    let put_response = http_put(&node_url(&file, "a", &key), "persisted").await?;
    assert_eq!(put_response.status(), StatusCode::OK);
    await_value(&node_url(&file, "b", &key), "persisted", Duration::from_secs(5)).await;

    // Stop the master. Node "c" doesn't belong to shard 0, so its GET must
    // try the master first, fail, and fall back to the replica.
    handles.remove("a");
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (response, body) = http_get(&node_url(&file, "c", &key)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body, Bytes::from_static(b"persisted"));
    assert_eq!(from_shard_header(&response), "b");

    Ok(())
}

#[tokio::test]
async fn get_fails_when_all_shard_nodes_are_unreachable() -> Result<(), Box<dyn Error>> {
    let port_base = 15300;
    let file = cluster_file(port_base);
    let mut handles = start_cluster(port_base).await?;

    // Shard 1 is served by "c" alone; with it gone there is no fallback.
    let key = key_for_shard(&file, "c");
    handles.remove("c");
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (response, _) = http_get(&node_url(&file, "a", &key)).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

#[tokio::test]
async fn sequential_writes_replicate_in_order() -> Result<(), Box<dyn Error>> {
    let port_base = 15400;
    let file = cluster_file(port_base);
    let _handles = start_cluster(port_base).await?;

    let key = key_for_shard(&file, "a");

    // Same key written twice; last write wins everywhere.
    http_put(&node_url(&file, "a", &key), "v1").await?;
    http_put(&node_url(&file, "a", &key), "v2").await?;

    await_value(&node_url(&file, "b", &key), "v2", Duration::from_secs(5)).await;

    Ok(())
}

#[tokio::test]
async fn malformed_requests_are_rejected_with_bad_request() -> Result<(), Box<dyn Error>> {
    let port_base = 15500;
    let file = cluster_file(port_base);
    let _handles = start_cluster(port_base).await?;

    let key = key_for_shard(&file, "a");

    // Only GET and PUT are served; anything else is a client error.
    let request = Request::builder()
        .method(Method::POST)
        .uri(node_url(&file, "a", &key))
        .body(Body::from("bar"))
        .unwrap();
    let response = hyper::Client::new().request(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A request with no key in the path is likewise rejected.
    let (response, _) = http_get(&node_url(&file, "a", "")).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The rejected POST must not have written anything.
    let (_, body) = http_get(&node_url(&file, "a", &key)).await?;
    assert!(body.is_empty());

    Ok(())
}

fn create_root_logger_for_stdout(node_name: String) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!("node" => node_name))
}
