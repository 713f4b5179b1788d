use shardkv::{try_start_node, NodeOptions, NodeStartConfig, Topology};
use slog::Drain;

struct Flags {
    config_path: String,
    node_name: String,
}

fn parse_flags() -> Result<Flags, String> {
    let mut config_path = "config.yml".to_string();
    let mut node_name = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = args.next().ok_or("--config requires a value")?;
            }
            "--name" => {
                node_name = Some(args.next().ok_or("--name requires a value")?);
            }
            other => return Err(format!("unrecognized argument '{}'", other)),
        }
    }

    let node_name = node_name.ok_or("Must provide --name")?;
    Ok(Flags { config_path, node_name })
}

fn create_root_logger(node_name: String) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!("node" => node_name))
}

#[tokio::main]
async fn main() {
    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: shardkv --config <path> --name <node-name>");
            std::process::exit(1);
        }
    };

    let topology = match Topology::load(&flags.config_path, &flags.node_name) {
        Ok(topology) => topology,
        Err(e) => {
            eprintln!("failed to load topology: {}", e);
            std::process::exit(1);
        }
    };

    let logger = create_root_logger(flags.node_name);

    let node_handle = match try_start_node(NodeStartConfig {
        topology,
        logger: logger.clone(),
        options: NodeOptions::default(),
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            // Drop the async drain first so the failure reason is flushed.
            drop(logger);
            eprintln!("failed to start node: {}", e);
            std::process::exit(1);
        }
    };

    slog::info!(logger, "Node '{}' started", node_handle.node_name());

    if let Err(e) = tokio::signal::ctrl_c().await {
        slog::error!(logger, "Failed to listen for shutdown signal: {}", e);
    }
    slog::info!(logger, "Shutting down");
}
