use anyhow::{anyhow, Result};
use clap::{arg, value_parser, Command};
use log::{error, info};
use std::net::IpAddr;
use tsp_registry::{routes, Registry};

fn cli() -> Command {
    Command::new("tsp-registry")
        .about("Name registry that TSP workers announce themselves to")
        .arg(
            arg!(--host <HOST> "Address to listen on")
                .default_value("0.0.0.0")
                .value_parser(value_parser!(IpAddr)),
        )
        .arg(
            arg!(--port <PORT> "Port to listen on")
                .default_value("1099")
                .value_parser(value_parser!(u16)),
        )
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let matches = cli().get_matches();
    let host = *matches.get_one::<IpAddr>("host").unwrap();
    let port = *matches.get_one::<u16>("port").unwrap();

    let (addr, server) = warp::serve(routes(Registry::new()))
        .try_bind_with_graceful_shutdown((host, port), async {
            tokio::signal::ctrl_c().await.ok();
        })
        .map_err(|e| anyhow!("Failed to bind {}:{}: {}", host, port, e))?;
    info!("[registry] listening on {}", addr);
    server.await;
    info!("[registry] stopped");
    Ok(())
}
