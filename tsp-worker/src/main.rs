use anyhow::{anyhow, Result};
use clap::{arg, value_parser, ArgMatches, Command};
use log::{error, info, warn};
use std::{
    net::IpAddr,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::{signal, sync::oneshot};
use tsp_api::{Api, BindReq, UnbindReq};
use tsp_structs::config::DEFAULT_WORKER_PREFIX;
use tsp_worker::{server, Worker};

fn cli() -> Command {
    Command::new("tsp-worker")
        .about("Serves exhaustive sub-route searches for a TSP master")
        .arg(
            arg!(--registry <URL> "Registry to announce this worker to")
                .default_value("http://127.0.0.1:1099")
                .value_parser(value_parser!(String)),
        )
        .arg(
            arg!(--host <HOST> "Address to listen on")
                .default_value("0.0.0.0")
                .value_parser(value_parser!(IpAddr)),
        )
        .arg(
            arg!(--port <PORT> "Port to listen on, 0 picks a free one")
                .default_value("0")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            arg!(--advertise <HOST> "Hostname masters should use to reach this worker")
                .default_value("127.0.0.1")
                .value_parser(value_parser!(String)),
        )
        .arg(
            arg!(--prefix <PREFIX> "Name prefix masters discover workers by")
                .default_value(DEFAULT_WORKER_PREFIX)
                .value_parser(value_parser!(String)),
        )
}

fn time() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
    if let Err(e) = run(cli().get_matches()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(matches: ArgMatches) -> Result<()> {
    let registry = matches.get_one::<String>("registry").unwrap().clone();
    let host = *matches.get_one::<IpAddr>("host").unwrap();
    let port = *matches.get_one::<u16>("port").unwrap();
    let advertise = matches.get_one::<String>("advertise").unwrap().clone();
    let prefix = matches.get_one::<String>("prefix").unwrap().clone();

    let name = format!("{}-{}", prefix, time());
    let worker = Arc::new(Worker::new(name.clone()));
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let (addr, server) = warp::serve(server::routes(worker))
        .try_bind_with_graceful_shutdown((host, port), async {
            shutdown_rx.await.ok();
        })
        .map_err(|e| anyhow!("Failed to bind {}:{}: {}", host, port, e))?;
    let server = tokio::spawn(server);
    info!("[worker] {} listening on {}", name, addr);

    let api = Api::new(registry);
    let url = format!("http://{}:{}", advertise, addr.port());
    let bound = api
        .bind(BindReq {
            name: name.clone(),
            url: url.clone(),
        })
        .await;
    match bound {
        Ok(resp) => info!(
            "[worker] registered {} at {} with {}{}",
            resp.name,
            url,
            api.registry_url(),
            if resp.replaced { " (replaced)" } else { "" }
        ),
        Err(e) => {
            let _ = shutdown_tx.send(());
            server.await?;
            return Err(anyhow!("Failed to register {}: {}", name, e));
        }
    }

    signal::ctrl_c().await?;
    info!("[worker] shutting down {}", name);
    if let Err(e) = api.unbind(UnbindReq { name: name.clone() }).await {
        warn!("[worker] failed to unregister {}: {}", name, e);
    }
    let _ = shutdown_tx.send(());
    server.await?;
    Ok(())
}
