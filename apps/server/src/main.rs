#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::info;

mod error;
mod routes;
mod state;

use error::AppError;
use logger::init_tracing;
use pulse::{Config, Pulse};
use state::AppState;

#[derive(Debug, Parser)]
#[command(version, about = "Live status stream and latency history for one monitored URL")]
struct Args {
    /// Config file, defaults to $XDG_CONFIG_HOME/pulse/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let config = Config::from_config(args.config.as_ref())?;
    info!("{config}");

    let pulse = Pulse::from_config(&config).await?;
    let state = AppState::from_pulse(&pulse);
    let scheduler = pulse.start();

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let served = run_server(addr, state, config.server.allowed_origin.clone()).await;

    // The server returns once a shutdown signal has drained the workers
    scheduler.stop().await;
    served?;

    Ok(())
}

fn cors(allowed_origin: &str) -> Cors {
    let cors = if allowed_origin == "*" {
        Cors::default().allow_any_origin()
    } else {
        Cors::default().allowed_origin(allowed_origin)
    };

    cors.allowed_methods(vec!["GET"]).allow_any_header().max_age(3600)
}

async fn run_server(
    addr: SocketAddr,
    state: AppState,
    allowed_origin: String,
) -> Result<(), AppError> {
    let state = web::Data::new(state);
    info!(%addr, origin = %allowed_origin, "Starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origin))
            .app_data(state.clone())
            .configure(routes::routes)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
