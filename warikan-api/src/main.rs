use actix_cors::Cors;
use actix_web::{middleware, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use warikan_api::config::{ApiConfig, CorsConfig};
use warikan_api::handlers;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the per-user default
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    log_file_path: Option<String>,
}

fn init_logging(log_file_path: Option<String>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("warikan-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

fn build_cors(cors_config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();
    for origin in &cors_config.allowed_origins {
        cors = cors.allowed_origin(origin);
    }

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec!["Origin", "Content-Type", "Accept", "Authorization"])
        .expose_headers(vec!["Content-Length"])
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file_path);

    let (config, config_path) =
        ApiConfig::load(args.config.as_deref()).context("Failed to load config")?;
    tracing::info!("Loaded config from {}", config_path.display());

    let server_config = config.server();
    let cors_config = config.cors();
    tracing::info!(
        origins = ?cors_config.allowed_origins,
        "Server will listen on {}:{}",
        server_config.host,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&cors_config))
            .wrap(middleware::Logger::default())
            .configure(|cfg| handlers::configure(cfg, &config))
    })
    .bind((server_config.host.as_str(), server_config.port))
    .with_context(|| {
        format!(
            "Failed to bind {}:{}",
            server_config.host, server_config.port
        )
    })?
    .run()
    .await
    .context("Server terminated with an error")
}
