//! WebServer binary entry point

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use generator::{GeneratorConfig, IconGenerator, RealHttpTransport};
use shared::{logging, process_info, ProcessId};

use webserver::{WebServer, WebServerResult};

#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "HTTP API for SVG icon generation")]
struct Args {
    /// Port for HTTP server
    #[arg(long, default_value = "8001")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Load environment from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    let args = Args::parse();

    let process_id = ProcessId::init_webserver();
    logging::init_tracing(process_id, Some(&args.log_level));
    logging::log_startup(process_id, "SVG icon web server");

    let config = match &args.env_file {
        Some(path) => GeneratorConfig::from_env_file(path)?,
        None => GeneratorConfig::from_env()?,
    };
    process_info!(
        process_id,
        "Default provider {}, providers ready without per-request key: {:?}",
        config.default_provider,
        config.ready_providers()
    );

    let http_addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| webserver::WebServerError::config(format!("Invalid listen address: {}", e)))?;

    let transport = Arc::new(RealHttpTransport::new()?);
    let webserver = WebServer::new(IconGenerator::from_config(&config, transport));

    webserver.run(http_addr).await?;

    logging::log_success(process_id, "WebServer stopped gracefully");
    Ok(())
}
