use std::sync::Arc;

use anyhow::Result;
use catalog_proxy::catalog::CatalogClient;
use catalog_proxy::server;
use catalog_proxy::utils::config_loader;
use catalog_proxy::utils::logging;
use catalog_proxy::utils::logging::LogLevel;
use catalog_proxy::UpstreamGateway;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "catalog-proxy.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level.to_owned()).await?;

    // -------------------------------
    // 2. Build upstream gateway
    //
    // token cache + token manager + request client
    // -------------------------------

    let gateway = UpstreamGateway::from_config(&service_config.upstream, &service_config.settings.http)?;
    let catalog = CatalogClient::new(Arc::new(gateway), service_config.catalog.clone());

    // -------------------------------
    // 3. Start http server
    // -------------------------------

    info!(
        upstream = %service_config.upstream.base_url,
        vendor_id = service_config.catalog.vendor_id,
        "Service starting..."
    );
    server::server::start(&service_config.settings, catalog).await
}
