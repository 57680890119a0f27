use citydev::config::Config;
use citydev::domain::device::service::Service;
use citydev::inbound::http::{HttpServer, HttpServerConfig};
use citydev::outbound::sqlite::Sqlite;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let sqlite = Sqlite::new(&config.database_url, config.database_max_connections).await?;
    let device_service = Service::new(sqlite, config.mode);
    tracing::info!(mode = %config.mode, "device function configured");

    let server_config = HttpServerConfig {
        port: &config.server_port,
    };

    let http_server = HttpServer::new(device_service, server_config).await?;

    http_server.run().await
}
