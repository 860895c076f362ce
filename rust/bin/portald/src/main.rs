//! `portald`: the application portal server.
//!
//! Usage:
//!   portald [--data-dir <dir>] [--listen <addr>] [--admin-group <group>]
//!
//! Every flag can also be set through its environment variable (see
//! `--help`). The registry document lives at `<data-dir>/applications.json`.

mod bootstrap;
mod middleware;
mod routes;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use portal_core::ServiceConfig;
use portal_core::config::DEFAULT_DATA_DIR;

/// Application portal server.
#[derive(Parser, Debug)]
#[command(name = "portald", about = "Application portal server")]
struct Cli {
    /// Directory holding applications.json.
    #[arg(long = "data-dir", env = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Listen address.
    #[arg(long = "listen", env = "PORTAL_LISTEN", default_value = "0.0.0.0:3000")]
    listen: String,

    /// Group granting portal administration (default: any group containing "admin").
    #[arg(long = "admin-group", env = "PORTAL_ADMIN_GROUP")]
    admin_group: Option<String>,

    /// Domain substituted for ${DOMAIN} (default: derived from the request host).
    #[arg(long = "domain", env = "PORTAL_DOMAIN")]
    domain: Option<String>,

    /// Realm substituted for ${REALM}.
    #[arg(long = "realm", env = "PORTAL_REALM")]
    realm: Option<String>,

    /// Identity provider origin, e.g. https://keycloak.example.com.
    #[arg(long = "keycloak-host", env = "PORTAL_KEYCLOAK_HOST")]
    keycloak_host: Option<String>,

    /// URL listing applications registered at the identity provider.
    #[arg(long = "idp-clients-url", env = "PORTAL_IDP_CLIENTS_URL")]
    idp_clients_url: Option<String>,
}

impl Cli {
    fn into_config(self) -> ServiceConfig {
        ServiceConfig {
            data_dir: self.data_dir,
            listen: self.listen,
            admin_group: self.admin_group,
            domain: self.domain,
            realm: self.realm,
            keycloak_host: self.keycloak_host,
            idp_clients_url: self.idp_clients_url,
        }
        .normalized()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Cli::parse().into_config();
    let module = bootstrap::init_module(&config)?;
    let data_file = module.service().data_location();
    info!("Data file: {}", data_file);
    let app = routes::build_router(&[&module], data_file);

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!("Portal listening on {}", config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
