use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::{
    interventions::HttpInterventionClient, machine_service::MachineService,
    machine_store::SeaOrmMachineStore,
};

use crate::routes::{self, ServerState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::load()?;

    // DB connection and schema
    let db = models::db::connect_with(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    // Explicit composition: the catalog gets its store and gateway here.
    let store = Arc::new(SeaOrmMachineStore::new(db));
    let gateway = Arc::new(HttpInterventionClient::new(
        cfg.interventions.base_url.clone(),
        Duration::from_secs(cfg.interventions.timeout_secs),
    )?);
    let catalog = Arc::new(MachineService::new(store, gateway));
    let state = ServerState { catalog };

    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, interventions = %cfg.interventions.base_url, "starting machines service");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
