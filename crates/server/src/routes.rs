use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{
    interventions::HttpInterventionClient, machine_service::MachineService,
    machine_store::SeaOrmMachineStore,
};

pub mod machines;

/// Production composition of the catalog service.
pub type Catalog = MachineService<SeaOrmMachineStore, HttpInterventionClient>;

#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<Catalog>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: liveness plus the machine catalog API.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let api = Router::new()
        .route("/api/machines", get(machines::list).post(machines::create))
        .route("/api/machines/search", get(machines::search))
        .route(
            "/api/machines/:id",
            get(machines::get_by_id).put(machines::update).delete(machines::delete),
        )
        .route("/api/machines/:id/interventions", get(machines::intervention_history));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
