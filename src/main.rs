mod config;
mod db;
mod entities;
mod error;
mod models;
mod routes;
mod store;
mod validation;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, store::MovieStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: MovieStore,
}

pub fn app(state: Arc<AppState>) -> Router {
    let mut router: Router<Arc<AppState>> = Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/movies", get(routes::list_movies).post(routes::create_movie))
        .route(
            "/api/movies/{id}",
            get(routes::get_movie).put(routes::update_movie).delete(routes::delete_movie),
        );

    if state.config.debug_routes {
        router = router
            .route("/api/test-db", get(routes::test_db))
            .route("/api/debug/tables", get(routes::debug_tables))
            .route("/api/debug/create-table", post(routes::create_table));
    }

    router.with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movielog=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_migrate(&config.database_url, config.db_max_connections).await?;
    let state = Arc::new(AppState { config: config.clone(), store: MovieStore::new(db) });

    if config.debug_routes {
        tracing::warn!("debug routes enabled");
    }

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
