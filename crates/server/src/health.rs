use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};
use wellora_core::AdviceSources;
use wellora_db::DbPool;

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
    sources: Arc<AdviceSources>,
}

impl HealthState {
    pub fn new(db_pool: DbPool, sources: Arc<AdviceSources>) -> Self {
        Self { db_pool, sources }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalogs: HealthCheck,
    pub database: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn spawn(bind_address: &str, port: u16, state: HealthState) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(state)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = database_check(&state.db_pool).await;
    let ready = database.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "wellora-server runtime initialized".to_string(),
        },
        catalogs: catalog_check(&state.sources),
        database,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

/// Sources are loaded before the server starts, so this only reports sizes.
fn catalog_check(sources: &AdviceSources) -> HealthCheck {
    HealthCheck {
        status: "ready",
        detail: format!(
            "skincare {} records, hair {} records",
            sources.catalogs.skincare.len(),
            sources.catalogs.hair.len()
        ),
    }
}

async fn database_check(pool: &DbPool) -> HealthCheck {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM feedback_history").fetch_one(pool).await
    {
        Ok(_) => HealthCheck { status: "ready", detail: "history store reachable".to_string() },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("history store query failed: {error}") }
        }
    }
}
