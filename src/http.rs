//! HTTP transport for the coordinator.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /health` - `{ "ok": true }`.
//! - `GET /prizes` - `{ "names": [...], "segments": [{ "name", "has_stock" }], "degraded": bool }`.
//! - `POST /spin` - body `{ "code": ..., "nickname": ... }`, answers with a
//!   [`RedeemOutcome`] and the HTTP status of its [`RedeemStatus`].
//!
//! ## Example
//!
//! ```ignore
//! let coordinator = Arc::new(RedemptionCoordinator::new(inventory, ledger));
//!
//! // Compose with other axum routes
//! let app = prize_wheel::http::router(coordinator.clone());
//!
//! // Or serve directly
//! prize_wheel::http::serve(coordinator, "0.0.0.0:5000").await?;
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::draw::RandomSource;
use crate::gateway::{CodeLedgerGateway, InventoryGateway};
use crate::redeem::{DisplayPool, RedeemOutcome, RedeemStatus, RedemptionCoordinator};

/// Body of `POST /spin`. Missing fields arrive as empty strings and are
/// rejected by the coordinator as BAD_INPUT, as is a body that is not this
/// JSON object at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpinRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub nickname: String,
}

/// Build an axum `Router` over the given coordinator.
pub fn router<I, C, S>(coordinator: Arc<RedemptionCoordinator<I, C, S>>) -> Router
where
    I: InventoryGateway + 'static,
    C: CodeLedgerGateway + 'static,
    S: RandomSource + Send + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/prizes", get(prizes_handler::<I, C, S>))
        .route("/spin", post(spin_handler::<I, C, S>))
        .with_state(coordinator)
}

/// Serve the coordinator over HTTP at the given address (e.g. `"0.0.0.0:5000"`).
pub async fn serve<I, C, S>(
    coordinator: Arc<RedemptionCoordinator<I, C, S>>,
    addr: &str,
) -> Result<(), std::io::Error>
where
    I: InventoryGateway + 'static,
    C: CodeLedgerGateway + 'static,
    S: RandomSource + Send + 'static,
{
    let app = router(coordinator);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "prize wheel listening");
    axum::serve(listener, app).await
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// `GET /prizes` - the whole pool, for drawing the wheel.
async fn prizes_handler<I, C, S>(
    State(coordinator): State<Arc<RedemptionCoordinator<I, C, S>>>,
) -> impl IntoResponse
where
    I: InventoryGateway + 'static,
    C: CodeLedgerGateway + 'static,
    S: RandomSource + Send + 'static,
{
    let pool = tokio::task::spawn_blocking(move || coordinator.list_available_prizes_for_display())
        .await
        .unwrap_or_else(|err| {
            tracing::error!(error = %err, "prize listing task failed");
            DisplayPool::fallback()
        });
    Json(json!({
        "names": pool.names(),
        "segments": pool.segments,
        "degraded": pool.degraded,
    }))
}

/// `POST /spin` - redeem a code. The coordinator blocks on gateway locks,
/// so it runs on the blocking pool.
async fn spin_handler<I, C, S>(
    State(coordinator): State<Arc<RedemptionCoordinator<I, C, S>>>,
    payload: Result<Json<SpinRequest>, JsonRejection>,
) -> impl IntoResponse
where
    I: InventoryGateway + 'static,
    C: CodeLedgerGateway + 'static,
    S: RandomSource + Send + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "unreadable spin request");
            let outcome = RedeemOutcome::rejected(RedeemStatus::BadInput);
            return (StatusCode::BAD_REQUEST, Json(outcome));
        }
    };
    let outcome =
        tokio::task::spawn_blocking(move || coordinator.redeem(&request.code, &request.nickname))
            .await
            .unwrap_or_else(|err| {
                tracing::error!(error = %err, "redemption task failed");
                RedeemOutcome::rejected(RedeemStatus::Unavailable)
            });
    let status = StatusCode::from_u16(outcome.status.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(outcome))
}
