use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use roost_core::model::Profile;
use roost_core::Error;
use roost_gateway::AccountStatus;

use crate::error::Result;
use crate::state::AppState;

pub fn gateway_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/:handle", get(profile))
        .route("/:handle/status", get(status))
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "roost API",
        "endpoints": {
            "profile": "/@{handle}?cursor={cursor}",
            "status": "/@{handle}/status",
        },
    }))
}

#[derive(Deserialize)]
struct ProfileQuery {
    cursor: Option<String>,
}

async fn profile(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Profile>> {
    let handle = handle.trim_start_matches('@');
    let mut db = state
        .pool
        .get()
        .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
    let profile = state
        .gateway
        .fetch_profile(&mut db, handle, query.cursor.as_deref())
        .await?;
    Ok(Json(profile))
}

async fn status(State(state): State<AppState>, Path(handle): Path<String>) -> Result<Json<AccountStatus>> {
    let handle = handle.trim_start_matches('@');
    let mut db = state
        .pool
        .get()
        .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
    let status = state.gateway.fetch_status(&mut db, handle).await?;
    Ok(Json(status))
}
