//! # GET /getStatus

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use uplink_core::validation::validate_status_query;
use uplink_types::{StatusQuery, StatusResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;

/// GET /getStatus: クォートの現在の状態を返す。
pub async fn handle_get_status(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, GatewayError> {
    let quote_id = validate_status_query(&query)?;

    let status = state
        .service
        .status(&quote_id)
        .await?
        .ok_or(GatewayError::NotFound("クォート"))?;

    Ok(Json(StatusResponse { status }))
}
