//! # POST /getQuote
//!
//! クォートの作成。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use uplink_core::validation::validate_create_quote;
use uplink_core::RequestError;
use uplink_types::Quote;

use crate::config::GatewayState;
use crate::error::GatewayError;

/// POST /getQuote: リクエストを検証し、`WAITING` 状態のクォートを作成する。
///
/// JSONとして解釈できない本文は空の本文と同じく扱う。
pub async fn handle_get_quote(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Quote>, GatewayError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!(error = %e, "リクエスト本文をJSONとして解釈できません");
        RequestError::EmptyBody
    })?;

    let request = validate_create_quote(&body, state.max_upload_size)?;
    let quote = state.service.create_quote(request).await?;

    Ok(Json(quote))
}
