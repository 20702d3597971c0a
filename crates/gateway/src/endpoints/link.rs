//! # GET /getLink
//!
//! 署名とnonceによる認可を経て、アップロード済みファイルのリンクを返す。

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use uplink_core::validation::validate_link_query;
use uplink_types::{LinkPayload, LinkQuery};

use crate::config::GatewayState;
use crate::error::GatewayError;

/// GET /getLink: クォート作成者の署名を検証し、リンクを返す。
///
/// クエリの検証はストレージ参照より前に行う。
pub async fn handle_get_link(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<LinkQuery>,
) -> Result<Json<LinkPayload>, GatewayError> {
    let request = validate_link_query(&query)?;
    let link = state.service.authorize_and_fetch_link(&request).await?;
    Ok(Json(link))
}
