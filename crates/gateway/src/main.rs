//! # Uplink Gateway
//!
//! クォートの作成・状態照会と、署名で保護されたリンク取得を提供するHTTPサーバー。
//!
//! ## API エンドポイント
//! - `POST /getQuote`: クォート作成
//! - `GET /getStatus?quoteId=`: 状態照会
//! - `GET /getLink?quoteId=&nonce=&signature=`: 署名付きリンク取得

mod config;
mod endpoints;
mod error;

use std::sync::Arc;

use config::{GatewayConfig, GatewayState};
use endpoints::{handle_get_link, handle_get_quote, handle_get_status};

/// ルーティングを構築する。
fn build_router(state: Arc<GatewayState>) -> axum::Router {
    axum::Router::new()
        .route("/getQuote", axum::routing::post(handle_get_quote))
        .route("/getStatus", axum::routing::get(handle_get_status))
        .route("/getLink", axum::routing::get(handle_get_link))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// エントリポイント
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    match config.max_upload_size {
        Some(max) => tracing::info!(max_upload_size = max, "アップロードサイズ上限を設定"),
        None => tracing::warn!("MAX_UPLOAD_SIZEが未設定です。サイズ上限なしで起動します"),
    }

    let state = GatewayState::in_memory(&config);
    let app = build_router(state);

    tracing::info!("Gatewayを {} で起動します", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
