//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。

use std::sync::Arc;

use uplink_core::{MemoryNonceStore, MemoryQuoteStore, QuoteService};

/// デフォルトのバインドアドレス
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// 環境変数から読み込むGateway設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// HTTPサーバーのバインドアドレス（`GATEWAY_BIND_ADDR`）
    pub bind_addr: String,
    /// アップロード最大サイズ（バイト、`MAX_UPLOAD_SIZE`）。未設定または0で無制限。
    pub max_upload_size: Option<u64>,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から構築する。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr =
            lookup("GATEWAY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let max_upload_size = match lookup("MAX_UPLOAD_SIZE") {
            None => None,
            Some(raw) => {
                let size: u64 = raw.trim().parse().map_err(|e| {
                    anyhow::anyhow!("MAX_UPLOAD_SIZEは非負の整数である必要があります: {raw} ({e})")
                })?;
                (size > 0).then_some(size)
            }
        };

        Ok(Self {
            bind_addr,
            max_upload_size,
        })
    }
}

/// Gatewayの共有状態。
pub struct GatewayState {
    /// クォート操作と認可ゲート
    pub service: QuoteService,
    /// アップロード最大サイズ（バイト）
    pub max_upload_size: Option<u64>,
}

impl GatewayState {
    /// インメモリストアで状態を構築する。
    ///
    /// HTTPからは状態更新とリンク登録を行えない。アップロードパイプラインは
    /// 同じ `QuoteService`（`set_status` / `attach_link`）を共有して使う前提。
    pub fn in_memory(config: &GatewayConfig) -> Arc<Self> {
        Arc::new(Self {
            service: QuoteService::new(
                Arc::new(MemoryQuoteStore::new()),
                Arc::new(MemoryNonceStore::new()),
            ),
            max_upload_size: config.max_upload_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<GatewayConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.max_upload_size, None);
    }

    /// MAX_UPLOAD_SIZE=0 は無制限として扱われることを確認
    #[test]
    fn test_max_upload_size() {
        assert_eq!(
            config(&[("MAX_UPLOAD_SIZE", "1048576")]).unwrap().max_upload_size,
            Some(1_048_576)
        );
        assert_eq!(config(&[("MAX_UPLOAD_SIZE", "0")]).unwrap().max_upload_size, None);
        assert!(config(&[("MAX_UPLOAD_SIZE", "-1")]).is_err());
        assert!(config(&[("MAX_UPLOAD_SIZE", "1GB")]).is_err());
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(
            config(&[("GATEWAY_BIND_ADDR", "127.0.0.1:8080")]).unwrap().bind_addr,
            "127.0.0.1:8080"
        );
    }
}
