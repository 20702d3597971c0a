//! # クォートサービス
//!
//! クォートの作成・状態参照と、リンク取得の認可ゲート。
//!
//! ## 認可ゲートの順序
//! 1. クォートの解決（なければ `NotFound`）
//! 2. 状態が `UPLOAD_END` であること（暗号処理より前に判定）
//! 3. `(quoteId, nonce)` からダイジェストを構築
//! 4. 署名者アドレスの復元
//! 5. クォート作成者との照合
//! 6. Nonce Guard による検証と更新
//! 7. リンクの取得
//!
//! 署名が不正な場合、nonceは一切更新されない。

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use uplink_crypto::{link_message_digest, recover_signer, Address};
use uplink_types::{LinkPayload, Quote, QuoteStatus, QUOTE_TYPE_IPFS, ZERO_ADDRESS};

use crate::error::{AuthError, StoreError};
use crate::guard::{NonceGuard, MAX_CAS_ATTEMPTS};
use crate::id::QuoteId;
use crate::lifecycle::{can_transition, ensure_link_ready, INITIAL_STATUS};
use crate::nonce::Nonce;
use crate::store::{NonceStore, QuoteStore};
use crate::validation::{CreateQuote, LinkRequest};

/// クォート操作のエントリポイント。
#[derive(Clone)]
pub struct QuoteService {
    quotes: Arc<dyn QuoteStore>,
    nonce_guard: NonceGuard,
}

impl QuoteService {
    pub fn new(quotes: Arc<dyn QuoteStore>, nonces: Arc<dyn NonceStore>) -> Self {
        Self {
            quotes,
            nonce_guard: NonceGuard::new(nonces),
        }
    }

    // -----------------------------------------------------------------------
    // 作成・参照
    // -----------------------------------------------------------------------

    /// 新しいクォートを `WAITING` 状態で作成する。
    ///
    /// 支払いは未対応のため、チェーン・トークン関連のフィールドはプレースホルダ。
    pub async fn create_quote(&self, request: CreateQuote) -> Result<Quote, StoreError> {
        let quote = Quote {
            quote_id: QuoteId::generate().to_string(),
            quote_type: QUOTE_TYPE_IPFS.to_string(),
            status: INITIAL_STATUS,
            created: now_millis(),
            chain_id: "0".to_string(),
            token_address: ZERO_ADDRESS.to_string(),
            user_address: request.user_address.to_checksum(),
            token_amount: "0".to_string(),
            approve_address: ZERO_ADDRESS.to_string(),
            files: request.files,
        };

        self.quotes.create(quote.clone()).await?;
        tracing::info!(
            quote_id = %quote.quote_id,
            user_address = %quote.user_address,
            files = quote.files.len(),
            total_length = quote.total_length(),
            "クォートを作成しました"
        );
        Ok(quote)
    }

    /// クォートの現在の状態。存在しなければ `None`。
    pub async fn status(&self, quote_id: &QuoteId) -> Result<Option<QuoteStatus>, StoreError> {
        Ok(self.quotes.get(quote_id).await?.map(|q| q.status))
    }

    /// 保存済みnonce（未使用なら0）。
    pub async fn current_nonce(&self, address: &Address) -> Result<Nonce, StoreError> {
        self.nonce_guard.current(address).await
    }

    // -----------------------------------------------------------------------
    // アップロードパイプライン用
    // -----------------------------------------------------------------------

    /// 状態を更新する。
    ///
    /// 遷移の検査と書き込みは `compare_and_set_status` で一体化し、
    /// 競合した場合は最新の状態を読み直して遷移を再検査する。
    /// パイプラインは結果に依存しないため、失敗や不正な遷移はログに残して握りつぶす。
    pub async fn set_status(&self, quote_id: &QuoteId, status: QuoteStatus) {
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let current = match self.quotes.get(quote_id).await {
                Ok(Some(quote)) => quote.status,
                Ok(None) => {
                    tracing::warn!(quote_id = %quote_id, %status, "状態更新の対象クォートが存在しません");
                    return;
                }
                Err(e) => {
                    tracing::error!(quote_id = %quote_id, error = %e, "状態の読み出しに失敗しました");
                    return;
                }
            };

            if !can_transition(current, status) {
                tracing::warn!(
                    quote_id = %quote_id,
                    from = %current,
                    to = %status,
                    "許可されていない状態遷移です"
                );
                return;
            }

            match self
                .quotes
                .compare_and_set_status(quote_id, current, status)
                .await
            {
                Ok(true) => {
                    tracing::info!(quote_id = %quote_id, %status, "状態を更新しました");
                    return;
                }
                Ok(false) => {
                    tracing::debug!(
                        quote_id = %quote_id,
                        attempt,
                        "状態更新が競合しました。再評価します"
                    );
                }
                Err(e) => {
                    tracing::error!(quote_id = %quote_id, error = %e, "状態の更新に失敗しました");
                    return;
                }
            }
        }

        tracing::error!(
            quote_id = %quote_id,
            %status,
            "状態更新の競合が{MAX_CAS_ATTEMPTS}回続きました"
        );
    }

    /// パイプラインが生成したリンクを保存する。
    pub async fn attach_link(&self, quote_id: &QuoteId, links: Vec<String>) -> Result<(), StoreError> {
        let payload = LinkPayload {
            quote_id: quote_id.to_string(),
            links,
        };
        self.quotes.set_link(quote_id, payload).await?;
        tracing::info!(quote_id = %quote_id, "リンクを保存しました");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // 認可ゲート
    // -----------------------------------------------------------------------

    /// 署名とnonceを検証し、クォート作成者にのみリンクを返す。
    pub async fn authorize_and_fetch_link(
        &self,
        request: &LinkRequest,
    ) -> Result<LinkPayload, AuthError> {
        let quote_id = &request.quote_id;

        let quote = self
            .quotes
            .get(quote_id)
            .await?
            .ok_or(AuthError::NotFound("クォート"))?;

        if let Err(e) = ensure_link_ready(&quote) {
            tracing::warn!(quote_id = %quote_id, status = %quote.status, "アップロード未完了のクォートです");
            return Err(e);
        }

        let digest = link_message_digest(quote_id.as_str(), request.nonce.as_str());
        let signer = recover_signer(&digest, &request.signature).map_err(|e| {
            tracing::warn!(quote_id = %quote_id, error = %e, "署名の検証に失敗しました");
            AuthError::from(e)
        })?;

        let owner = Address::parse(&quote.user_address).map_err(|e| {
            AuthError::StorageFailure(format!("保存済みのuserAddressが不正です: {e}"))
        })?;
        if signer != owner {
            tracing::warn!(
                quote_id = %quote_id,
                signer = %signer,
                "署名者がクォート作成者と一致しません"
            );
            return Err(AuthError::Forbidden);
        }

        if let Err(e) = self.nonce_guard.check_and_advance(&owner, &request.nonce).await {
            tracing::warn!(
                quote_id = %quote_id,
                nonce = %request.nonce,
                error = %e,
                "nonceが拒否されました"
            );
            return Err(e);
        }

        let link = self
            .quotes
            .get_link(quote_id)
            .await?
            .ok_or(AuthError::NotFound("リンク"))?;

        tracing::info!(quote_id = %quote_id, nonce = %request.nonce, "リンクを発行しました");
        Ok(link)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
