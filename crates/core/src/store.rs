//! # 永続化コラボレータ
//!
//! クォートレコードとnonceの保存先の抽象インターフェース。
//! 複数インスタンスから共有されるキーバリューストアを想定し、
//! nonceはキーごとのcompare-and-setで更新する。
//! インメモリ実装は `memory` モジュールを参照。

use uplink_crypto::Address;
use uplink_types::{LinkPayload, Quote, QuoteStatus};

use crate::error::StoreError;
use crate::id::QuoteId;
use crate::nonce::Nonce;

/// クォートレコードの保存先。
#[async_trait::async_trait]
pub trait QuoteStore: Send + Sync {
    /// 新しいクォートを保存する。同じIDが存在する場合は `Conflict`。
    async fn create(&self, quote: Quote) -> Result<(), StoreError>;

    /// クォートを取得する。
    async fn get(&self, quote_id: &QuoteId) -> Result<Option<Quote>, StoreError>;

    /// 現在の状態が `expected` と等しい場合に限り `new` に更新する。
    ///
    /// 更新した場合は `true`、現在の状態が一致せず更新しなかった場合は `false`。
    /// クォートが存在しない場合は `Missing`。
    async fn compare_and_set_status(
        &self,
        quote_id: &QuoteId,
        expected: QuoteStatus,
        new: QuoteStatus,
    ) -> Result<bool, StoreError>;

    /// アップロードパイプラインが登録したリンクを取得する。
    async fn get_link(&self, quote_id: &QuoteId) -> Result<Option<LinkPayload>, StoreError>;

    /// リンクを登録する。クォートが存在しない場合は `Missing`。
    async fn set_link(&self, quote_id: &QuoteId, link: LinkPayload) -> Result<(), StoreError>;
}

/// アドレスごとの最終受理nonceの保存先。
#[async_trait::async_trait]
pub trait NonceStore: Send + Sync {
    /// 保存済みnonceを取得する。未保存なら `None`。
    async fn get(&self, address: &Address) -> Result<Option<Nonce>, StoreError>;

    /// 現在値が `expected` と等しい場合に限り `new` を保存する。
    ///
    /// `expected` が `None` の場合は未保存であることを条件とする。
    /// 保存した場合は `true`、現在値が一致せず保存しなかった場合は `false`。
    async fn compare_and_set(
        &self,
        address: &Address,
        expected: Option<&Nonce>,
        new: &Nonce,
    ) -> Result<bool, StoreError>;
}
