//! # Nonce Guard
//!
//! アドレスごとに狭義単調増加するnonceでリプレイを防止する。
//!
//! 比較と保存は `NonceStore::compare_and_set` で一体化する。
//! 競合時は他のリクエストが保存した値を読み直して再評価するため、
//! 同じ基準値に対する並行リクエストが両方受理されることはない。

use std::sync::Arc;

use uplink_crypto::Address;

use crate::error::{AuthError, StoreError};
use crate::nonce::Nonce;
use crate::store::NonceStore;

/// compare-and-set競合時の再評価回数の上限
pub const MAX_CAS_ATTEMPTS: usize = 32;

/// nonceの検証と更新を行う。
#[derive(Clone)]
pub struct NonceGuard {
    store: Arc<dyn NonceStore>,
}

impl NonceGuard {
    pub fn new(store: Arc<dyn NonceStore>) -> Self {
        Self { store }
    }

    /// 保存済みnonce（未保存なら0）。
    pub async fn current(&self, address: &Address) -> Result<Nonce, StoreError> {
        Ok(self.store.get(address).await?.unwrap_or_else(Nonce::zero))
    }

    /// `candidate` が保存済みの値より大きい場合に限り保存する。
    ///
    /// - 保存済みの値以下: `ReplayedNonce`（同値の再送と後退の両方）
    /// - ストア失敗、または競合が続いた場合: `StorageFailure`
    pub async fn check_and_advance(
        &self,
        address: &Address,
        candidate: &Nonce,
    ) -> Result<(), AuthError> {
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let stored = self.store.get(address).await?;
            let baseline = stored.clone().unwrap_or_else(Nonce::zero);

            if *candidate <= baseline {
                return Err(AuthError::ReplayedNonce);
            }

            if self
                .store
                .compare_and_set(address, stored.as_ref(), candidate)
                .await?
            {
                return Ok(());
            }

            tracing::debug!(
                address = %address,
                attempt,
                "nonce更新が競合しました。再評価します"
            );
        }

        Err(AuthError::StorageFailure(format!(
            "nonce更新の競合が{MAX_CAS_ATTEMPTS}回続きました"
        )))
    }
}
