//! # インメモリストア
//!
//! 単一プロセス用の `QuoteStore` / `NonceStore` 実装。
//! compare-and-setは書き込みロック内で比較と更新を行うため原子的。

use std::collections::HashMap;

use tokio::sync::RwLock;
use uplink_crypto::Address;
use uplink_types::{LinkPayload, Quote, QuoteStatus};

use crate::error::StoreError;
use crate::id::QuoteId;
use crate::nonce::Nonce;
use crate::store::{NonceStore, QuoteStore};

/// クォートとリンクのインメモリ保存先。
#[derive(Default)]
pub struct MemoryQuoteStore {
    quotes: RwLock<HashMap<String, Quote>>,
    links: RwLock<HashMap<String, LinkPayload>>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn create(&self, quote: Quote) -> Result<(), StoreError> {
        let mut quotes = self.quotes.write().await;
        if quotes.contains_key(&quote.quote_id) {
            return Err(StoreError::Conflict(quote.quote_id));
        }
        quotes.insert(quote.quote_id.clone(), quote);
        Ok(())
    }

    async fn get(&self, quote_id: &QuoteId) -> Result<Option<Quote>, StoreError> {
        Ok(self.quotes.read().await.get(quote_id.as_str()).cloned())
    }

    async fn compare_and_set_status(
        &self,
        quote_id: &QuoteId,
        expected: QuoteStatus,
        new: QuoteStatus,
    ) -> Result<bool, StoreError> {
        let mut quotes = self.quotes.write().await;
        let quote = quotes
            .get_mut(quote_id.as_str())
            .ok_or_else(|| StoreError::Missing(quote_id.to_string()))?;
        if quote.status != expected {
            return Ok(false);
        }
        quote.status = new;
        Ok(true)
    }

    async fn get_link(&self, quote_id: &QuoteId) -> Result<Option<LinkPayload>, StoreError> {
        Ok(self.links.read().await.get(quote_id.as_str()).cloned())
    }

    async fn set_link(&self, quote_id: &QuoteId, link: LinkPayload) -> Result<(), StoreError> {
        if !self.quotes.read().await.contains_key(quote_id.as_str()) {
            return Err(StoreError::Missing(quote_id.to_string()));
        }
        self.links
            .write()
            .await
            .insert(quote_id.as_str().to_string(), link);
        Ok(())
    }
}

/// nonceのインメモリ保存先。
#[derive(Default)]
pub struct MemoryNonceStore {
    nonces: RwLock<HashMap<Address, Nonce>>,
}

impl MemoryNonceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl NonceStore for MemoryNonceStore {
    async fn get(&self, address: &Address) -> Result<Option<Nonce>, StoreError> {
        Ok(self.nonces.read().await.get(address).cloned())
    }

    async fn compare_and_set(
        &self,
        address: &Address,
        expected: Option<&Nonce>,
        new: &Nonce,
    ) -> Result<bool, StoreError> {
        let mut nonces = self.nonces.write().await;
        if nonces.get(address) != expected {
            return Ok(false);
        }
        nonces.insert(*address, new.clone());
        Ok(true)
    }
}
