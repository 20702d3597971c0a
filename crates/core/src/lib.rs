//! # Uplink Core
//!
//! クォートのライフサイクル管理と、リンク取得の認可ゲートを実装する。
//!
//! ## 処理フロー
//! 1. トランスポート層が入力を `validation` で検証する
//! 2. `QuoteService` がクォートを解決し、状態を確認する
//! 3. 署名者アドレスを復元し、クォート作成者と照合する
//! 4. `NonceGuard` がnonceを検証・更新する
//! 5. リンクを返す

pub mod error;
pub mod guard;
pub mod id;
pub mod lifecycle;
pub mod memory;
pub mod nonce;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{AuthError, RequestError, StoreError};
pub use guard::NonceGuard;
pub use id::QuoteId;
pub use memory::{MemoryNonceStore, MemoryQuoteStore};
pub use nonce::Nonce;
pub use service::QuoteService;
pub use store::{NonceStore, QuoteStore};
pub use validation::{CreateQuote, LinkRequest};
