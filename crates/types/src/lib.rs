//! # Uplink 共有型定義
//!
//! Gateway・Core・CLIで共有するクォートレコードとHTTPリクエスト/レスポンスの型。
//!
//! ## エンコーディング規則
//! - JSONフィールド名はcamelCase（既存クライアントとの互換性のため）
//! - EVMアドレス: `0x` プレフィックス付きEIP-55チェックサム形式
//! - クォートID: 32文字の16進数文字列

use serde::{Deserialize, Serialize};

/// ゼロアドレス。支払い関連のプレースホルダとして使用する。
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// 受け付けるストレージ種別。
pub const QUOTE_TYPE_IPFS: &str = "ipfs";

/// 1クォートあたりの最大ファイル数。
pub const MAX_FILES_PER_QUOTE: usize = 64;

// ---------------------------------------------------------------------------
// クォートレコード
// ---------------------------------------------------------------------------

/// クォートのライフサイクル状態。
///
/// `Waiting` で作成され、アップロードパイプラインが `UploadStart` → `UploadEnd`
/// と遷移させる。リンクの発行は `UploadEnd` でのみ許可される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    /// 作成直後。アップロード待ち。
    Waiting,
    /// アップロード処理中。
    UploadStart,
    /// アップロード完了。リンク取得可能。
    UploadEnd,
    /// アップロード失敗。
    UploadFailed,
}

impl QuoteStatus {
    /// ワイヤ上の文字列表現。
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Waiting => "WAITING",
            QuoteStatus::UploadStart => "UPLOAD_START",
            QuoteStatus::UploadEnd => "UPLOAD_END",
            QuoteStatus::UploadFailed => "UPLOAD_FAILED",
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ファイル群のアップロード枠を予約するクォート。
///
/// `user_address` は作成時に設定され、以後変更されない。
/// リンク取得時の署名はこのアドレスに対して検証される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// クォートID（16バイト乱数の16進数表現）
    pub quote_id: String,
    /// ストレージ種別（現状 "ipfs" のみ）
    #[serde(rename = "type")]
    pub quote_type: String,
    /// ライフサイクル状態
    pub status: QuoteStatus,
    /// 作成時刻（UNIXミリ秒）
    pub created: u64,
    /// チェーンID（支払い未対応のため "0"）
    pub chain_id: String,
    /// 支払いトークンのアドレス（ゼロアドレス）
    pub token_address: String,
    /// クォートを作成したアドレス（EIP-55チェックサム形式）
    pub user_address: String,
    /// 支払いトークン量（"0"）
    pub token_amount: String,
    /// approve先アドレス（ゼロアドレス）
    pub approve_address: String,
    /// 各ファイルのバイト長（作成時の順序を保持）
    pub files: Vec<u64>,
}

impl Quote {
    /// 全ファイルの合計バイト長。u64を超える場合は `u64::MAX` に飽和する。
    pub fn total_length(&self) -> u64 {
        self.files.iter().fold(0u64, |acc, &len| acc.saturating_add(len))
    }
}

// ---------------------------------------------------------------------------
// POST /getQuote
// ---------------------------------------------------------------------------

/// /getQuote リクエスト。
///
/// Gatewayは生のJSONをスキーマ検証するため、この型はクライアント側の
/// リクエスト構築に使用する。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    /// ストレージ種別
    #[serde(rename = "type")]
    pub quote_type: String,
    /// クォートを作成するアドレス
    pub user_address: String,
    /// アップロード予定のファイル
    pub files: Vec<FileEntry>,
}

/// /getQuote リクエストの個別ファイル。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// ファイルのバイト長
    pub length: u64,
}

// ---------------------------------------------------------------------------
// GET /getStatus
// ---------------------------------------------------------------------------

/// /getStatus クエリ。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    /// クォートID
    pub quote_id: Option<String>,
}

/// /getStatus レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// 現在のライフサイクル状態
    pub status: QuoteStatus,
}

// ---------------------------------------------------------------------------
// GET /getLink
// ---------------------------------------------------------------------------

/// /getLink クエリ。
///
/// `signature` は `SHA256(quoteId + nonce)` の16進数表現に対する
/// personal_sign 署名。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkQuery {
    /// クォートID
    pub quote_id: Option<String>,
    /// リプレイ防止用nonce（10進数文字列）
    pub nonce: Option<String>,
    /// 16進数エンコードされた署名
    pub signature: Option<String>,
}

/// アップロードパイプラインが生成するアクセスリンク。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPayload {
    /// 対象のクォートID
    pub quote_id: String,
    /// ファイルごとのアクセスリンク
    pub links: Vec<String>,
}
