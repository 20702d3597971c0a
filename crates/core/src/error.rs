//! # Core エラー型
//!
//! - `AuthError`: リンク取得の認可ゲートが返す失敗種別
//! - `RequestError`: ゲート呼び出し前の入力検証の失敗
//! - `StoreError`: 永続化コラボレータの失敗

/// 永続化コラボレータのエラー型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// バックエンドへのアクセスに失敗
    #[error("ストレージへのアクセスに失敗: {0}")]
    Backend(String),
    /// 既に同じキーのレコードが存在する
    #[error("レコードが既に存在します: {0}")]
    Conflict(String),
    /// 更新対象のレコードが存在しない
    #[error("レコードが存在しません: {0}")]
    Missing(String),
}

/// リンク取得認可のエラー型。
///
/// `StorageFailure` 以外はクライアント起因の失敗。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// クォートまたはリンクが存在しない
    #[error("{0}が見つかりません")]
    NotFound(&'static str),
    /// クォートがまだ UPLOAD_END 状態でない
    #[error("アップロードが完了していません")]
    UploadNotComplete,
    /// 署名の形式不正、または公開鍵の復元に失敗
    #[error("不正な署名: {0}")]
    InvalidSignature(String),
    /// 署名者がクォート作成者と一致しない
    #[error("署名者がクォート作成者と一致しません")]
    Forbidden,
    /// nonceが保存済みの値より大きくない
    #[error("nonceが既に使用済みです")]
    ReplayedNonce,
    /// コラボレータのI/O失敗
    #[error("ストレージ操作に失敗: {0}")]
    StorageFailure(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        AuthError::StorageFailure(e.to_string())
    }
}

impl From<uplink_crypto::CryptoError> for AuthError {
    fn from(e: uplink_crypto::CryptoError) -> Self {
        AuthError::InvalidSignature(e.to_string())
    }
}

/// 入力検証のエラー型。
///
/// フィールドごとに固有の種別を持ち、メッセージはそのままクライアントに返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("リクエスト本文が空です")]
    EmptyBody,
    #[error("typeが指定されていません")]
    MissingType,
    #[error("typeが不正です")]
    InvalidType,
    #[error("userAddressが指定されていません")]
    MissingUserAddress,
    #[error("userAddressが不正です")]
    InvalidUserAddress,
    #[error("filesが指定されていません")]
    MissingFiles,
    #[error("filesが不正です")]
    InvalidFiles,
    #[error("filesが空です")]
    EmptyFiles,
    #[error("ファイル数が多すぎます（最大{max}）")]
    TooManyFiles { max: usize },
    #[error("ファイル長が不正です")]
    InvalidFileLength,
    #[error("ファイル長は1以上である必要があります")]
    FileLengthTooSmall,
    #[error("個々のファイルは{max}バイトを超えられません")]
    FileTooLarge { max: u64 },
    #[error("ファイル長の合計は{max}バイトを超えられません")]
    TotalTooLarge { max: u64 },
    #[error("quoteIdが指定されていません")]
    MissingQuoteId,
    #[error("quoteIdの形式が不正です")]
    InvalidQuoteId,
    #[error("nonceが指定されていません")]
    MissingNonce,
    #[error("nonceの形式が不正です")]
    InvalidNonce,
    #[error("signatureが指定されていません")]
    MissingSignature,
}
