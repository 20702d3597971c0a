//! # Gateway エラー型
//!
//! コアのエラーをHTTPステータスに対応付ける。
//! 署名不正と署名者不一致は同じ応答にし、どちらで失敗したかを区別させない。
//! 内部エラーの詳細はログにのみ出力する。

use axum::http::StatusCode;
use uplink_core::{AuthError, RequestError, StoreError};

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 入力検証の失敗
    #[error("不正なリクエスト: {0}")]
    BadRequest(#[from] RequestError),
    /// クォートまたはリンクが存在しない
    #[error("{0}が見つかりません")]
    NotFound(&'static str),
    /// アップロード未完了
    #[error("アップロードが完了していません")]
    UploadNotComplete,
    /// 署名不正または署名者不一致
    #[error("署名が不正です")]
    InvalidSignature,
    /// 使用済みnonce
    #[error("nonceが不正です")]
    InvalidNonce,
    /// ストレージ等の内部エラー（詳細はクライアントに返さない）
    #[error("内部エラーが発生しました")]
    Internal(String),
}

impl From<AuthError> for GatewayError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotFound(what) => GatewayError::NotFound(what),
            AuthError::UploadNotComplete => GatewayError::UploadNotComplete,
            AuthError::InvalidSignature(_) | AuthError::Forbidden => GatewayError::InvalidSignature,
            AuthError::ReplayedNonce => GatewayError::InvalidNonce,
            AuthError::StorageFailure(detail) => GatewayError::Internal(detail),
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(e: StoreError) -> Self {
        GatewayError::Internal(e.to_string())
    }
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) | GatewayError::UploadNotComplete => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidSignature | GatewayError::InvalidNonce => StatusCode::FORBIDDEN,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        if let GatewayError::Internal(detail) = &self {
            tracing::error!(error = %detail, "内部エラー");
        }
        (self.status_code(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    /// 署名不正と署名者不一致が同じ応答になることを確認
    #[test]
    fn test_no_oracle_between_signature_failures() {
        let invalid: GatewayError = AuthError::InvalidSignature("bad v".to_string()).into();
        let forbidden: GatewayError = AuthError::Forbidden.into();
        assert_eq!(invalid.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(invalid.to_string(), forbidden.to_string());
    }

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(GatewayError, StatusCode)> = vec![
            (RequestError::MissingNonce.into(), StatusCode::BAD_REQUEST),
            (AuthError::UploadNotComplete.into(), StatusCode::BAD_REQUEST),
            (AuthError::NotFound("クォート").into(), StatusCode::NOT_FOUND),
            (AuthError::ReplayedNonce.into(), StatusCode::FORBIDDEN),
            (
                AuthError::StorageFailure("redis down".to_string()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                StoreError::Backend("redis down".to_string()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    /// 内部エラーの詳細がメッセージに含まれないことを確認
    #[test]
    fn test_internal_detail_hidden() {
        let error: GatewayError = AuthError::StorageFailure("redis://secret-host".to_string()).into();
        assert!(!error.to_string().contains("secret-host"));
    }

    #[test]
    fn test_request_error_message_passed_through() {
        let error: GatewayError = RequestError::MissingFiles.into();
        assert!(error.to_string().contains("filesが指定されていません"));
    }
}
