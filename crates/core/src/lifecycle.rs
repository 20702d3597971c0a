//! # クォートのライフサイクル
//!
//! ```text
//! WAITING ──▶ UPLOAD_START ──▶ UPLOAD_END
//!    │  └──────────────────────────▲
//!    └──▶ UPLOAD_FAILED ◀── UPLOAD_START
//!              └──▶ UPLOAD_START（再試行）
//! ```
//!
//! 状態の更新はアップロードパイプラインのみが行う。
//! 認可ゲートは「リンク発行可能（UPLOAD_END）か否か」だけを参照する。

use uplink_types::{Quote, QuoteStatus};

use crate::error::AuthError;

/// 作成時の状態。
pub const INITIAL_STATUS: QuoteStatus = QuoteStatus::Waiting;

/// リンク発行が可能な状態か。
pub fn is_link_ready(status: QuoteStatus) -> bool {
    status == QuoteStatus::UploadEnd
}

/// リンク発行の前提条件を検査する。
pub fn ensure_link_ready(quote: &Quote) -> Result<(), AuthError> {
    if is_link_ready(quote.status) {
        Ok(())
    } else {
        Err(AuthError::UploadNotComplete)
    }
}

/// 状態遷移が許可されているか。同じ状態への更新は常に許可する。
pub fn can_transition(from: QuoteStatus, to: QuoteStatus) -> bool {
    use QuoteStatus::*;

    from == to
        || matches!(
            (from, to),
            (Waiting, UploadStart)
                | (Waiting, UploadEnd)
                | (Waiting, UploadFailed)
                | (UploadStart, UploadEnd)
                | (UploadStart, UploadFailed)
                | (UploadFailed, UploadStart)
        )
}
