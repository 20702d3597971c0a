//! # 入力検証
//!
//! 認可ゲートやクォート作成の前段で行う入力検証。
//! クォート作成リクエストはフィールドごとの宣言的スキーマで検証し、
//! 各チェックは固有の `RequestError` に対応する。

use serde_json::Value;
use uplink_crypto::Address;
use uplink_types::{LinkQuery, StatusQuery, MAX_FILES_PER_QUOTE, QUOTE_TYPE_IPFS};

use crate::error::RequestError;
use crate::id::QuoteId;
use crate::nonce::Nonce;

// ---------------------------------------------------------------------------
// スキーマ定義
// ---------------------------------------------------------------------------

/// フィールドに適用するチェック。
#[derive(Debug, Clone, Copy)]
enum Check {
    /// JSON文字列
    IsString,
    /// 許可された値のいずれか
    OneOf(&'static [&'static str]),
    /// EVMアドレスとして受理可能
    EvmAddress,
    /// JSON配列
    IsArray,
    /// 空でない配列
    NonEmpty,
    /// 配列の要素数上限
    MaxItems(usize),
}

impl Check {
    fn passes(&self, value: &Value) -> bool {
        match self {
            Check::IsString => value.is_string(),
            Check::OneOf(allowed) => value.as_str().is_some_and(|s| allowed.iter().any(|a| *a == s)),
            Check::EvmAddress => value.as_str().is_some_and(Address::is_valid),
            Check::IsArray => value.is_array(),
            Check::NonEmpty => value.as_array().is_some_and(|a| !a.is_empty()),
            Check::MaxItems(max) => value.as_array().is_some_and(|a| a.len() <= *max),
        }
    }
}

/// 1フィールド分のスキーマ。チェックは宣言順に評価する。
struct FieldSchema {
    name: &'static str,
    missing: RequestError,
    checks: &'static [(Check, RequestError)],
}

impl FieldSchema {
    fn validate<'a>(&self, body: &'a Value) -> Result<&'a Value, RequestError> {
        let value = body.get(self.name).ok_or(self.missing)?;
        for (check, error) in self.checks {
            if !check.passes(value) {
                return Err(*error);
            }
        }
        Ok(value)
    }
}

const TYPE_FIELD: FieldSchema = FieldSchema {
    name: "type",
    missing: RequestError::MissingType,
    checks: &[
        (Check::IsString, RequestError::InvalidType),
        (Check::OneOf(&[QUOTE_TYPE_IPFS]), RequestError::InvalidType),
    ],
};

const USER_ADDRESS_FIELD: FieldSchema = FieldSchema {
    name: "userAddress",
    missing: RequestError::MissingUserAddress,
    checks: &[
        (Check::IsString, RequestError::InvalidUserAddress),
        (Check::EvmAddress, RequestError::InvalidUserAddress),
    ],
};

const FILES_FIELD: FieldSchema = FieldSchema {
    name: "files",
    missing: RequestError::MissingFiles,
    checks: &[
        (Check::IsArray, RequestError::InvalidFiles),
        (Check::NonEmpty, RequestError::EmptyFiles),
        (
            Check::MaxItems(MAX_FILES_PER_QUOTE),
            RequestError::TooManyFiles {
                max: MAX_FILES_PER_QUOTE,
            },
        ),
    ],
};

// ---------------------------------------------------------------------------
// クォート作成
// ---------------------------------------------------------------------------

/// 検証済みのクォート作成要求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateQuote {
    /// クォートを作成するアドレス
    pub user_address: Address,
    /// 各ファイルのバイト長
    pub files: Vec<u64>,
}

/// クォート作成リクエストのJSONを検証する。
///
/// `max_upload_size` が `Some` の場合、個々のファイル長と合計長の上限として使う。
pub fn validate_create_quote(
    body: &Value,
    max_upload_size: Option<u64>,
) -> Result<CreateQuote, RequestError> {
    if !body.is_object() {
        return Err(RequestError::EmptyBody);
    }

    TYPE_FIELD.validate(body)?;
    let user_address = USER_ADDRESS_FIELD.validate(body)?;
    let files = FILES_FIELD.validate(body)?;

    let user_address = user_address
        .as_str()
        .and_then(|s| Address::parse(s).ok())
        .ok_or(RequestError::InvalidUserAddress)?;
    let entries = files.as_array().ok_or(RequestError::InvalidFiles)?;

    let mut lengths = Vec::with_capacity(entries.len());
    let mut total: u64 = 0;
    for entry in entries {
        let length = entry
            .as_object()
            .and_then(|o| o.get("length"))
            .ok_or(RequestError::InvalidFiles)?;
        let length = parse_file_length(length)?;

        if let Some(max) = max_upload_size {
            if length > max {
                return Err(RequestError::FileTooLarge { max });
            }
        }
        total = total.saturating_add(length);
        lengths.push(length);
    }

    if let Some(max) = max_upload_size {
        if total > max {
            return Err(RequestError::TotalTooLarge { max });
        }
    }

    Ok(CreateQuote {
        user_address,
        files: lengths,
    })
}

/// ファイル長をパースする。
///
/// 数値、または空白のみでない10進数文字列を受け付け、小数部は切り捨てる。
/// 文字列の指数表記（`"1e3"`）や `"Infinity"` は受け付けない。
fn parse_file_length(value: &Value) -> Result<u64, RequestError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            let decimal = !s.is_empty()
                && s.bytes()
                    .all(|b| b.is_ascii_digit() || b == b'.' || b == b'-' || b == b'+');
            if decimal {
                s.parse::<f64>().ok()
            } else {
                None
            }
        }
        _ => None,
    };
    let length = parsed
        .filter(|f| f.is_finite())
        .ok_or(RequestError::InvalidFileLength)?
        .trunc();

    if length <= 0.0 {
        return Err(RequestError::FileLengthTooSmall);
    }
    // u64の範囲を超える値は飽和させ、上限チェックに任せる
    Ok(length as u64)
}

// ---------------------------------------------------------------------------
// クエリ
// ---------------------------------------------------------------------------

/// 検証済みのリンク取得要求。
#[derive(Debug, Clone)]
pub struct LinkRequest {
    pub quote_id: QuoteId,
    pub nonce: Nonce,
    pub signature: String,
}

/// クォートIDの必須チェックと形式チェック。
pub fn validate_quote_id(quote_id: Option<&str>) -> Result<QuoteId, RequestError> {
    match quote_id {
        None | Some("") => Err(RequestError::MissingQuoteId),
        Some(id) => QuoteId::parse(id),
    }
}

/// /getStatus クエリを検証する。
pub fn validate_status_query(query: &StatusQuery) -> Result<QuoteId, RequestError> {
    validate_quote_id(query.quote_id.as_deref())
}

/// /getLink クエリを検証する。ストレージ参照より前に呼ぶこと。
pub fn validate_link_query(query: &LinkQuery) -> Result<LinkRequest, RequestError> {
    let quote_id = validate_quote_id(query.quote_id.as_deref())?;
    let nonce = query.nonce.as_deref().ok_or(RequestError::MissingNonce)?;
    let nonce = Nonce::parse(nonce)?;
    let signature = query
        .signature
        .clone()
        .ok_or(RequestError::MissingSignature)?;

    Ok(LinkRequest {
        quote_id,
        nonce,
        signature,
    })
}
