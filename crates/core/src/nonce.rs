//! # リプレイ防止用nonce
//!
//! 任意精度の非負10進数。浮動小数点へ変換せず、正規化した桁列で比較する。
//!
//! 受理する表記は `digits` または `digits.digits`（符号・指数・空白なし）。
//! 整数部の先頭ゼロと小数部の末尾ゼロは比較に影響しない。
//! 受け取った文字列はそのまま保持し、正規メッセージと保存値にはこちらを使う。

use std::cmp::Ordering;

use crate::error::RequestError;

/// nonce文字列の最大長（2^256 の10進桁数）
pub const MAX_NONCE_LEN: usize = 78;

/// 任意精度の非負10進数nonce。
#[derive(Debug, Clone)]
pub struct Nonce {
    /// 受け取ったままの表記
    raw: String,
    /// 先頭ゼロを除いた整数部（ゼロは空文字列）
    integer: String,
    /// 末尾ゼロを除いた小数部
    fraction: String,
}

impl Nonce {
    /// 保存値が存在しない場合の基準値。
    pub fn zero() -> Self {
        Self {
            raw: "0".to_string(),
            integer: String::new(),
            fraction: String::new(),
        }
    }

    pub fn parse(s: &str) -> Result<Self, RequestError> {
        if s.is_empty() || s.len() > MAX_NONCE_LEN {
            return Err(RequestError::InvalidNonce);
        }

        let (integer, fraction) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if integer.is_empty() || !all_digits(integer) || !all_digits(fraction) {
            return Err(RequestError::InvalidNonce);
        }
        if s.ends_with('.') {
            return Err(RequestError::InvalidNonce);
        }

        Ok(Self {
            raw: s.to_string(),
            integer: integer.trim_start_matches('0').to_string(),
            fraction: fraction.trim_end_matches('0').to_string(),
        })
    }

    /// 受け取ったままの表記。
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 小数部を持つか（正規化後）。
    pub fn is_fractional(&self) -> bool {
        !self.fraction.is_empty()
    }
}

impl PartialEq for Nonce {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Nonce {}

impl PartialOrd for Nonce {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Nonce {
    fn cmp(&self, other: &Self) -> Ordering {
        // 先頭ゼロを除いた整数部は桁数→辞書順、末尾ゼロを除いた小数部は辞書順で比較できる
        self.integer
            .len()
            .cmp(&other.integer.len())
            .then_with(|| self.integer.cmp(&other.integer))
            .then_with(|| self.fraction.cmp(&other.fraction))
    }
}

impl std::fmt::Display for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for Nonce {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
