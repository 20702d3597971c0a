//! # クォートID
//!
//! 16バイト乱数の16進数表現（32文字）。外部に公開されるケイパビリティ参照として扱う。

use rand::RngCore;

use crate::error::RequestError;

/// クォートIDの文字数
pub const QUOTE_ID_LEN: usize = 32;

/// 形式検証済みのクォートID。
///
/// 大文字小文字は区別せずに形式を検証するが、値は受け取ったまま保持する
/// （正規メッセージにはクライアントが送った文字列がそのまま入るため）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteId(String);

impl QuoteId {
    /// 新しいクォートIDを生成する。
    pub fn generate() -> Self {
        let mut bytes = [0u8; QUOTE_ID_LEN / 2];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// `^[a-fA-F0-9]{32}$` に一致する文字列のみ受理する。
    pub fn parse(s: &str) -> Result<Self, RequestError> {
        if s.len() == QUOTE_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(RequestError::InvalidQuoteId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_format() {
        let id = QuoteId::generate();
        assert_eq!(id.as_str().len(), QUOTE_ID_LEN);
        assert!(id
            .as_str()
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        assert_ne!(QuoteId::generate(), id);
    }

    #[test]
    fn test_parse() {
        assert!(QuoteId::parse("0123456789abcdef0123456789abcdef").is_ok());
        assert!(QuoteId::parse("0123456789ABCDEF0123456789ABCDEF").is_ok());
        // 値は受け取ったまま保持される
        assert_eq!(
            QuoteId::parse("0123456789ABCDEF0123456789abcdef")
                .unwrap()
                .as_str(),
            "0123456789ABCDEF0123456789abcdef"
        );

        for bad in [
            "",
            "0123456789abcdef0123456789abcde",
            "0123456789abcdef0123456789abcdef0",
            "0123456789abcdef0123456789abcdeg",
            "0x23456789abcdef0123456789abcdef",
            " 123456789abcdef0123456789abcdef",
        ] {
            assert_eq!(QuoteId::parse(bad), Err(RequestError::InvalidQuoteId), "{bad}");
        }
    }
}
