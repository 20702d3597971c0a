//! # Uplink 暗号処理
//!
//! リンク取得リクエストの署名検証に必要な暗号プリミティブを提供する。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | 正規メッセージ | SHA-256 |
//! | personal_sign ハッシュ | Keccak-256 |
//! | 署名・公開鍵復元 | secp256k1 ECDSA |
//! | アドレス表記 | EIP-55 チェックサム |

pub mod address;
pub mod personal_sign;

use sha2::{Digest, Sha256};
use sha3::Keccak256;

pub use address::Address;
pub use k256::ecdsa::{SigningKey as Secp256k1SigningKey, VerifyingKey as Secp256k1VerifyingKey};
pub use personal_sign::{recover_signer, sign_digest};

/// 暗号処理のエラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// 署名の形式不正、または公開鍵の復元に失敗
    #[error("不正な署名: {0}")]
    InvalidSignature(String),
    /// アドレスの形式不正、またはチェックサム不一致
    #[error("不正なアドレス: {0}")]
    InvalidAddress(String),
    /// 署名処理に失敗
    #[error("署名に失敗しました: {0}")]
    SigningFailed(String),
}

/// SHA-256ハッシュ計算。
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Keccak-256ハッシュ計算（SHA3標準化前のパディング）。
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// リンク取得用の正規メッセージダイジェストを計算する。
///
/// `SHA256(UTF8(quote_id + nonce))`。区切り文字は入れず、nonceは
/// クライアントから受け取った文字列をそのまま連結する。
pub fn link_message_digest(quote_id: &str, nonce: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(quote_id.as_bytes());
    hasher.update(nonce.as_bytes());
    hasher.finalize().into()
}

/// バイト列を「0x」プレフィックス付き小文字hex文字列に変換する。
pub fn to_prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// 「0x」プレフィックスを任意とするhex文字列をデコードする。
pub fn decode_prefixed_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_sha256_abc() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    /// 正規メッセージがquoteIdとnonceの単純連結のSHA-256であることを確認
    #[test]
    fn test_link_message_digest_fixture() {
        let digest = link_message_digest("0123456789abcdef0123456789abcdef", "1");
        assert_eq!(
            hex::encode(digest),
            "ce304734d1c40c3fbac8fa46f7619492455114da488ab3c4cb0b404d0576624b"
        );
        assert_eq!(digest, sha256(b"0123456789abcdef0123456789abcdef1"));
    }

    /// nonceは再フォーマットされずにメッセージへ入ることを確認
    #[test]
    fn test_link_message_digest_uses_raw_nonce() {
        let id = "0123456789abcdef0123456789abcdef";
        assert_ne!(link_message_digest(id, "1"), link_message_digest(id, "01"));
        assert_ne!(link_message_digest(id, "1"), link_message_digest(id, "1.0"));
    }

    #[test]
    fn test_prefixed_hex() {
        assert_eq!(to_prefixed_hex(&[0xab, 0x01]), "0xab01");
        assert_eq!(decode_prefixed_hex("0xab01").unwrap(), vec![0xab, 0x01]);
        assert_eq!(decode_prefixed_hex("AB01").unwrap(), vec![0xab, 0x01]);
        assert!(decode_prefixed_hex("0xzz").is_err());
    }
}
