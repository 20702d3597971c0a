//! # EVMアドレス
//!
//! 20バイトのアドレス値と、EIP-55チェックサム表記の生成・検証。
//!
//! 入力の受理規則はウォレットライブラリ（`getAddress`）に合わせる:
//! - 「0x」プレフィックスは任意、続く40文字が16進数
//! - 全て小文字、または全て大文字ならチェックサム検証なしで受理
//! - 大文字小文字が混在する場合はEIP-55チェックサムが一致する必要がある

use k256::ecdsa::VerifyingKey;

use crate::{keccak256, CryptoError};

/// 20バイトのEVMアドレス。比較はバイト値で行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// バイト列から構築する。
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// 内部バイト列。
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// 文字列表現をパースする。
    pub fn parse(s: &str) -> Result<Self, CryptoError> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CryptoError::InvalidAddress(format!(
                "0xと40文字の16進数である必要があります: {s}"
            )));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|e| CryptoError::InvalidAddress(format!("16進数のデコードに失敗: {e}")))?;
        let address = Self(bytes);

        let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *body {
            return Err(CryptoError::InvalidAddress(format!(
                "チェックサムが一致しません: {s}"
            )));
        }

        Ok(address)
    }

    /// 文字列がアドレスとして受理可能かを判定する。
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// secp256k1公開鍵からアドレスを導出する。
    ///
    /// 非圧縮SEC1表現（0x04を除く64バイト）のKeccak-256の末尾20バイト。
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let hash = keccak256(&point.as_bytes()[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    /// EIP-55チェックサム表記（「0x」プレフィックス付き）。
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl std::str::FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    /// EIP-55のテストベクタ
    const CHECKSUM_VECTORS: &[&str] = &[
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_checksum_vectors() {
        for vector in CHECKSUM_VECTORS {
            let lower = vector.to_ascii_lowercase();
            let address = Address::parse(&lower).unwrap();
            assert_eq!(address.to_checksum(), *vector);
            assert_eq!(Address::parse(vector).unwrap(), address);
        }
    }

    /// 大文字小文字混在でチェックサムが一致しない場合に拒否されることを確認
    #[test]
    fn test_bad_checksum_rejected() {
        let result = Address::parse("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(matches!(result, Err(CryptoError::InvalidAddress(_))));
    }

    #[test]
    fn test_uniform_case_accepted() {
        let upper = "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED";
        let lower = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
        assert_eq!(Address::parse(upper).unwrap(), Address::parse(lower).unwrap());
        // 0xプレフィックスなしも受理
        assert!(Address::is_valid("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(!Address::is_valid(""));
        assert!(!Address::is_valid("0x"));
        assert!(!Address::is_valid("0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea"));
        assert!(!Address::is_valid("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaedaa"));
        assert!(!Address::is_valid("0xgaaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(!Address::is_valid("0X5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
    }

    /// 既知の秘密鍵から既知のアドレスが導出されることを確認
    #[test]
    fn test_from_verifying_key() {
        let key_bytes =
            hex::decode("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318")
                .unwrap();
        let signing_key = SigningKey::from_slice(&key_bytes).unwrap();
        let address = Address::from_verifying_key(signing_key.verifying_key());
        assert_eq!(
            address.to_string(),
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"
        );
    }
}
