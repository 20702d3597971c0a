//! # personal_sign 署名検証
//!
//! ウォレットの `personal_sign` 規約に従った署名者アドレスの復元。
//!
//! ## リンク取得メッセージ
//! 1. `digest = SHA256(quoteId + nonce)`
//! 2. ウォレットが署名するメッセージは `digest` の「0x」付き小文字hex文字列（66バイトのUTF-8）
//! 3. `hash = keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`
//! 4. `hash` と署名 `r || s || v` から公開鍵を復元し、アドレスを導出する

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

use crate::{decode_prefixed_hex, keccak256, to_prefixed_hex, Address, CryptoError};

/// personal_sign のプレフィックス。
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// `r || s || v` 形式の署名長
const SIGNATURE_LEN: usize = 65;
/// EIP-2098 コンパクト署名長
const COMPACT_SIGNATURE_LEN: usize = 64;

/// personal_sign のメッセージハッシュを計算する。
pub fn hash_personal_message(message: &[u8]) -> [u8; 32] {
    let mut buf = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + 3 + message.len());
    buf.extend_from_slice(PERSONAL_MESSAGE_PREFIX.as_bytes());
    buf.extend_from_slice(message.len().to_string().as_bytes());
    buf.extend_from_slice(message);
    keccak256(&buf)
}

/// ダイジェストからウォレットが署名するメッセージ文字列を得る。
pub fn digest_message_text(digest: &[u8; 32]) -> String {
    to_prefixed_hex(digest)
}

/// 16進数の署名をパースし、low-S正規化済みの署名と復元IDを返す。
///
/// 65バイト（`v` は 0/1/27/28）とEIP-2098の64バイト形式を受け付ける。
pub fn parse_signature(signature: &str) -> Result<(Signature, RecoveryId), CryptoError> {
    let bytes = decode_prefixed_hex(signature)
        .map_err(|e| CryptoError::InvalidSignature(format!("16進数のデコードに失敗: {e}")))?;

    let (rs, y_odd) = match bytes.len() {
        SIGNATURE_LEN => {
            let y_odd = match bytes[64] {
                0 | 27 => false,
                1 | 28 => true,
                v => {
                    return Err(CryptoError::InvalidSignature(format!(
                        "不正なv値です: {v}"
                    )))
                }
            };
            let mut rs = [0u8; 64];
            rs.copy_from_slice(&bytes[..64]);
            (rs, y_odd)
        }
        COMPACT_SIGNATURE_LEN => {
            let mut rs = [0u8; 64];
            rs.copy_from_slice(&bytes);
            let y_odd = rs[32] & 0x80 != 0;
            rs[32] &= 0x7f;
            (rs, y_odd)
        }
        len => {
            return Err(CryptoError::InvalidSignature(format!(
                "署名は65バイトまたは64バイトである必要があります: {len}バイト"
            )))
        }
    };

    let mut sig = Signature::from_slice(&rs)
        .map_err(|e| CryptoError::InvalidSignature(format!("r/sが範囲外です: {e}")))?;
    let mut y_odd = y_odd;

    // high-S署名はlow-Sに正規化し、Rのy座標パリティを反転する
    if let Some(normalized) = sig.normalize_s() {
        sig = normalized;
        y_odd = !y_odd;
    }

    Ok((sig, RecoveryId::new(y_odd, false)))
}

/// 任意メッセージの personal_sign 署名から署名者アドレスを復元する。
pub fn recover_message_signer(message: &[u8], signature: &str) -> Result<Address, CryptoError> {
    let (sig, recovery_id) = parse_signature(signature)?;
    let hash = hash_personal_message(message);
    let key = VerifyingKey::recover_from_prehash(&hash, &sig, recovery_id)
        .map_err(|e| CryptoError::InvalidSignature(format!("公開鍵の復元に失敗: {e}")))?;
    Ok(Address::from_verifying_key(&key))
}

/// リンク取得ダイジェストに対する署名から署名者アドレスを復元する。
///
/// 別の鍵による正しい署名はエラーにならず、そのアドレスを返す。
/// 期待アドレスとの照合は呼び出し側が行う。
pub fn recover_signer(digest: &[u8; 32], signature: &str) -> Result<Address, CryptoError> {
    let message = digest_message_text(digest);
    recover_message_signer(message.as_bytes(), signature)
}

/// 任意メッセージに personal_sign で署名し、`0x` 付き65バイトhex（v=27/28）を返す。
pub fn sign_message(signing_key: &SigningKey, message: &[u8]) -> Result<String, CryptoError> {
    let hash = hash_personal_message(message);
    let (sig, recovery_id) = signing_key
        .sign_prehash_recoverable(&hash)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(SIGNATURE_LEN);
    out.extend_from_slice(&sig.to_bytes());
    out.push(27 + u8::from(recovery_id.is_y_odd()));
    Ok(to_prefixed_hex(&out))
}

/// リンク取得ダイジェストに署名する（クライアント・テスト用）。
pub fn sign_digest(signing_key: &SigningKey, digest: &[u8; 32]) -> Result<String, CryptoError> {
    sign_message(signing_key, digest_message_text(digest).as_bytes())
}
