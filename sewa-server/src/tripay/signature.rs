//! HMAC-SHA256 signatures shared with the payment gateway

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac(key: &str) -> Result<HmacSha256, &'static str> {
    HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| "HMAC key error")
}

/// Lowercase hex HMAC-SHA256 of `message`
pub fn sign(key: &str, message: &[u8]) -> Result<String, &'static str> {
    let mut mac = mac(key)?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Outbound transaction signature over `merchant_code + merchant_ref + amount`
pub fn transaction_signature(
    private_key: &str,
    merchant_code: &str,
    merchant_ref: &str,
    amount: i64,
) -> Result<String, &'static str> {
    sign(
        private_key,
        format!("{merchant_code}{merchant_ref}{amount}").as_bytes(),
    )
}

/// Verify an inbound callback signature over the exact raw body.
///
/// The header must be the lowercase hex digest; anything else (uppercase,
/// wrong length, non-hex) is a mismatch. The digest comparison itself is
/// constant-time via `verify_slice`.
pub fn verify_callback(private_key: &str, body: &[u8], signature: &str) -> bool {
    let well_formed = signature.len() == 64
        && signature
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if !well_formed {
        return false;
    }
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = mac(private_key) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
