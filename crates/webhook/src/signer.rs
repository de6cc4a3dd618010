use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_PREFIX: &str = "sha256=";

fn mac(secret: &str, payload: &[u8]) -> HmacSha256 {
    // HMAC takes keys of any length.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts any key length"));
    mac.update(payload);
    mac
}

/// Signs `payload` with `secret`: `"sha256=" + hex(HMAC-SHA256(secret, payload))`.
///
/// Strings and byte buffers sign identically, since a `&str` is signed as its
/// UTF-8 bytes.
pub fn sign(payload: impl AsRef<[u8]>, secret: &str) -> String {
    let digest = mac(secret, payload.as_ref()).finalize().into_bytes();
    format!("{SIGNATURE_PREFIX}{digest:x}")
}

/// Checks a signature header value against `payload`, in constant time.
pub fn verify(payload: impl AsRef<[u8]>, secret: &str, header: &str) -> bool {
    let Some(hex) = header.trim().strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let Some(expected) = decode_hex(hex) else {
        return false;
    };
    mac(secret, payload.as_ref()).verify_slice(&expected).is_ok()
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}
