use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Error)]
#[error("Could not initialise the signing key. {0}")]
pub struct SignatureError(String);

/// Hex-encoded HMAC-SHA256 of `body`, keyed with `secret`.
///
/// `body` must be the exact bytes that are sent on the wire.
pub fn sign_payload(secret: &str, body: &[u8]) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| SignatureError(e.to_string()))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}
