use sha1::{Digest, Sha1};

/// String the host expects to be hashed for a destroy call. The secret is
/// appended locally and never sent.
pub fn destroy_payload(public_id: &str, timestamp: i64, api_secret: &str) -> String {
    format!("public_id={public_id}&timestamp={timestamp}{api_secret}")
}

pub fn sign_destroy(public_id: &str, timestamp: i64, api_secret: &str) -> String {
    let payload = destroy_payload(public_id, timestamp, api_secret);
    hex::encode(Sha1::digest(payload.as_bytes()))
}
