/// Shared-secret authentication digest expected by the connector
///
/// The connector recomputes MD5 over the same ordered concatenation and
/// compares. Field order, the absence of separators and the algorithm are
/// all part of the wire contract.
use openssl::hash::{hash, MessageDigest};

use crate::models::LprEvent;

/// Concatenate the authenticated fields in wire order, secret last
pub fn canonical_string(event: &LprEvent, secret: &str) -> String {
    [
        event.camera_id.as_str(),
        event.number.as_str(),
        event.country_code.as_str(),
        event.first_seen.as_str(),
        event.last_seen.as_str(),
        event.probability.as_str(),
        event.transaction_key.as_str(),
        event.direction.as_str(),
        LprEvent::GPS_LATITUDE,
        LprEvent::GPS_LONGITUDE,
        LprEvent::HAVE_COMPANION,
        secret,
    ]
    .concat()
}

/// MD5 of the canonical string as 32 lowercase hex characters
pub fn auth_digest(event: &LprEvent, secret: &str) -> Result<String, openssl::error::ErrorStack> {
    let digest = hash(MessageDigest::md5(), canonical_string(event, secret).as_bytes())?;
    Ok(hex::encode(&*digest))
}
