pub mod client;
pub mod digest;
pub mod multipart;

pub use client::{ConnectorClient, Delivery, ACCEPTED_BODY};
pub use digest::auth_digest;
pub use multipart::{encode_event, MultipartBody};

use log::info;

use crate::config::ImagePaths;
use crate::error::Result;
use crate::models::LprEvent;

/// Digest, encode and deliver one event. Blocks on file and network I/O.
///
/// Nothing reaches the network unless the whole body was encoded.
pub fn submit_event(
    client: &ConnectorClient,
    event: &LprEvent,
    secret: &str,
    images: &ImagePaths,
    dump_body: bool,
) -> Result<Delivery> {
    let auth = auth_digest(event, secret)?;
    let body = encode_event(event, &auth, images)?;

    if dump_body {
        info!("body:\n{}", String::from_utf8_lossy(body.as_bytes()));
    }

    client.deliver(&body)
}
