/// HTTP delivery of encoded events to the connector
use log::debug;
use std::io::Read;
use url::Url;

use super::multipart::MultipartBody;
use crate::error::{Result, SendError};

pub const CONNECTOR_PORT: u16 = 8879;
pub const CONNECTOR_PATH: &str = "/lpr";

/// Body the connector answers with when it accepts an event
pub const ACCEPTED_BODY: &str = "bb1e8f805814a0b8e465601346872377";

/// Outcome of a delivered request. Anything but `Accepted` is diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Accepted,
    Unexpected { status: u16, body: String },
}

impl Delivery {
    pub fn classify(status: u16, body: String) -> Self {
        if status == 200 && body == ACCEPTED_BODY {
            Delivery::Accepted
        } else {
            Delivery::Unexpected { status, body }
        }
    }
}

/// Build `http://{host}:8879/lpr`
pub fn connector_url(host: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("http://{}", host))?;
    url.set_port(Some(CONNECTOR_PORT))
        .map_err(|_| SendError::Endpoint(url::ParseError::InvalidPort))?;
    url.set_path(CONNECTOR_PATH);
    Ok(url)
}

/// Blocking client for one connector endpoint.
///
/// The agent keeps no idle connections and every request asks the server to
/// close, so each event goes out on a fresh connection. No overall request
/// timeout is set.
#[derive(Clone)]
pub struct ConnectorClient {
    agent: ureq::Agent,
    url: Url,
}

impl ConnectorClient {
    pub fn new(host: &str) -> Result<Self> {
        Ok(Self::with_url(connector_url(host)?))
    }

    pub fn with_url(url: Url) -> Self {
        let agent = ureq::AgentBuilder::new().max_idle_connections(0).build();
        Self { agent, url }
    }

    pub fn deliver(&self, body: &MultipartBody) -> Result<Delivery> {
        debug!("POST {} ({} bytes)", self.url, body.len());

        let response = self
            .agent
            .post(self.url.as_str())
            .set("Content-Type", &body.content_type())
            .set("Connection", "close")
            .send_bytes(body.as_bytes());

        // ureq reports 4xx/5xx as errors; those still carry a response to log
        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => return Err(SendError::Transport(e.to_string())),
        };

        let status = response.status();
        let mut text = String::new();
        response
            .into_reader()
            .read_to_string(&mut text)
            .map_err(SendError::ResponseRead)?;

        Ok(Delivery::classify(status, text))
    }
}
