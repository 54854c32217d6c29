use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use std::error::Error as StdError;
use tracing::debug;
use url::Url;

use crate::config::CheckerConfig;
use crate::error::CheckError;

/// Raw view of one reputation lookup, before any interpretation.
#[derive(Debug, Clone)]
pub struct ReputationResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub headers: String,
    pub body: String,
}

/// A source of reputation verdicts for a single domain.
///
/// Implementations only report transport-level failures; rate limiting and
/// payload validation are left to [`crate::checker::DomainChecker`].
pub trait ReputationClient {
    fn fetch(&self, domain: &str) -> Result<ReputationResponse, CheckError>;
}

impl<T: ReputationClient + ?Sized> ReputationClient for &T {
    fn fetch(&self, domain: &str) -> Result<ReputationResponse, CheckError> {
        (**self).fetch(domain)
    }
}

/// Blocking HTTPS client for the transparency report endpoint.
pub struct HttpReputationClient {
    client: Client,
    endpoint: Url,
}

impl HttpReputationClient {
    pub fn new(config: &CheckerConfig) -> Result<Self, CheckError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            CheckError::Unexpected(format!("invalid endpoint {}: {}", config.endpoint, e))
        })?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CheckError::Unexpected(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn lookup_url(&self, domain: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("site", domain);
        url
    }
}

impl ReputationClient for HttpReputationClient {
    fn fetch(&self, domain: &str) -> Result<ReputationResponse, CheckError> {
        let url = self.lookup_url(domain);
        debug!(action = "request", component = "http_client", url = %url, "Sending lookup request");

        let response = self.client.get(url).send().map_err(transport_error)?;

        let status = response.status().as_u16();
        let content_type = response.headers().get(CONTENT_TYPE).map(header_text);
        let headers = format!("{:?}", response.headers());
        let body = response.text().map_err(transport_error)?;

        Ok(ReputationResponse {
            status,
            content_type,
            headers,
            body,
        })
    }
}

/// Decodes a header value byte-for-byte as latin-1, so opaque bytes never hide the value.
pub fn header_text(value: &HeaderValue) -> String {
    value.as_bytes().iter().map(|&b| char::from(b)).collect()
}

fn transport_error(err: reqwest::Error) -> CheckError {
    let message = error_chain(&err);
    if is_tls_failure(&err) {
        CheckError::TransientTransport(message)
    } else {
        CheckError::Request(message)
    }
}

/// True when any underlying cause of `err` comes from the TLS layer.
///
/// Only the causes are inspected: the outer reqwest message embeds the
/// request URL, and a domain name may contain the same markers.
pub fn is_tls_failure(err: &(dyn StdError + 'static)) -> bool {
    std::iter::successors(err.source(), |e| (*e).source()).any(|cause| {
        let text = cause.to_string().to_lowercase();
        ["ssl", "tls", "certificate", "handshake"]
            .iter()
            .any(|marker| text.contains(marker))
    })
}

/// Renders an error together with all of its causes, outermost first.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    std::iter::successors(Some(err), |e| (*e).source())
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}
