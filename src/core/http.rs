use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

use crate::core::config::FetcherSettings;

pub const APP_USER_AGENT: &str = concat!("mcserver-fetch/", env!("CARGO_PKG_VERSION"));

/// Build the client shared by every request of one process.
///
/// Jars are passed through byte-for-byte, so compressed transfer encodings are refused.
pub fn build_http_client(settings: &FetcherSettings) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    let mut builder = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .default_headers(default_headers);

    if let Some(secs) = settings.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}
