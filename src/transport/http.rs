use super::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::{Error, Result};
use reqwest::blocking::Client;
use reqwest::Proxy;
use std::env;
use std::time::Duration;

/// Blocking HTTP transport backed by `reqwest`.
///
/// One request per call: no retries, no backoff. The client is `Send + Sync` and can
/// be shared between threads.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut builder = Client::builder().timeout(timeout);

        if let Ok(proxy_url) = env::var("INDICO_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut req = self.client.post(&request.url);
        for (k, v) in &request.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        // Headers first: `json` only sets Content-Type when it is absent.
        let resp = req.json(&request.body).send()?;
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = resp.text()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
