use anyhow::{Context, Result};
use cosmic_storage::Capture;

pub const CAPTURES_PATH: &str = "/api/captures";

/// Fetches the capture list from a running gallery server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn captures_url(&self) -> String {
        format!("{}{CAPTURES_PATH}", self.base_url)
    }

    pub async fn fetch_captures(&self) -> Result<Vec<Capture>> {
        let url = self.captures_url();
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?
            .error_for_status()?;

        resp.json::<Vec<Capture>>()
            .await
            .with_context(|| format!("decoding {url}"))
    }
}
