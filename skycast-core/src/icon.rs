//! Weather icon download. The bytes are handed to the front end as-is.

use reqwest::Client;
use tracing::debug;

use crate::error::{WeatherError, truncate_body};

const SERVICE: &str = "OpenWeather icons";
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Clone)]
pub struct IconFetcher {
    base_url: String,
    http: Client,
}

impl IconFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn icon_url(&self, code: &str) -> String {
        format!("{}/img/wn/{code}@2x.png", self.base_url)
    }

    /// Download the 2x PNG for an icon code such as "10d".
    pub async fn fetch(&self, code: &str) -> Result<Vec<u8>, WeatherError> {
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            let detail = format!("invalid icon code '{code}'");
            return Err(WeatherError::malformed(SERVICE, detail));
        }

        let url = self.icon_url(code);
        debug!(%url, "fetching icon");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::network(SERVICE, e))?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                service: SERVICE,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|e| WeatherError::network(SERVICE, e))?;
        if !bytes.starts_with(PNG_SIGNATURE) {
            return Err(WeatherError::malformed(SERVICE, "response is not a PNG image"));
        }

        Ok(bytes.to_vec())
    }
}
