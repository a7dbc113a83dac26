use std::time::Duration;
use rquest::{Client, Response};
use rquest_util::Emulation;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use crate::clients::FetchedPage;
use crate::config::Settings;
use crate::error::{Error, Result};
use tracing::{error, debug};

pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
}

impl HttpClient {
    pub fn new(settings: &Settings, emulation: Emulation) -> Result<Self> {
        let mut headers = HeaderMap::new();

        for (key, value) in settings.api.headers.iter() {
            if let (Ok(header_name), Ok(header_value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value)
            ) {
                headers.insert(header_name, header_value);
                debug!(
                    header_key = %key,
                    header_value = %value,
                    "Adding header"
                );
            } else {
                error!(
                    header_key = %key,
                    header_value = %value,
                    "Invalid header value"
                );
            }
        }

        debug!(
            emulation = ?emulation,
            "Creating client with emulation"
        );

        let client = Client::builder()
            .emulation(emulation)
            .timeout(Duration::from_secs(settings.http.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            headers,
        })
    }

    /// Sends one GET and returns the body of a 2xx response.
    pub async fn get(&self, url: &str) -> Result<FetchedPage> {
        let response = self.send(url).await?;
        let final_url = response.url().to_string();
        let body = response.bytes().await?;

        Ok(FetchedPage::new(final_url, body.to_vec()))
    }

    async fn send(&self, url: &str) -> Result<Response> {
        debug!(url = url, "Sending request");

        let response = self.client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;

        debug!(
            status = response.status().as_u16(),
            url = %response.url(),
            "Response received"
        );

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                debug!(url = url, "Rate limit exceeded");
                Err(Error::RateLimit)
            },
            StatusCode::FORBIDDEN => {
                debug!(
                    url = url,
                    response_headers = ?response.headers().iter()
                        .map(|(k, v)| (k.as_str(), v.to_str().unwrap_or("invalid")))
                        .collect::<Vec<_>>(),
                    "Received 403 Forbidden"
                );
                Err(Error::Forbidden)
            },
            status if !status.is_success() => Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            _ => Ok(response)
        }
    }
}
