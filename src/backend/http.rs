//! HTTP implementation of the backend contract

use crate::backend::{DocumentBackend, UploadTicket};
use crate::config::WorkflowConfig;
use crate::error::{Error, Result};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TicketRequest<'a> {
    filename: &'a str,
    content_type: &'a str,
}

/// Reqwest-backed [`DocumentBackend`] talking to the ticket endpoint,
/// pre-signed upload target, and result location.
pub struct HttpBackend {
    client: reqwest::Client,
    ticket_url: url::Url,
}

impl HttpBackend {
    /// Build a backend for the given config. Fails if the base URL does not
    /// parse or the client cannot be constructed.
    pub fn new(config: &WorkflowConfig) -> Result<Self> {
        let base = url::Url::parse(&config.base_url).map_err(|_| Error::InvalidBaseUrl {
            url: config.base_url.clone(),
        })?;

        // Joining against "{base}/" keeps a path-bearing base (API Gateway
        // stage prefixes) intact.
        let ticket_url = base
            .join(&format!("{}/upload-url", base.path().trim_end_matches('/')))
            .map_err(|_| Error::InvalidBaseUrl {
                url: config.base_url.clone(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(Error::HttpRequest)?;

        Ok(Self { client, ticket_url })
    }
}

#[async_trait::async_trait]
impl DocumentBackend for HttpBackend {
    async fn request_ticket(&self, filename: &str, content_type: &str) -> Result<UploadTicket> {
        let response = self
            .client
            .post(self.ticket_url.clone())
            .json(&TicketRequest {
                filename,
                content_type,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::TicketRequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<UploadTicket>().await?)
    }

    async fn upload(&self, ticket: &UploadTicket, bytes: &[u8], content_type: &str) -> Result<()> {
        let response = self
            .client
            .put(&ticket.upload_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Body capture is best-effort; a read failure must not mask
            // the PUT failure itself.
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UploadFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body,
            });
        }

        Ok(())
    }

    async fn fetch_result(&self, ticket: &UploadTicket) -> Result<String> {
        // Cache bypass is mandatory: a cached 404 from an earlier attempt
        // would stall the poll loop past the point the object exists.
        let response = self
            .client
            .get(&ticket.result_url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ResultNotReady {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
