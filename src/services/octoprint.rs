use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::debug;

use crate::error::{MonitorError, MonitorResult};
use crate::models::api::{ApiVersion, JobResponse, PrinterResponse};
use crate::models::{Config, Progress};
use crate::status::{PrinterStatus, classify};
use crate::utils::http::with_api_key;

/// Upper bound for a single request, so a hung server never stalls a tick
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const PRINTER_PATH: &str = "/api/printer?history=false";
const JOB_PATH: &str = "/api/job";
const VERSION_PATH: &str = "/api/version";

/// Source of printer state for the poll loop
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn printer_status(&self) -> MonitorResult<PrinterStatus>;
    async fn progress(&self) -> MonitorResult<Option<Progress>>;
    async fn version(&self) -> MonitorResult<ApiVersion>;
}

/// HTTP client for the OctoPrint REST API
pub struct OctoprintClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl OctoprintClient {
    pub fn new(config: &Config) -> MonitorResult<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(MonitorError::Config("OctoPrint url is empty".to_string()));
        }

        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(OctoprintClient {
            http_client,
            base_url,
            api_key: config.apikey.clone(),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        with_api_key(self.http_client.get(url), &self.api_key)
    }

    /// Fetch `/api/printer` and classify it. A 409 means OctoPrint has no
    /// connection to the printer and is reported as failed without decoding.
    pub async fn fetch_printer_status(&self) -> MonitorResult<PrinterStatus> {
        let response = self.get(PRINTER_PATH).send().await?;

        if response.status() == StatusCode::CONFLICT {
            debug!("OctoPrint reports the printer as not connected");
            return Ok(PrinterStatus::Failed);
        }

        let body = success_body(response).await?;
        let printer: PrinterResponse = serde_json::from_str(&body)?;
        let status = classify(&printer.state.flags);
        debug!(
            state = printer.state.text.as_deref().unwrap_or_default(),
            ?status,
            "Fetched printer status"
        );
        Ok(status)
    }

    /// Fetch `/api/job` and extract the progress of the active job, if any
    pub async fn fetch_progress(&self) -> MonitorResult<Option<Progress>> {
        let response = self.get(JOB_PATH).send().await?;
        let body = success_body(response).await?;

        // Malformed JSON is an error, a well-formed body of another shape is not
        let value: serde_json::Value = serde_json::from_str(&body)?;
        match serde_json::from_value::<JobResponse>(value) {
            Ok(job) => {
                let progress = job.progress.and_then(|p| p.to_progress());
                let file = job
                    .job
                    .as_ref()
                    .and_then(|j| j.file.as_ref())
                    .and_then(|f| f.name.as_deref());
                debug!(
                    job_state = job.state.as_deref().unwrap_or_default(),
                    file = file.unwrap_or_default(),
                    active = progress.is_some(),
                    "Fetched job progress"
                );
                Ok(progress)
            }
            Err(e) => {
                debug!(error = %e, "Job response has no usable progress");
                Ok(None)
            }
        }
    }

    /// Fetch `/api/version`
    pub async fn fetch_version(&self) -> MonitorResult<ApiVersion> {
        let response = self.get(VERSION_PATH).send().await?;
        let body = success_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

async fn success_body(response: Response) -> MonitorResult<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(MonitorError::Http(status));
    }
    Ok(response.text().await?)
}

#[async_trait]
impl StatusSource for OctoprintClient {
    async fn printer_status(&self) -> MonitorResult<PrinterStatus> {
        self.fetch_printer_status().await
    }

    async fn progress(&self) -> MonitorResult<Option<Progress>> {
        self.fetch_progress().await
    }

    async fn version(&self) -> MonitorResult<ApiVersion> {
        self.fetch_version().await
    }
}
