use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{
    ApiFailure, BatchAccepted, BatchStatusReport, ErrorBody, FailureKind, WorksheetListing,
};

/// Connection settings for the trip-analytics backend.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl BackendSettings {
    /// Parse and normalize a base URL. A trailing slash is required for
    /// joining relative endpoint paths, so one is appended if missing.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiFailure> {
        let mut text = base_url.trim_end_matches('/').to_string();
        text.push('/');
        let base_url = Url::parse(&text)
            .map_err(|err| ApiFailure::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            // The development server's default address.
            base_url: Url::parse("http://127.0.0.1:5000/").expect("static base url"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The four HTTP contracts the backend exposes. Implemented over reqwest in
/// production; tests swap in a scripted fake.
#[async_trait::async_trait]
pub trait BackendClient: Send + Sync {
    /// `POST /list-worksheets` with the file as a multipart upload.
    async fn list_worksheets(
        &self,
        file_name: &str,
        payload: Vec<u8>,
    ) -> Result<WorksheetListing, ApiFailure>;

    /// `POST /generate-batch-reports` with the file and, for Excel sources,
    /// the chosen worksheet name.
    async fn submit_batch(
        &self,
        file_name: &str,
        payload: Vec<u8>,
        worksheet_name: Option<&str>,
    ) -> Result<BatchAccepted, ApiFailure>;

    /// `GET /batch-status/{batch_id}`.
    async fn batch_status(&self, batch_id: &str) -> Result<BatchStatusReport, ApiFailure>;

    /// `GET /download-pdf/{filename}`, returning the raw document bytes.
    async fn download_pdf(&self, filename: &str) -> Result<Vec<u8>, ApiFailure>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, ApiFailure> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiFailure::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiFailure> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| ApiFailure::new(FailureKind::Network, err.to_string()))
    }

    /// Multipart body matching the backend's expectations: the file under
    /// the `file` field, plus `worksheet_name` only when one was chosen.
    fn upload_form(file_name: &str, payload: Vec<u8>, worksheet_name: Option<&str>) -> Form {
        let part = Part::bytes(payload).file_name(file_name.to_string());
        let mut form = Form::new().part("file", part);
        if let Some(worksheet) = worksheet_name {
            form = form.text("worksheet_name", worksheet.to_string());
        }
        form
    }
}

#[async_trait::async_trait]
impl BackendClient for ReqwestBackend {
    async fn list_worksheets(
        &self,
        file_name: &str,
        payload: Vec<u8>,
    ) -> Result<WorksheetListing, ApiFailure> {
        let response = self
            .client
            .post(self.endpoint("list-worksheets")?)
            .multipart(Self::upload_form(file_name, payload, None))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(response).await
    }

    async fn submit_batch(
        &self,
        file_name: &str,
        payload: Vec<u8>,
        worksheet_name: Option<&str>,
    ) -> Result<BatchAccepted, ApiFailure> {
        let response = self
            .client
            .post(self.endpoint("generate-batch-reports")?)
            .multipart(Self::upload_form(file_name, payload, worksheet_name))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(response).await
    }

    async fn batch_status(&self, batch_id: &str) -> Result<BatchStatusReport, ApiFailure> {
        let response = self
            .client
            .get(self.endpoint(&format!("batch-status/{batch_id}"))?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(response).await
    }

    async fn download_pdf(&self, filename: &str) -> Result<Vec<u8>, ApiFailure> {
        let response = self
            .client
            .get(self.endpoint(&format!("download-pdf/{filename}"))?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiFailure> {
    let status = response.status();
    let body = response.text().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        return Err(error_from_body(status, &body));
    }
    serde_json::from_str(&body).map_err(|err| ApiFailure::new(FailureKind::Decode, err.to_string()))
}

/// Non-success responses carry `{ "error": ... }` when the backend produced
/// them itself; anything else maps to the bare status code.
fn error_from_body(status: StatusCode, body: &str) -> ApiFailure {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ApiFailure::new(FailureKind::Backend, parsed.error),
        Err(_) => ApiFailure::new(FailureKind::HttpStatus(status.as_u16()), status.to_string()),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiFailure {
    if err.is_timeout() {
        return ApiFailure::new(FailureKind::Timeout, err.to_string());
    }
    ApiFailure::new(FailureKind::Network, err.to_string())
}
