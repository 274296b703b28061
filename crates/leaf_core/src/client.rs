//! Multipart upload of a picked image to the inference endpoint.

use crate::config::ClientConfig;
use crate::error::{ConfigError, PredictError};
use crate::prediction::{ImageRef, PredictionResult};
use reqwest::Url;
use reqwest::blocking::{Client, multipart};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Multipart field name expected by the inference service.
pub const FILE_FIELD: &str = "file";

const MAX_LOGGED_BODY: usize = 512;

/// Shared flag that is set while a prediction request is outstanding.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag, unless it is already set.
    pub fn try_acquire(&self) -> Option<FlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard(self.0.clone()))
    }
}

/// Holds the in-flight flag; clears it when dropped.
#[derive(Debug)]
pub struct FlightGuard(Arc<AtomicBool>);

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One file part ready to post.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Request was sent but no response arrived (timeout, refused, DNS).
    #[error("no response: {0}")]
    NoResponse(String),
    /// Request could not be built or sent for another reason.
    #[error("request failed: {0}")]
    Request(String),
}

/// Network layer used by [`UploadClient`].
pub trait Transport: Send + Sync {
    fn post_file(
        &self,
        url: &Url,
        upload: &FileUpload,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError>;
}

/// Blocking reqwest transport; one POST per call, no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn post_file(
        &self,
        url: &Url,
        upload: &FileUpload,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let part = multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let form = multipart::Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .timeout(timeout)
            .send()
            .map_err(classify_reqwest)?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| TransportError::NoResponse(e.to_string()))?;
        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn classify_reqwest(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::Request(err.to_string())
    } else if err.is_timeout() || err.is_connect() || err.is_request() {
        TransportError::NoResponse(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

/// Uploads images and classifies the outcome.
pub struct UploadClient<T: Transport> {
    config: ClientConfig,
    transport: T,
    in_flight: InFlight,
}

impl UploadClient<HttpTransport> {
    pub fn http(config: ClientConfig) -> Self {
        Self::new(config, HttpTransport::new())
    }
}

impl<T: Transport> UploadClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self::with_in_flight(config, transport, InFlight::new())
    }

    /// Build a client that shares an existing in-flight flag.
    pub fn with_in_flight(config: ClientConfig, transport: T, in_flight: InFlight) -> Self {
        Self {
            config,
            transport,
            in_flight,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Upload `image` and return the prediction. The in-flight flag is held
    /// for the whole call.
    pub fn predict(&self, image: Option<&ImageRef>) -> Result<PredictionResult, PredictError> {
        let guard = self.in_flight.try_acquire().ok_or(PredictError::Busy)?;
        self.predict_in_flight(&guard, image)
    }

    /// Same as [`predict`](Self::predict) for a caller that already holds the flag.
    pub fn predict_in_flight(
        &self,
        _flight: &FlightGuard,
        image: Option<&ImageRef>,
    ) -> Result<PredictionResult, PredictError> {
        let image = image.ok_or(ConfigError::NoImage)?;
        let url = self.config.endpoint_url()?;

        let upload = FileUpload {
            file_name: image.file_name(),
            mime_type: image.mime_type(),
            bytes: std::fs::read(image.path()).map_err(|e| {
                PredictError::Unknown(format!("cannot read {}: {e}", image.path().display()))
            })?,
        };
        tracing::debug!(
            endpoint = %url,
            file = %upload.file_name,
            mime = %upload.mime_type,
            size = upload.bytes.len(),
            "uploading image"
        );

        let outcome = self
            .transport
            .post_file(&url, &upload, self.config.timeout)
            .map_err(|err| match err {
                TransportError::NoResponse(msg) => PredictError::Network(msg),
                TransportError::Request(msg) => PredictError::Unknown(msg),
            })
            .and_then(interpret);

        match &outcome {
            Ok(result) => tracing::info!(
                "prediction received: {} ({})",
                result.label,
                result.confidence_percent()
            ),
            Err(err) => tracing::warn!("prediction failed: {err}"),
        }
        outcome
    }
}

fn interpret(response: RawResponse) -> Result<PredictionResult, PredictError> {
    tracing::debug!(status = response.status, "inference response");
    if !(200..300).contains(&response.status) {
        let body = String::from_utf8_lossy(&response.body);
        let body: String = body.chars().take(MAX_LOGGED_BODY).collect();
        tracing::warn!(status = response.status, "server error body: {body}");
        return Err(PredictError::Server {
            status: response.status,
            body,
        });
    }
    PredictionResult::from_body(&response.body).map_err(|e| PredictError::Unknown(e.to_string()))
}
