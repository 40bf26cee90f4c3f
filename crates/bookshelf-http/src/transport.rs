//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument, trace};

use bookshelf_core::error::{InvalidInputError, ProtocolError, TransportError};
use bookshelf_core::request::PartValue;
use bookshelf_core::{
    ApiRequest, ApiResponse, ApiUrl, ClientConfig, Error, Method, MultipartForm, RequestBody,
    Result, Transport,
};

/// Sends [`ApiRequest`]s to the configured API base with reqwest.
///
/// Every request gets the configured timeout; JSON is the default body
/// encoding. This transport attaches no credentials of its own.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: ApiUrl,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bookshelf/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Http {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        })
    }

    /// Returns the API base URL this transport is configured for.
    pub fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        let err = if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_builder() {
            return InvalidInputError::Other {
                message: err.to_string(),
            }
            .into();
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        };
        err.into()
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Build a fresh reqwest form; forms are consumed by sending, so every
/// attempt gets its own.
fn multipart_form(form: &MultipartForm) -> Result<Form> {
    let mut out = Form::new();
    for part in form.parts() {
        out = match &part.value {
            PartValue::Text(value) => out.text(part.name.clone(), value.clone()),
            PartValue::File(upload) => {
                let mut file =
                    Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
                if let Some(ref content_type) = upload.content_type {
                    file = file
                        .mime_str(content_type)
                        .map_err(|e| InvalidInputError::Other {
                            message: format!("invalid content type '{}': {}", content_type, e),
                        })?;
                }
                out.part(part.name.clone(), file)
            }
        };
    }
    Ok(out)
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.base_url.endpoint(&request.path);
        debug!(%url, retried = request.retried, "Sending request");

        let mut builder = self
            .client
            .request(reqwest_method(request.method), &url)
            .header(ACCEPT, "application/json");

        let multipart = matches!(request.body, RequestBody::Multipart(_));
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(multipart_form(form)?),
        };

        for (name, value) in &request.headers {
            // The multipart boundary is chosen by reqwest.
            if multipart && name == CONTENT_TYPE.as_str() {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?
            .to_vec();
        trace!(status = %status, len = body.len(), "Response received");

        if status.is_success() {
            Ok(ApiResponse::new(status.as_u16(), body))
        } else {
            debug!(status = %status, "Request rejected");
            Err(ProtocolError::new(status.as_u16(), &body).into())
        }
    }
}
