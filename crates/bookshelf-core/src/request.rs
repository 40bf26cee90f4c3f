//! Transport-neutral request and response types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;
use crate::error::{InvalidInputError, TransportError};

/// HTTP method of an [`ApiRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// The method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to the remote API, independent of any HTTP library.
///
/// Requests are plain data so they can be replayed: the refresh layer
/// resends the same value with a new `Authorization` header.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `/books/`.
    pub path: String,
    /// Header overrides, keyed by lower-case name.
    pub headers: BTreeMap<String, String>,
    pub body: RequestBody,
    /// Set once the request has been replayed after a token refresh.
    pub retried: bool,
}

impl ApiRequest {
    /// Create a request with no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            body: RequestBody::Empty,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| InvalidInputError::Other {
            message: format!("request body is not serializable: {}", e),
        })?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Attach a multipart form body.
    pub fn with_form(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Set a header, replacing any previous value.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a header, replacing any previous value.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Remove a header.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(&name.to_ascii_lowercase())
    }

    /// Returns a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Body of an [`ApiRequest`].
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// A `multipart/form-data` body that can be rebuilt for every attempt.
#[derive(Clone, Debug, Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    /// Append a file field.
    pub fn file(mut self, name: impl Into<String>, upload: FileUpload) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::File(upload),
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Returns the value of the first text field called `name`.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match &p.value {
            PartValue::Text(v) if p.name == name => Some(v.as_str()),
            _ => None,
        })
    }
}

/// One named field of a [`MultipartForm`].
#[derive(Clone, Debug)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

#[derive(Clone, Debug)]
pub enum PartValue {
    Text(String),
    File(FileUpload),
}

/// File contents for a multipart upload.
#[derive(Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).map(str::to_string);
        Self {
            file_name,
            content_type,
            bytes,
        }
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// A successful (2xx) response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            TransportError::Decode {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
