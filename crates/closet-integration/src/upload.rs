//! Image upload: one multipart request carrying every selected file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use closet_core::InputError;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::IntegrationError;
use crate::http::{handle_response, ApiHttp};

// The server routes uploads at the slashed path; a redirect would drop
// the multipart body
const UPLOAD_PATH: &str = "/api/upload/";
const UPLOAD_FIELD: &str = "files";

/// Where the bytes of a selected file live
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A file picked in a form, not yet read
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, source: FileSource::Path(path) }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self { name: name.into(), source: FileSource::Bytes(bytes.into()) }
    }

    /// MIME type guessed from the file name
    pub fn content_type(&self) -> String {
        mime_guess::from_path(Path::new(&self.name))
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    /// Read the payload into memory
    pub async fn load(&self) -> Result<UploadFile, IntegrationError> {
        let data = match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await.map_err(|e| {
                IntegrationError::Network(format!("Failed to read {}: {}", path.display(), e))
            })?,
            FileSource::Bytes(bytes) => bytes.to_vec(),
        };
        Ok(UploadFile {
            file_name: self.name.clone(),
            content_type: self.content_type(),
            data,
        })
    }
}

/// A file payload ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    image_urls: Vec<String>,
}

/// API client for `POST /api/upload/`
#[derive(Debug, Clone)]
pub struct UploadApi {
    http: ApiHttp,
}

impl UploadApi {
    pub fn new(http: ApiHttp) -> Self {
        Self { http }
    }

    /// Build the multipart request, one `files` part per payload
    pub fn upload_request(&self, files: &[UploadFile]) -> Result<RequestBuilder, IntegrationError> {
        if files.is_empty() {
            return Err(InputError::NoFiles.into());
        }
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.data.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)?;
            form = form.part(UPLOAD_FIELD, part);
        }
        Ok(self.http.client().post(self.http.url(UPLOAD_PATH)).multipart(form))
    }

    /// Upload the files and return the URLs the server assigned, in the
    /// server's order
    pub async fn upload_images(&self, files: &[UploadFile]) -> Result<Vec<String>, IntegrationError> {
        let request = self.upload_request(files)?;
        debug!("Uploading {} file(s)", files.len());
        let response = request.send().await?;
        let body: UploadResponse = handle_response(response).await?;
        info!("Uploaded {} image(s)", body.image_urls.len());
        Ok(body.image_urls)
    }
}
