use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::models::VerifyOutcome;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Name of the multipart part carrying the photo. The dashboard sends
/// `image`, the verify page sends `file`; the backend contract has both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageField {
    Image,
    File,
}

impl ImageField {
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::File => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_owned();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.jpg".to_owned());
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

/// One proof attempt. Borrowed from the page that owns the selection and
/// dropped once the request settles.
#[derive(Debug, Clone, Copy)]
pub struct ProofSubmission<'a> {
    pub user_id: &'a str,
    pub task: &'a str,
    pub image: &'a ImagePayload,
}

impl ProofSubmission<'_> {
    fn into_form(self, field: ImageField) -> Result<Form, ApiError> {
        let part = Part::bytes(self.image.bytes.clone())
            .file_name(self.image.file_name.clone())
            .mime_str(&self.image.mime)
            .map_err(|err| ApiError::Request(err.to_string()))?;
        Ok(Form::new()
            .text("user_id", self.user_id.to_owned())
            .text("task", self.task.to_owned())
            .part(field.field_name(), part))
    }
}

pub struct VerifyService<'a> {
    client: &'a ApiClient,
}

impl<'a> VerifyService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn submit(
        &self,
        submission: ProofSubmission<'_>,
        field: ImageField,
    ) -> Result<VerifyOutcome, ApiError> {
        let form = submission.into_form(field)?;
        let outcome: VerifyOutcome = self.client.post_multipart("tasks/validate", form).await?;
        info!(
            task = submission.task,
            verified = outcome.verified,
            field = field.field_name(),
            "proof checked"
        );
        Ok(outcome)
    }
}
