use reqwest::Client as HttpClient;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use shared::UPLOAD_PATH;

use crate::error::RelayError;

/// One field of the incoming multipart form, kept as received.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Client for the inference service's upload endpoint.
#[derive(Clone)]
pub struct UpstreamClient {
    http_client: HttpClient,
    upload_url: Option<String>,
}

impl UpstreamClient {
    pub fn new(base_url: Option<&str>) -> Self {
        Self {
            http_client: HttpClient::new(),
            upload_url: base_url
                .map(|base| format!("{}{}", base.trim_end_matches('/'), UPLOAD_PATH)),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.upload_url.is_some()
    }

    pub fn upload_url(&self) -> Result<&str, RelayError> {
        self.upload_url
            .as_deref()
            .ok_or(RelayError::UpstreamNotConfigured)
    }

    /// Re-issues `fields` as a multipart POST and returns the upstream's
    /// status code and parsed JSON body.
    pub async fn forward(&self, fields: Vec<FormField>) -> Result<(u16, Value), RelayError> {
        let url = self.upload_url()?;
        let form = build_form(fields)?;

        let response = self.http_client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Rejected(status.as_u16()));
        }

        let body = response.bytes().await?;
        let json = serde_json::from_slice(&body).map_err(|e| RelayError::InvalidJson(e.to_string()))?;
        Ok((status.as_u16(), json))
    }
}

fn build_form(fields: Vec<FormField>) -> Result<Form, RelayError> {
    let mut form = Form::new();
    for field in fields {
        let mut part = Part::bytes(field.data);
        if let Some(file_name) = field.file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = field.content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| RelayError::Multipart(e.to_string()))?;
        }
        form = form.part(field.name, part);
    }
    Ok(form)
}
