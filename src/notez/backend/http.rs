//! Typed HTTP client for the note storage service.

use super::NotesBackend;
use crate::error::{NotezError, Result};
use crate::model::{Note, NoteId, NotePayload};
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, Response, Url};
use serde::Deserialize;

pub struct HttpBackend {
    base: Url,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    #[serde(default)]
    ok: bool,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self> {
        let base = parse_base_url(base_url)?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| NotezError::Config(format!("Cannot use '{}' as a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&NotePayload>,
    ) -> Result<Response> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        ensure_success(response).await
    }
}

/// Validates an http(s) base URL and trims a trailing slash.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| NotezError::Config(format!("Invalid API URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(NotezError::Config(format!(
            "Unsupported API URL scheme '{}' in '{}'",
            other, raw
        ))),
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!("service responded {}: {}", status, body);
    Err(NotezError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl NotesBackend for HttpBackend {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let response = self.send(Method::GET, &["notes"], None).await?;
        Ok(response.json().await?)
    }

    async fn get_note(&self, id: &NoteId) -> Result<Note> {
        let response = self
            .send(Method::GET, &["notes", id.as_str()], None)
            .await?;
        Ok(response.json().await?)
    }

    async fn create_note(&self, payload: &NotePayload) -> Result<Note> {
        let response = self.send(Method::POST, &["notes"], Some(payload)).await?;
        Ok(response.json().await?)
    }

    async fn update_note(&self, id: &NoteId, payload: &NotePayload) -> Result<Note> {
        let response = self
            .send(Method::PUT, &["notes", id.as_str()], Some(payload))
            .await?;
        Ok(response.json().await?)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        // Whatever the service returns on delete is ignored.
        self.send(Method::DELETE, &["notes", id.as_str()], None)
            .await?;
        Ok(())
    }

    async fn health(&self) -> Result<bool> {
        let url = self.endpoint(&["health"])?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }
        let body: HealthBody = response.json().await?;
        Ok(body.ok)
    }
}
