//! REST client for the persistence API
//!
//! # Endpoints
//!
//! - `GET /api/courses/:course_id`
//! - `PUT /api/courses/:course_id/modules/:module_id/content-order`
//! - `PUT /api/courses/:course_id/modules/:module_id/sections/:section_id/lesson-order`
//!
//! Non-2xx answers carry the `{ message, code, details? }` error envelope;
//! its message is surfaced in [`StoreError::Rejected`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;

use crate::config::SyncConfig;
use crate::models::Course;

use super::{ContentStore, ReorderContentRequest, ReorderLessonsRequest, StoreError};

/// Error envelope returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// [`ContentStore`] backed by the console's REST API
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    client: Client,
    base_url: Url,
}

impl HttpContentStore {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            StoreError::transport(format!("Invalid API URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::transport(format!(
                "API URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    /// Create a client from sync configuration
    pub fn from_config(config: &SyncConfig) -> Result<Self, StoreError> {
        config.validate().map_err(StoreError::config)?;
        Self::new(&config.api_base_url, config.request_timeout())
    }

    /// Build an endpoint URL, percent-encoding every path segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn decode(response: Response) -> Result<Course, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Course>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(envelope) => {
                tracing::debug!(
                    "API error {} ({}): {}",
                    status,
                    envelope.code.as_deref().unwrap_or("UNKNOWN"),
                    envelope.message
                );
                envelope.message
            }
            Err(_) => body,
        };

        if status == StatusCode::NOT_FOUND {
            Err(StoreError::not_found(message))
        } else {
            Err(StoreError::rejected(status.as_u16(), message))
        }
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn fetch_course(&self, course_id: &str) -> Result<Course, StoreError> {
        let url = self.endpoint(&["api", "courses", course_id]);
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn persist_module_order(
        &self,
        course_id: &str,
        module_id: &str,
        request: &ReorderContentRequest,
    ) -> Result<Course, StoreError> {
        let url = self.endpoint(&[
            "api",
            "courses",
            course_id,
            "modules",
            module_id,
            "content-order",
        ]);
        tracing::debug!("PUT {} ({} item(s))", url, request.ordered_items.len());

        let response = self.client.put(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn persist_section_lessons(
        &self,
        course_id: &str,
        module_id: &str,
        section_id: &str,
        request: &ReorderLessonsRequest,
    ) -> Result<Course, StoreError> {
        let url = self.endpoint(&[
            "api",
            "courses",
            course_id,
            "modules",
            module_id,
            "sections",
            section_id,
            "lesson-order",
        ]);
        tracing::debug!("PUT {} ({} lesson(s))", url, request.lessons.len());

        let response = self.client.put(url).json(request).send().await?;
        Self::decode(response).await
    }
}
