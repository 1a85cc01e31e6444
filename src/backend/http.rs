//! `reqwest` client for the task backend's REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::{BackendError, CreateTaskRequest, CreateTaskResponse, ProcessingStatus, TaskBackend, TaskResult, TaskStatusResponse};
use crate::core::config::Settings;

/// Collection segment appended to the configured base URL
const TASKS_SEGMENT: &str = "tasks";

/// HTTP implementation of [`TaskBackend`].
///
/// Every request is bounded by the client-wide timeout; there are no retries
/// here, the status poller's attempt budget is the only retry mechanism.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Builds a client for `base_url` (e.g. `http://app:8080/api/v1`).
    pub fn new(base_url: Url, request_timeout: Duration) -> Result<Self, BackendError> {
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, BackendError> {
        Self::new(settings.backend_url.clone(), settings.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/tasks/<segments...>`, with each segment percent-encoded.
    ///
    /// A base that already ends in `/tasks` is used as the collection itself.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let has_collection = self
            .base_url
            .path_segments()
            .and_then(|mut s| s.rfind(|segment| !segment.is_empty()))
            == Some(TASKS_SEGMENT);

        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            if !has_collection {
                path.push(TASKS_SEGMENT);
            }
            path.extend(segments);
        }
        Ok(url)
    }

    /// Decodes a 2xx body, or turns anything else into `Rejected`.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        log::warn!("Backend returned {}: {}", status, truncate(&body, 200));
        Err(BackendError::Rejected {
            status: status.as_u16(),
            detail: rejection_detail(status, &body),
        })
    }
}

/// Extracts `error`/`message` from an error body, falling back to the HTTP status.
fn rejection_detail(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<CreateTaskResponse>(body)
        .ok()
        .and_then(|r| r.failure_detail().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[async_trait]
impl TaskBackend for HttpBackend {
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreateTaskResponse, BackendError> {
        let url = self.endpoint(&[])?;
        log::debug!("POST {} for {}", url, request.url);

        let response = self.client.post(url).json(request).send().await?;
        let reply: CreateTaskResponse = Self::decode(response).await?;

        if !reply.success {
            return Err(BackendError::Rejected {
                status: 200,
                detail: reply.failure_detail().unwrap_or("request was not accepted").to_string(),
            });
        }
        Ok(reply)
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse, BackendError> {
        let url = self.endpoint(&[task_id])?;
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn task_results(&self, task_id: &str) -> Result<Vec<TaskResult>, BackendError> {
        let url = self.endpoint(&[task_id, "results"])?;
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn processing_status(&self) -> Result<ProcessingStatus, BackendError> {
        let url = self.endpoint(&["processing", "status"])?;
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{TaskPreset, TaskState};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend_for(server: &MockServer) -> HttpBackend {
        let base = Url::parse(&format!("{}/api/v1/", server.uri())).unwrap();
        HttpBackend::new(base, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_endpoint_building() {
        let backend = HttpBackend::new(Url::parse("http://app:8080/api/v1").unwrap(), Duration::from_secs(1)).unwrap();
        assert_eq!(backend.endpoint(&[]).unwrap().as_str(), "http://app:8080/api/v1/tasks");
        assert_eq!(
            backend.endpoint(&["abc", "results"]).unwrap().as_str(),
            "http://app:8080/api/v1/tasks/abc/results"
        );
        assert_eq!(
            backend.endpoint(&["a/b"]).unwrap().as_str(),
            "http://app:8080/api/v1/tasks/a%2Fb"
        );

        let legacy = HttpBackend::new(Url::parse("http://app:8080/api/v1/tasks/").unwrap(), Duration::from_secs(1)).unwrap();
        assert_eq!(legacy.endpoint(&[]).unwrap().as_str(), "http://app:8080/api/v1/tasks");
        assert_eq!(
            legacy.endpoint(&["abc"]).unwrap().as_str(),
            "http://app:8080/api/v1/tasks/abc"
        );
    }

    #[tokio::test]
    async fn test_create_task_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/tasks"))
            .and(body_json(serde_json::json!({
                "url": "https://youtu.be/dQw4w9WgXcQ",
                "chatId": "42",
                "format": "mp4",
                "quality": "720p",
                "resolution": "720p"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "downloadId": "task-1",
                "message": "Task created successfully"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend_for(&server).await;
        let request = CreateTaskRequest::new("https://youtu.be/dQw4w9WgXcQ", 42, &TaskPreset::default());
        let reply = backend.create_task(&request).await.unwrap();

        assert!(reply.success);
        assert_eq!(reply.download_id.as_deref(), Some("task-1"));
    }

    #[tokio::test]
    async fn test_create_task_error_body_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "success": false,
                "error": "quota exceeded"
            })))
            .mount(&server)
            .await;

        let backend = backend_for(&server).await;
        let request = CreateTaskRequest::new("https://youtu.be/dQw4w9WgXcQ", 42, &TaskPreset::default());
        match backend.create_task(&request).await {
            Err(BackendError::Rejected { status, detail }) => {
                assert_eq!(status, 500);
                assert_eq!(detail, "quota exceeded");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_task_success_false_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error": "unsupported url"
            })))
            .mount(&server)
            .await;

        let backend = backend_for(&server).await;
        let request = CreateTaskRequest::new("https://youtu.be/dQw4w9WgXcQ", 1, &TaskPreset::default());
        let err = backend.create_task(&request).await.unwrap_err();
        assert!(matches!(err, BackendError::Rejected { ref detail, .. } if detail == "unsupported url"));
    }

    #[tokio::test]
    async fn test_rejection_without_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let backend = backend_for(&server).await;
        let err = backend.task_status("missing").await.unwrap_err();
        assert!(matches!(err, BackendError::Rejected { status: 404, ref detail } if detail.contains("404")));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_status_results_and_processing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/task-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "task-1",
                "status": "PROCESSING"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/task-1/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"fileName": "clip.mp4", "fileSizeBytes": 1048576, "isPrimaryResult": true}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/processing/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "maxConcurrentTasks": 4,
                "availableSlots": 3,
                "currentlyProcessing": 1,
                "memoryPressure": "LOW",
                "hasEnoughMemory": true
            })))
            .mount(&server)
            .await;

        let backend = backend_for(&server).await;

        let status = backend.task_status("task-1").await.unwrap();
        assert_eq!(status.status, TaskState::Processing);

        let results = backend.task_results("task-1").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].file_size_bytes, Some(1_048_576));

        let processing = backend.processing_status().await.unwrap();
        assert_eq!(processing.available_slots, 3);
        assert_eq!(processing.memory_pressure.as_deref(), Some("LOW"));
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on port 9 of localhost in the test environment
        let backend = HttpBackend::new(Url::parse("http://127.0.0.1:9/api").unwrap(), Duration::from_millis(500)).unwrap();
        let err = backend.processing_status().await.unwrap_err();
        assert!(err.is_transport());
    }
}
