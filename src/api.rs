//! Remote REST gateway for the two durable resources (mata kuliah, tugas).
//! All durable state lives behind this API; the daemon itself stores nothing.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Course, Task, TaskStatus};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never completed (connect failure, timeout).
    #[error("network error: {0}")]
    Transport(String),

    /// The response body did not decode as the expected shape.
    #[error("failed to decode response: {0}")]
    BadResponse(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    pub nama: String,
    pub deskripsi: Option<String>,
    pub sks: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub nama: String,
    pub deskripsi: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub mata_kuliah_id: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub mata_kuliah_id: Option<String>,
}

/// Bearer-authenticated JSON client. Handlers run on the synchronous IPC
/// loop, so this wraps the blocking reqwest client.
pub struct ApiClient {
    base_url: String,
    token: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn execute(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Transport(format!(
                        "request timed out after {}s",
                        DEFAULT_TIMEOUT_SECS
                    ))
                } else {
                    ApiError::Transport(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            // Capture the body best-effort so the UI can show why.
            let body = resp.text().unwrap_or_default();
            warn!(status = status.as_u16(), "API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        debug!(status = status.as_u16(), "API request ok");
        Ok(resp)
    }

    fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        resp.json().map_err(|e| ApiError::BadResponse(e.to_string()))
    }

    pub fn list_courses(&self, include: Option<&str>) -> Result<Vec<Course>, ApiError> {
        let mut req = self.client.get(self.url("/matkul"));
        if let Some(include) = include.filter(|s| !s.is_empty()) {
            req = req.query(&[("include", include)]);
        }
        Self::decode(self.execute(req)?)
    }

    pub fn get_course(&self, id: &str, include: Option<&str>) -> Result<Course, ApiError> {
        let mut req = self.client.get(self.url(&format!("/matkul/{}", id)));
        if let Some(include) = include.filter(|s| !s.is_empty()) {
            req = req.query(&[("include", include)]);
        }
        Self::decode(self.execute(req)?)
    }

    pub fn create_course(&self, payload: &CoursePayload) -> Result<Course, ApiError> {
        let req = self.client.post(self.url("/matkul")).json(payload);
        Self::decode(self.execute(req)?)
    }

    pub fn update_course(&self, id: &str, payload: &CoursePayload) -> Result<Course, ApiError> {
        let req = self
            .client
            .put(self.url(&format!("/matkul/{}", id)))
            .json(payload);
        Self::decode(self.execute(req)?)
    }

    pub fn delete_course(&self, id: &str) -> Result<(), ApiError> {
        self.execute(self.client.delete(self.url(&format!("/matkul/{}", id))))?;
        Ok(())
    }

    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ApiError> {
        let mut req = self.client.get(self.url("/tugas"));
        if let Some(status) = filter.status {
            req = req.query(&[("status", status.wire_name())]);
        }
        if let Some(course_id) = filter.mata_kuliah_id.as_deref().filter(|s| !s.is_empty()) {
            req = req.query(&[("mataKuliahId", course_id)]);
        }
        Self::decode(self.execute(req)?)
    }

    pub fn create_task(&self, payload: &TaskPayload) -> Result<Task, ApiError> {
        let req = self.client.post(self.url("/tugas")).json(payload);
        Self::decode(self.execute(req)?)
    }

    pub fn update_task(&self, id: &str, payload: &TaskPayload) -> Result<Task, ApiError> {
        let req = self
            .client
            .put(self.url(&format!("/tugas/{}", id)))
            .json(payload);
        Self::decode(self.execute(req)?)
    }

    pub fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.execute(self.client.delete(self.url(&format!("/tugas/{}", id))))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{
        body_partial_json, header, method, path, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// The blocking client must be built, used, and dropped off the async
    /// runtime; each case runs entirely inside spawn_blocking.
    async fn on_client<T: Send + 'static>(
        server: &MockServer,
        op: impl FnOnce(ApiClient) -> T + Send + 'static,
    ) -> T {
        let uri = server.uri();
        tokio::task::spawn_blocking(move || {
            let api = ApiClient::new(uri, "secret-token").expect("build client");
            op(api)
        })
        .await
        .expect("join blocking task")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_courses_sends_bearer_and_include() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/matkul"))
            .and(query_param("include", "tugas"))
            .and(header("authorization", "Bearer secret-token"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "c1", "nama": "Struktur Data", "sks": 3, "tugas": [] }
            ])))
            .mount(&server)
            .await;

        let courses = on_client(&server, |api| api.list_courses(Some("tugas")))
            .await
            .expect("list courses");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].nama, "Struktur Data");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_include_sends_no_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/matkul"))
            .and(query_param_is_missing("include"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let courses = on_client(&server, |api| api.list_courses(Some("")))
            .await
            .expect("list courses");
        assert!(courses.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_task_posts_full_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tugas"))
            .and(body_partial_json(json!({
                "nama": "Laporan Praktikum 1",
                "deadline": "2026-03-01T00:00:00Z",
                "mataKuliahId": "c1",
                "status": "BELUM_DIKERJAKAN"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "t1",
                "nama": "Laporan Praktikum 1",
                "deadline": "2026-03-01T00:00:00Z",
                "mataKuliahId": "c1",
                "status": "BELUM_DIKERJAKAN"
            })))
            .mount(&server)
            .await;

        let payload = TaskPayload {
            nama: "Laporan Praktikum 1".to_string(),
            deskripsi: None,
            deadline: Some(
                DateTime::parse_from_rfc3339("2026-03-01T00:00:00Z")
                    .expect("deadline fixture")
                    .with_timezone(&Utc),
            ),
            mata_kuliah_id: "c1".to_string(),
            status: TaskStatus::BelumDikerjakan,
        };
        let task = on_client(&server, move |api| api.create_task(&payload))
            .await
            .expect("create task");
        assert_eq!(task.id, "t1");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn task_filter_builds_query_pairs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tugas"))
            .and(query_param("status", "SELESAI"))
            .and(query_param("mataKuliahId", "c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let filter = TaskFilter {
            status: Some(TaskStatus::Selesai),
            mata_kuliah_id: Some("c1".to_string()),
        };
        let tasks = on_client(&server, move |api| api.list_tasks(&filter))
            .await
            .expect("list tasks");
        assert!(tasks.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/tugas/t1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        on_client(&server, |api| api.delete_task("t1"))
            .await
            .expect("delete task");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn error_status_captures_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/matkul/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("matkul tidak ditemukan"))
            .mount(&server)
            .await;

        let err = on_client(&server, |api| api.delete_course("missing"))
            .await
            .expect_err("expected status error");
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "matkul tidak ditemukan");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
