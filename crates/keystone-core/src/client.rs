//! HTTP client for the document and project backend.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    error::{GenerationError, Result},
    models::{Document, NewProject, Project, ProjectId},
    service::{
        BriefResponse, DocumentDirectory, GenerationService, ProjectDirectory, TaskOptions,
        TaskResponse,
    },
};

/// Default backend location.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// reqwest-backed implementation of every service trait.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct BriefRequest<'a> {
    filename: &'a str,
    persist: bool,
}

#[derive(Serialize)]
struct TaskRequest<'a> {
    filename: &'a str,
    project_id: ProjectId,
    max_tasks: u8,
    persist: bool,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<T> {
        debug!("GET {path}");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;
        decode(operation, response).await
    }

    async fn post<B, T>(&self, operation: &str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {path}");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;
        decode(operation, response).await
    }
}

fn transport_error(operation: &str, error: &reqwest::Error) -> GenerationError {
    GenerationError::service(operation).with_message(error.to_string())
}

async fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GenerationError::service(operation)
            .with_status(status.as_u16())
            .with_message(error_message(status.as_u16(), &body)));
    }

    response.json::<T>().await.map_err(|e| {
        GenerationError::service(operation)
            .with_status(status.as_u16())
            .with_message(format!("Unexpected response: {e}"))
    })
}

/// Extracts the server's own error text from a failed response body.
///
/// FastAPI puts it under `detail`, either as a string or as a list of
/// validation entries carrying `msg`.
fn error_message(status: u16, body: &str) -> String {
    let fallback = || format!("Request failed with status {status}");
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    ["detail", "message", "error"]
        .iter()
        .find_map(|key| match value.get(key)? {
            Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
            Value::Array(entries) => {
                let messages: Vec<&str> = entries
                    .iter()
                    .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                    .collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            _ => None,
        })
        .unwrap_or_else(fallback)
}

#[async_trait]
impl DocumentDirectory for ApiClient {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        self.get("List documents", "/documents").await
    }
}

#[async_trait]
impl ProjectDirectory for ApiClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get("List projects", "/projects").await
    }

    async fn create_project(&self, payload: &NewProject) -> Result<Project> {
        self.post("Create project", "/projects", payload).await
    }
}

#[async_trait]
impl GenerationService for ApiClient {
    async fn generate_project_brief(&self, filename: &str, persist: bool) -> Result<BriefResponse> {
        let request = BriefRequest { filename, persist };
        self.post("Generate project brief", "/documents/project-brief", &request)
            .await
    }

    async fn generate_tasks_from_document(
        &self,
        filename: &str,
        project_id: ProjectId,
        options: TaskOptions,
    ) -> Result<TaskResponse> {
        let request = TaskRequest {
            filename,
            project_id,
            max_tasks: options.max_tasks,
            persist: options.persist,
        };
        self.post("Generate tasks", "/documents/tasks", &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/projects"), "http://localhost:8000/projects");
    }

    #[test]
    fn test_detail_string_is_used_verbatim() {
        let message = error_message(500, r#"{"detail": "Document not found: plan.pdf"}"#);
        assert_eq!(message, "Document not found: plan.pdf");
    }

    #[test]
    fn test_validation_detail_list_is_joined() {
        let body = r#"{"detail": [{"loc": ["body", "filename"], "msg": "field required"},
                                  {"loc": ["body", "project_id"], "msg": "value is not a valid integer"}]}"#;
        assert_eq!(
            error_message(422, body),
            "field required; value is not a valid integer"
        );
    }

    #[test]
    fn test_message_and_error_keys_are_recognized() {
        assert_eq!(error_message(400, r#"{"message": "Bad input"}"#), "Bad input");
        assert_eq!(error_message(502, r#"{"error": "Upstream timeout"}"#), "Upstream timeout");
    }

    #[test]
    fn test_fallback_message_for_unstructured_body() {
        assert_eq!(
            error_message(503, "<html>Service Unavailable</html>"),
            "Request failed with status 503"
        );
        assert_eq!(error_message(500, r#"{"detail": ""}"#), "Request failed with status 500");
    }
}
