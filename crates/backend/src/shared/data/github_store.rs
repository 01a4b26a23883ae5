use async_trait::async_trait;
use contracts::domain::catalogue::CatalogueDocument;
use contracts::domain::common::IdAllocator;
use serde::{Deserialize, Serialize};

use super::content_codec::{decode_content, encode_content};
use super::{CatalogueStore, Snapshot, StoreError};
use crate::shared::config::{GithubConfig, StorageKind};

/// Каталог в файле удалённого репозитория (GitHub contents API).
///
/// Ревизия это `sha` файла. Запись передаёт `sha`, прочитанный ранее; если файл
/// успел измениться, API отвечает 409 и запись отклоняется как конфликт.
/// Повторов и слияния нет.
pub struct GithubStore {
    client: reqwest::Client,
    contents_url: String,
    branch: Option<String>,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ContentsFile {
    content: String,
    sha: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: ContentsRef,
}

#[derive(Debug, Deserialize)]
struct ContentsRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RemoteMessage {
    message: String,
}

impl GithubStore {
    pub fn new(config: &GithubConfig, token: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("sitedir-backend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            contents_url: contents_url(config),
            branch: config.branch().map(str::to_string),
            token,
        })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, &self.contents_url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
    }
}

/// `{api_base}/repos/{owner}/{repo}/contents/{path}` with every path segment escaped
fn contents_url(config: &GithubConfig) -> String {
    let path = config
        .path
        .trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "{}/repos/{}/{}/contents/{}",
        config.api_base.trim_end_matches('/'),
        urlencoding::encode(config.owner.trim()),
        urlencoding::encode(config.repo.trim()),
        path
    )
}

fn transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Transport(format!("request timed out: {}", e))
    } else {
        StoreError::Transport(e.to_string())
    }
}

/// Текст ошибки из ответа API (`{"message": ...}`) или тело как есть
async fn remote_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<RemoteMessage>(&body) {
        Ok(m) => m.message,
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body,
    }
}

#[async_trait]
impl CatalogueStore for GithubStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Github
    }

    fn id_allocator(&self) -> IdAllocator {
        IdAllocator::Timestamp
    }

    async fn read(&self) -> Result<Snapshot, StoreError> {
        let mut request = self.request(reqwest::Method::GET);
        if let Some(branch) = &self.branch {
            request = request.query(&[("ref", branch)]);
        }
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Remote {
                status: status.as_u16(),
                message: remote_message(response).await,
            });
        }

        let file: ContentsFile = response
            .json()
            .await
            .map_err(|e| StoreError::Encoding(format!("unexpected contents response: {}", e)))?;
        if let Some(encoding) = file.encoding.as_deref() {
            if encoding != "base64" {
                return Err(StoreError::Encoding(format!(
                    "unsupported content encoding '{}'",
                    encoding
                )));
            }
        }

        let text = decode_content(&file.content)?;
        let document = CatalogueDocument::from_json(&text)?;
        tracing::debug!("Read catalogue from remote at revision {}", file.sha);
        Ok(Snapshot {
            document,
            revision: Some(file.sha),
        })
    }

    async fn write(
        &self,
        document: &CatalogueDocument,
        revision: Option<&str>,
        message: &str,
    ) -> Result<Option<String>, StoreError> {
        let body = PutContentsRequest {
            message,
            content: encode_content(&document.to_pretty_json()?),
            sha: revision,
            branch: self.branch.as_deref(),
        };

        let response = self
            .request(reqwest::Method::PUT)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::CONFLICT
            || status == reqwest::StatusCode::PRECONDITION_FAILED
        {
            return Err(StoreError::Conflict(remote_message(response).await));
        }
        if !status.is_success() {
            return Err(StoreError::Remote {
                status: status.as_u16(),
                message: remote_message(response).await,
            });
        }

        let updated: PutContentsResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Encoding(format!("unexpected update response: {}", e)))?;
        tracing::info!(
            "Committed catalogue to remote: \"{}\" (revision {})",
            message,
            updated.content.sha
        );
        Ok(Some(updated.content.sha))
    }
}
