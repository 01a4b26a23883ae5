use async_trait::async_trait;
use contracts::domain::a001_category::aggregate::{Category, CreateCategoryDto};
use contracts::domain::a002_site::aggregate::{CreateSiteDto, Site, UpdateSiteDto};
use contracts::domain::catalogue::CatalogueDocument;
use contracts::shared::api_response::ApiResponse;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::sync::{ApiFailure, CatalogueApi};
use crate::shared::api_utils::api_base;

/// REST client for the catalogue endpoints
#[derive(Debug, Clone)]
pub struct HttpCatalogueApi {
    base: String,
}

impl Default for HttpCatalogueApi {
    fn default() -> Self {
        Self::new(api_base())
    }
}

impl HttpCatalogueApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ApiFailure> {
    request
        .send()
        .await
        .map_err(|e| ApiFailure::Network(e.to_string()))
}

async fn send_json<B: Serialize>(request: RequestBuilder, body: &B) -> Result<Response, ApiFailure> {
    request
        .json(body)
        .map_err(|e| ApiFailure::Decode(format!("Failed to serialize request: {}", e)))?
        .send()
        .await
        .map_err(|e| ApiFailure::Network(e.to_string()))
}

/// Разобрать конверт; не-2xx и `success: false` становятся `Rejected`
async fn envelope<T: DeserializeOwned>(response: Response) -> Result<ApiResponse<T>, ApiFailure> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiFailure::Decode(e.to_string()))?;
    let parsed = serde_json::from_str::<ApiResponse<T>>(&text);

    match parsed {
        Ok(body) if response.ok() && body.success => Ok(body),
        Ok(body) => Err(ApiFailure::Rejected {
            status,
            error: body.error_or(&format!("Request failed with status {}", status)),
        }),
        Err(_) if !response.ok() => Err(ApiFailure::Rejected {
            status,
            error: format!("Request failed with status {}", status),
        }),
        Err(e) => Err(ApiFailure::Decode(e.to_string())),
    }
}

#[async_trait(?Send)]
impl CatalogueApi for HttpCatalogueApi {
    async fn fetch_document(&self) -> Result<CatalogueDocument, ApiFailure> {
        let response = send(Request::get(&self.url("/api/data"))).await?;
        let body = envelope::<CatalogueDocument>(response).await?;
        body.data
            .ok_or_else(|| ApiFailure::Decode("response has no data".to_string()))
    }

    async fn add_site(&self, dto: &CreateSiteDto) -> Result<ApiResponse<Site>, ApiFailure> {
        let response = send_json(Request::post(&self.url("/api/sites")), dto).await?;
        envelope(response).await
    }

    async fn update_site(
        &self,
        id: i64,
        dto: &UpdateSiteDto,
    ) -> Result<ApiResponse<Site>, ApiFailure> {
        let response = send_json(Request::put(&self.url(&format!("/api/sites/{}", id))), dto).await?;
        envelope(response).await
    }

    async fn delete_site(&self, id: i64) -> Result<ApiResponse<Site>, ApiFailure> {
        let response = send(Request::delete(&self.url(&format!("/api/sites/{}", id)))).await?;
        envelope(response).await
    }

    async fn add_category(
        &self,
        dto: &CreateCategoryDto,
    ) -> Result<ApiResponse<Category>, ApiFailure> {
        let response = send_json(Request::post(&self.url("/api/categories")), dto).await?;
        envelope(response).await
    }

    async fn delete_category(&self, id: i64) -> Result<ApiResponse<Category>, ApiFailure> {
        let response =
            send(Request::delete(&self.url(&format!("/api/categories/{}", id)))).await?;
        envelope(response).await
    }
}
