use crate::domain::config::ApiConfig;
use crate::domain::error::{WfDocsError, WfDocsResult};
use crate::domain::item::{Collection, CollectionList, Item, ItemList, UpdateItemRequest};
use crate::infrastructure::config::Credentials;
use crate::infrastructure::http::api::{CollectionApi, MAX_PAGE_SIZE};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Webflow Data API v2 client bound to one site and collection
#[derive(Debug, Clone)]
pub struct WebflowClient {
    client: Client,
    base_url: Url,
    site_id: String,
    collection_id: String,
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

impl WebflowClient {
    /// Build a client with bearer auth attached to every request
    pub fn new(api: &ApiConfig, credentials: Credentials) -> WfDocsResult<Self> {
        let base_url = Url::parse(api.base_url.trim()).map_err(|e| WfDocsError::Config {
            message: format!("Invalid API base URL '{}': {}", api.base_url, e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(WfDocsError::Config {
                message: format!("API base URL '{}' cannot carry a path", api.base_url),
            });
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", credentials.token))
            .map_err(|_| WfDocsError::Config {
                message: "API token contains invalid characters".to_string(),
            })?;
        auth.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, auth);
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            site_id: credentials.site_id,
            collection_id: credentials.collection_id,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> WfDocsResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WfDocsError::Config {
                message: format!("API base URL '{}' cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&UpdateItemRequest>,
    ) -> WfDocsResult<T> {
        tracing::debug!(method = %method, url = %url, "sending request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        tracing::debug!(method = %method, url = %url, status = %response.status(), "received response");
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> WfDocsResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(api_error(status, &body));
    }
    Ok(response.json::<T>().await?)
}

/// Turn a non-success response into an error carrying status and body
pub(crate) fn api_error(status: StatusCode, body: &str) -> WfDocsError {
    let trimmed = body.trim();
    let message = match serde_json::from_str::<ApiErrorBody>(trimmed) {
        Ok(ApiErrorBody {
            message: Some(message),
            details,
        }) if details.is_empty() => message,
        Ok(ApiErrorBody {
            message: Some(message),
            details,
        }) => format!(
            "{} ({})",
            message,
            serde_json::Value::Array(details)
        ),
        _ if !trimmed.is_empty() => trimmed.to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    WfDocsError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl CollectionApi for WebflowClient {
    async fn list_items(&self, limit: u32, offset: u32) -> WfDocsResult<ItemList> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let mut url = self.endpoint(&["collections", &self.collection_id, "items"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        self.send(Method::GET, url, None).await
    }

    async fn get_item(&self, item_id: &str) -> WfDocsResult<Item> {
        let url = self.endpoint(&["collections", &self.collection_id, "items", item_id])?;
        self.send(Method::GET, url, None).await
    }

    async fn update_item(&self, item_id: &str, request: &UpdateItemRequest) -> WfDocsResult<Item> {
        let url = self.endpoint(&["collections", &self.collection_id, "items", item_id])?;
        let item: Item = self.send(Method::PATCH, url, Some(request)).await?;
        tracing::info!(item_id = %item.id, "item updated");
        Ok(item)
    }

    async fn list_collections(&self) -> WfDocsResult<Vec<Collection>> {
        let url = self.endpoint(&["sites", &self.site_id, "collections"])?;
        let list: CollectionList = self.send(Method::GET, url, None).await?;
        Ok(list.collections)
    }
}
