//! HTTP adapter for the lifecycle endpoints.
//!
//! Thin glue over the backend routes the hosting client serves:
//! `api/config/mcpserver` for configuration reads and writes (with
//! `?force=1` requesting a reload of running servers) and `api/tools` for
//! the live tool listing. No timeouts are applied here; request timing is
//! the backend's concern.

use super::{ConfigEndpoint, ReadConfigResponse, ToolListing, ToolsEndpoint, UpdateConfigResponse};
use crate::utils::url::construct_api_url;
use async_trait::async_trait;
use serde_json::Value;

const CONFIG_PATH: &str = "api/config/mcpserver";
const TOOLS_PATH: &str = "api/tools";

pub struct HttpEndpoint {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        construct_api_url(&self.base_url, path)
    }
}

#[async_trait]
impl ConfigEndpoint for HttpEndpoint {
    async fn read_config(&self) -> Result<ReadConfigResponse, String> {
        let response = self
            .client
            .get(self.url(CONFIG_PATH))
            .send()
            .await
            .map_err(|err| err.to_string())?;
        response.json().await.map_err(|err| err.to_string())
    }

    async fn write_config(
        &self,
        config: &Value,
        force: bool,
    ) -> Result<UpdateConfigResponse, String> {
        let mut request = self.client.post(self.url(CONFIG_PATH));
        if force {
            request = request.query(&[("force", "1")]);
        }
        let response = request
            .json(config)
            .send()
            .await
            .map_err(|err| err.to_string())?;
        response.json().await.map_err(|err| err.to_string())
    }
}

#[async_trait]
impl ToolsEndpoint for HttpEndpoint {
    async fn list_tools(&self) -> Result<ToolListing, String> {
        let response = self
            .client
            .get(self.url(TOOLS_PATH))
            .send()
            .await
            .map_err(|err| err.to_string())?;
        response.json().await.map_err(|err| err.to_string())
    }
}
