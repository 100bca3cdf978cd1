//! HTTP implementations of the catalog and interpreter services.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{FilterCategory, Recipe, RecipeId, RecipeSummary},
    error::ApiError,
    protocol::{InterpretRequest, InterpretResponse},
};
use tracing::debug;
use url::Url;

use crate::{
    error::{CatalogError, InterpreterError},
    CatalogService, CommandInterpreter,
};

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build http client")
}

/// Parses `raw` and makes sure relative joins land under its path.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).with_context(|| format!("invalid base url '{raw}'"))
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) => api_error.error,
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => body,
        },
        Err(_) => status.to_string(),
    }
}

pub struct HttpCatalog {
    http: Client,
    base_url: Url,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: normalize_base_url(base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(path)
            .map_err(|err| CatalogError::Transport(format!("invalid catalog url: {err}")))
    }

    fn list_url(&self, filter: &FilterCategory) -> Result<Url, CatalogError> {
        if filter.is_all() {
            return self.endpoint("api/recipes");
        }
        let mut url = self.endpoint("api/recipes_by_category")?;
        url.query_pairs_mut().append_pair("category", filter.as_str());
        Ok(url)
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn list_recipes(
        &self,
        filter: &FilterCategory,
    ) -> Result<Vec<RecipeSummary>, CatalogError> {
        let url = self.list_url(filter)?;
        debug!(%url, "listing recipes");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }
        response
            .json::<Vec<RecipeSummary>>()
            .await
            .map_err(|err| CatalogError::Decode(err.to_string()))
    }

    async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, CatalogError> {
        let url = self.endpoint(&format!("api/recipe/{}", id.0))?;
        debug!(%url, "fetching recipe");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id));
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }
        response
            .json::<Recipe>()
            .await
            .map_err(|err| CatalogError::Decode(err.to_string()))
    }
}

pub struct HttpInterpreter {
    http: Client,
    endpoint: Url,
}

impl HttpInterpreter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let endpoint = normalize_base_url(base_url)?
            .join("api/process_command")
            .context("invalid interpreter endpoint")?;
        Ok(Self {
            http: build_client(timeout)?,
            endpoint,
        })
    }
}

#[async_trait]
impl CommandInterpreter for HttpInterpreter {
    async fn interpret(
        &self,
        request: InterpretRequest,
    ) -> Result<InterpretResponse, InterpreterError> {
        debug!(endpoint = %self.endpoint, "posting command");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| InterpreterError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(InterpreterError::Status {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }
        response
            .json::<InterpretResponse>()
            .await
            .map_err(|err| InterpreterError::Decode(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
