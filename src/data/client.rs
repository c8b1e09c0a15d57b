//! Spoonacular recipe API client
//!
//! Translates a [`LogicalQuery`] into exactly one HTTP request and classifies
//! the outcome into a payload or an [`ErrorInfo`]. The client never retries;
//! that decision belongs to the caller.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{ErrorInfo, RecipeDetail, RecipePayload, RecipeSummary};
use crate::query::LogicalQuery;

/// Base URL of the public Spoonacular API
pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";

/// Source of recipe payloads for logical queries
///
/// The production implementation is [`SpoonacularClient`]; tests substitute
/// their own.
#[async_trait]
pub trait RecipeFetcher: Send + Sync {
    /// Issues one request for `query`
    ///
    /// A successful response with zero items is `Ok` with an empty list,
    /// not an error.
    async fn fetch(&self, query: &LogicalQuery) -> Result<RecipePayload, ErrorInfo>;
}

/// Body of `/recipes/random`
#[derive(Debug, Deserialize)]
struct RandomResponse {
    recipes: Vec<RecipeSummary>,
}

/// Body of `/recipes/complexSearch`
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<RecipeSummary>,
}

/// How the body of a response is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseShape {
    Random,
    Search,
    Detail,
}

/// A request derived from a logical query, before the API key is attached
#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestPlan {
    path: String,
    params: Vec<(&'static str, String)>,
    shape: ResponseShape,
}

impl RequestPlan {
    fn for_query(query: &LogicalQuery) -> Self {
        match query {
            LogicalQuery::Trending { count } => Self {
                path: "/recipes/random".to_string(),
                params: vec![("number", count.to_string())],
                shape: ResponseShape::Random,
            },
            LogicalQuery::Vegetarian { count } => Self {
                path: "/recipes/random".to_string(),
                params: vec![
                    ("number", count.to_string()),
                    ("tags", "vegetarian".to_string()),
                ],
                shape: ResponseShape::Random,
            },
            LogicalQuery::CuisineFiltered { cuisine, count } => Self {
                path: "/recipes/complexSearch".to_string(),
                params: vec![
                    ("number", count.to_string()),
                    ("cuisine", cuisine.trim().to_string()),
                ],
                shape: ResponseShape::Search,
            },
            LogicalQuery::TextSearch { term } => Self {
                path: "/recipes/complexSearch".to_string(),
                params: vec![("query", term.trim().to_string())],
                shape: ResponseShape::Search,
            },
            LogicalQuery::RecipeDetail { recipe_id } => Self {
                path: format!("/recipes/{}/information", recipe_id),
                params: vec![],
                shape: ResponseShape::Detail,
            },
        }
    }
}

/// Client for the Spoonacular recipe API
#[derive(Clone)]
pub struct SpoonacularClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for SpoonacularClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpoonacularClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SpoonacularClient {
    /// Create a client for the public API
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client for a custom base URL (self-hosted proxy or test server)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key, base_url)
    }

    /// Create a client with a custom HTTP client
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RecipeFetcher for SpoonacularClient {
    async fn fetch(&self, query: &LogicalQuery) -> Result<RecipePayload, ErrorInfo> {
        let plan = RequestPlan::for_query(query);
        debug!(path = %plan.path, params = ?plan.params, "requesting recipes");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, plan.path))
            .query(&[("apiKey", self.api_key.as_str())])
            .query(&plan.params)
            .send()
            .await
            .map_err(|e| {
                warn!(path = %plan.path, error = %e.without_url(), "recipe request failed");
                ErrorInfo::network("Could not reach the recipe service")
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(path = %plan.path, status = status.as_u16(), "recipe request rejected");
            return Err(ErrorInfo::http_status(status.as_u16()));
        }

        let body = response.text().await.map_err(ErrorInfo::from)?;
        parse_body(plan.shape, &body)
    }
}

/// Parse a successful response body into a payload
fn parse_body(shape: ResponseShape, body: &str) -> Result<RecipePayload, ErrorInfo> {
    let payload = match shape {
        ResponseShape::Random => {
            RecipePayload::List(serde_json::from_str::<RandomResponse>(body)?.recipes)
        }
        ResponseShape::Search => {
            RecipePayload::List(serde_json::from_str::<SearchResponse>(body)?.results)
        }
        ResponseShape::Detail => RecipePayload::Detail(serde_json::from_str::<RecipeDetail>(body)?),
    };
    Ok(payload)
}
