//! # Recipe Data Client
//!
//! Fetches fresh metadata (title, slug, url, image, excerpt) for a set of recipe
//! ids from the host site. The endpoint takes a form POST:
//!
//! ```text
//! action=get_recipe_data&post_ids[]=12&post_ids[]=34
//! ```
//!
//! and answers with `{"success": true, "data": [ {id, title, slug, url, image, excerpt}, ... ]}`.
//!
//! There is one attempt per call and no retry.

use crate::errors::MetadataFetchError;
use crate::ingredient_model::RecipeMetadata;
use log::{debug, info};
use serde::Deserialize;
use std::time::Duration;

/// Form action understood by the host endpoint
pub const RECIPE_DATA_ACTION: &str = "get_recipe_data";

#[derive(Debug, Deserialize)]
struct RecipeDataEnvelope {
    success: bool,
    #[serde(default)]
    data: Vec<RecipeMetadata>,
}

/// HTTP client for the host site's recipe data endpoint
#[derive(Debug, Clone)]
pub struct RecipeDataClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RecipeDataClient {
    /// Create a client posting to `endpoint` with a request timeout
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, MetadataFetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch metadata for `recipe_ids`.
    ///
    /// An empty id list returns an empty result without a request.
    pub async fn fetch(&self, recipe_ids: &[String]) -> Result<Vec<RecipeMetadata>, MetadataFetchError> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut form: Vec<(&str, &str)> = vec![("action", RECIPE_DATA_ACTION)];
        form.extend(recipe_ids.iter().map(|id| ("post_ids[]", id.as_str())));

        debug!("Requesting metadata for {} recipes from {}", recipe_ids.len(), self.endpoint);
        let response = self
            .http
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let envelope: RecipeDataEnvelope = serde_json::from_str(&body)
            .map_err(|e| MetadataFetchError::InvalidResponse(e.to_string()))?;

        if !envelope.success {
            return Err(MetadataFetchError::Rejected);
        }

        info!("Received metadata for {} recipes", envelope.data.len());
        Ok(envelope.data)
    }
}
