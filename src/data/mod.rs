//! Core data models for recipebox
//!
//! This module contains the recipe types returned by the upstream recipe API
//! and the client that fetches them.

pub mod client;
pub mod error;

pub use client::{RecipeFetcher, SpoonacularClient, DEFAULT_BASE_URL};
pub use error::{ErrorInfo, ErrorKind};

use serde::{Deserialize, Serialize};

/// Cuisines offered in the cuisine bar, in display order
pub const CUISINES: [&str; 6] = ["Italian", "American", "Thai", "Japanese", "Chinese", "African"];

/// A recipe as it appears in list-shaped responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Upstream recipe identifier, used to open the detail view
    pub id: u64,
    /// Recipe title
    pub title: String,
    /// Image URL, if the API supplied one
    #[serde(default)]
    pub image: Option<String>,
}

/// A single ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub id: Option<u64>,
    /// The ingredient line as written, e.g. "2 cups flour"
    pub original: String,
}

/// Full recipe information for the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Total preparation and cooking time in minutes
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    /// HTML summary paragraph
    #[serde(default)]
    pub summary: Option<String>,
    /// HTML cooking instructions
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<Ingredient>,
}

/// The result of a successful fetch, as stored in the cache
///
/// List-shaped queries produce `List`; recipe lookups produce `Detail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RecipePayload {
    List(Vec<RecipeSummary>),
    Detail(RecipeDetail),
}

impl RecipePayload {
    /// Returns true for a list with no items
    ///
    /// A detail payload is never empty: a missing recipe is reported by the
    /// API as an HTTP failure instead.
    pub fn is_empty(&self) -> bool {
        match self {
            RecipePayload::List(items) => items.is_empty(),
            RecipePayload::Detail(_) => false,
        }
    }

    /// Number of recipes carried by the payload
    pub fn len(&self) -> usize {
        match self {
            RecipePayload::List(items) => items.len(),
            RecipePayload::Detail(_) => 1,
        }
    }

    pub fn as_list(&self) -> Option<&[RecipeSummary]> {
        match self {
            RecipePayload::List(items) => Some(items),
            RecipePayload::Detail(_) => None,
        }
    }

    pub fn as_detail(&self) -> Option<&RecipeDetail> {
        match self {
            RecipePayload::Detail(detail) => Some(detail),
            RecipePayload::List(_) => None,
        }
    }
}
