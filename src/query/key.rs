//! Logical queries and their cache keys
//!
//! A [`LogicalQuery`] says *what* to fetch, independent of transport. Its
//! [`QueryKey`] is the identity used both to index the cache and to
//! de-duplicate concurrent fetches.
//!
//! # Key format
//!
//! Keys are built from the variant tag, then numeric parameters, then free
//! text, joined with `:`. Free text always comes last so a term containing
//! `:` cannot be mistaken for another key.
//!
//! | Query | Key |
//! |---|---|
//! | `Trending { count: 10 }` | `trending:10` |
//! | `Vegetarian { count: 15 }` | `vegetarian:15` |
//! | `CuisineFiltered { cuisine: "Italian", count: 15 }` | `cuisine:15:italian` |
//! | `TextSearch { term: " Pasta " }` | `search:pasta` |
//! | `RecipeDetail { recipe_id: 12345 }` | `recipe:12345` |
//!
//! Free text is trimmed, whitespace runs are collapsed to one space, and the
//! result is lowercased, so equivalent searches share one cache entry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::Tier;

/// Separator between key segments
const KEY_SEPARATOR: char = ':';

/// A typed description of the content to fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalQuery {
    /// Random popular recipes
    Trending { count: u32 },
    /// Random vegetarian recipes
    Vegetarian { count: u32 },
    /// Recipes from one cuisine, e.g. "Italian"
    CuisineFiltered { cuisine: String, count: u32 },
    /// Free-text recipe search
    TextSearch { term: String },
    /// Full information for a single recipe
    RecipeDetail { recipe_id: u64 },
}

impl LogicalQuery {
    pub fn trending(count: u32) -> Self {
        LogicalQuery::Trending { count }
    }

    pub fn vegetarian(count: u32) -> Self {
        LogicalQuery::Vegetarian { count }
    }

    pub fn cuisine(cuisine: impl Into<String>, count: u32) -> Self {
        LogicalQuery::CuisineFiltered {
            cuisine: cuisine.into(),
            count,
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        LogicalQuery::TextSearch { term: term.into() }
    }

    pub fn recipe(recipe_id: u64) -> Self {
        LogicalQuery::RecipeDetail { recipe_id }
    }

    /// Short variant tag, also the first key segment
    pub fn tag(&self) -> &'static str {
        match self {
            LogicalQuery::Trending { .. } => "trending",
            LogicalQuery::Vegetarian { .. } => "vegetarian",
            LogicalQuery::CuisineFiltered { .. } => "cuisine",
            LogicalQuery::TextSearch { .. } => "search",
            LogicalQuery::RecipeDetail { .. } => "recipe",
        }
    }

    /// The cache tier this query's results live in
    ///
    /// Each variant maps to exactly one tier so lookups never have to guess:
    ///
    /// | Variant | Tier |
    /// |---|---|
    /// | Trending, Vegetarian | Persistent |
    /// | CuisineFiltered, TextSearch, RecipeDetail | Session |
    pub fn tier(&self) -> Tier {
        match self {
            LogicalQuery::Trending { .. } | LogicalQuery::Vegetarian { .. } => Tier::Persistent,
            LogicalQuery::CuisineFiltered { .. }
            | LogicalQuery::TextSearch { .. }
            | LogicalQuery::RecipeDetail { .. } => Tier::Session,
        }
    }

    /// Human-readable context for status messages ("pasta", "Italian", ...)
    pub fn describe(&self) -> String {
        match self {
            LogicalQuery::Trending { .. } => "popular recipes".to_string(),
            LogicalQuery::Vegetarian { .. } => "vegetarian recipes".to_string(),
            LogicalQuery::CuisineFiltered { cuisine, .. } => cuisine.trim().to_string(),
            LogicalQuery::TextSearch { term } => term.trim().to_string(),
            LogicalQuery::RecipeDetail { recipe_id } => format!("recipe {}", recipe_id),
        }
    }

    /// Derives the cache key for this query
    pub fn key(&self) -> QueryKey {
        build_key(self)
    }
}

/// Deterministic cache and subscription identity of a [`LogicalQuery`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueryKey {
    fn from(s: &str) -> Self {
        QueryKey(s.to_string())
    }
}

/// Builds the cache key for a query (see the module docs for the format)
pub fn build_key(query: &LogicalQuery) -> QueryKey {
    let tag = query.tag();
    let key = match query {
        LogicalQuery::Trending { count } | LogicalQuery::Vegetarian { count } => {
            format!("{tag}{KEY_SEPARATOR}{count}")
        }
        LogicalQuery::CuisineFiltered { cuisine, count } => format!(
            "{tag}{KEY_SEPARATOR}{count}{KEY_SEPARATOR}{}",
            normalize_text(cuisine)
        ),
        LogicalQuery::TextSearch { term } => {
            format!("{tag}{KEY_SEPARATOR}{}", normalize_text(term))
        }
        LogicalQuery::RecipeDetail { recipe_id } => format!("{tag}{KEY_SEPARATOR}{recipe_id}"),
    };
    QueryKey(key)
}

/// Trims, collapses whitespace runs and lowercases free text
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
