//! Command-line interface parsing for recipebox
//!
//! This module handles parsing of CLI arguments using clap: API settings,
//! page sizes, cache maintenance, and the screen to open at startup.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::DEFAULT_BASE_URL;

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// `--search` was given an empty or blank term
    #[error("Search term must not be empty")]
    EmptySearch,

    /// `--cuisine` was given an empty or blank name
    #[error("Cuisine name must not be empty. Try one of: {}", crate::data::CUISINES.join(", "))]
    EmptyCuisine,
}

/// recipebox - Browse popular, vegetarian and cuisine recipes in the terminal
#[derive(Parser, Debug)]
#[command(name = "recipebox")]
#[command(about = "Browse and search recipes from the Spoonacular API")]
#[command(version)]
pub struct Cli {
    /// Spoonacular API key
    #[arg(long, env = "RECIPEBOX_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the recipe API
    #[arg(long, env = "RECIPEBOX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Open directly on the results for a search term
    ///
    /// Examples:
    ///   recipebox --search pasta
    ///   recipebox --search "chicken curry"
    #[arg(long, value_name = "TERM", conflicts_with_all = ["cuisine", "recipe"])]
    pub search: Option<String>,

    /// Open directly on a cuisine, e.g. Italian, Thai, Japanese
    #[arg(long, value_name = "NAME", conflicts_with = "recipe")]
    pub cuisine: Option<String>,

    /// Open directly on a recipe by its ID
    #[arg(long, value_name = "ID")]
    pub recipe: Option<u64>,

    /// Number of popular recipes on the home screen
    #[arg(long, value_name = "N", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub trending_count: u32,

    /// Number of vegetarian recipes on the home screen
    #[arg(long, value_name = "N", default_value_t = 15, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub vegetarian_count: u32,

    /// Number of recipes shown per cuisine
    #[arg(long, value_name = "N", default_value_t = 15, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub cuisine_count: u32,

    /// Directory for cached responses and the log file
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Delete all cached responses and exit
    #[arg(long)]
    pub clear_cache: bool,
}

/// The screen shown once the terminal is set up
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StartScreen {
    #[default]
    Home,
    Search(String),
    Cuisine(String),
    Recipe(u64),
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    pub start_screen: StartScreen,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the requested start screen
    /// * `Err(CliError)` if a search term or cuisine name is blank
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let start_screen = if let Some(term) = &cli.search {
            if term.trim().is_empty() {
                return Err(CliError::EmptySearch);
            }
            StartScreen::Search(term.trim().to_string())
        } else if let Some(cuisine) = &cli.cuisine {
            if cuisine.trim().is_empty() {
                return Err(CliError::EmptyCuisine);
            }
            StartScreen::Cuisine(cuisine.trim().to_string())
        } else if let Some(id) = cli.recipe {
            StartScreen::Recipe(id)
        } else {
            StartScreen::Home
        };

        Ok(StartupConfig { start_screen })
    }
}
