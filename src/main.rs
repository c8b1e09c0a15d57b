//! recipebox - Browse recipes from the Spoonacular API in the terminal
//!
//! A terminal UI application that shows popular and vegetarian recipes,
//! recipes by cuisine, search results and full recipe details, backed by a
//! two-tier response cache.

mod app;
mod ui;

use std::io;
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use app::App;
use recipebox::cache::{default_cache_dir, TieredCache};
use recipebox::cli::{Cli, StartupConfig};
use recipebox::config::AppConfig;
use recipebox::data::SpoonacularClient;
use recipebox::logging;
use recipebox::query::QueryOrchestrator;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Builds the cache for the configured directory, or the platform default
fn open_cache(cache_dir: Option<&std::path::Path>) -> TieredCache {
    match cache_dir {
        Some(dir) => TieredCache::with_dir(dir.to_path_buf()),
        None => TieredCache::new(),
    }
}

/// Removes every cached response from both tiers
fn clear_cache(cli: &Cli) -> io::Result<()> {
    open_cache(cli.cache_dir.as_deref()).clear_all()?;
    println!("Cache cleared");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.clear_cache {
        return match clear_cache(&cli) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: could not clear the cache: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // Validate everything before the terminal is taken over
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(config, startup).await {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(config: AppConfig, startup: StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = config.cache_dir.clone().or_else(default_cache_dir);
    if let Some(dir) = &log_dir {
        match logging::init(dir) {
            Ok(path) => info!(path = %path.display(), "logging started"),
            Err(e) => eprintln!("warning: could not open log file: {}", e),
        }
    }
    info!(?config, "starting recipebox");

    let cache = Arc::new(open_cache(config.cache_dir.as_deref()));
    let fetcher = Arc::new(SpoonacularClient::with_base_url(
        config.api_key.clone(),
        config.base_url.clone(),
    ));
    let orchestrator = QueryOrchestrator::new(cache, fetcher);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Home lists and the start screen begin loading here
    let mut app = App::new(&orchestrator, config.page_sizes, startup);

    // Main event loop
    let result = loop {
        // Render UI
        if let Err(e) = terminal.draw(|f| ui::render(f, &app)) {
            break Err(e);
        }

        // Poll for keyboard events with 100ms timeout
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => app.handle_key(key),
                Ok(_) => {}
                Err(e) => break Err(e),
            },
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        // Check if we should quit
        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        warn!(error = %e, "terminal error");
    }
    info!("exiting");
    Ok(result?)
}
