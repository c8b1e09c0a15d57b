//! Application state management for recipebox
//!
//! This module contains the main application state: which screen is shown,
//! keyboard handling, and one query subscription per on-screen list so each
//! view renders its own loading, empty, error and success states.

use crossterm::event::{KeyCode, KeyEvent};

use recipebox::cli::{StartScreen, StartupConfig};
use recipebox::config::PageSizes;
use recipebox::data::{RecipeDetail, RecipeSummary, CUISINES};
use recipebox::query::{
    LogicalQuery, QueryOrchestrator, QueryState, QueryStatus, QuerySubscription,
};

/// The screen currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Popular and vegetarian lists
    Home,
    /// Recipes of one cuisine
    Cuisine(String),
    /// Results for a search term
    Searched(String),
    /// Full recipe view
    Recipe(u64),
}

impl From<StartScreen> for Screen {
    fn from(start: StartScreen) -> Self {
        match start {
            StartScreen::Home => Screen::Home,
            StartScreen::Search(term) => Screen::Searched(term),
            StartScreen::Cuisine(name) => Screen::Cuisine(name),
            StartScreen::Recipe(id) => Screen::Recipe(id),
        }
    }
}

/// Which home list has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSection {
    Popular,
    Vegetarian,
}

/// Tab shown in the recipe view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Instructions,
    Ingredients,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a search term
    Search,
}

/// Main application struct managing screens and query subscriptions
pub struct App {
    /// Current screen
    pub screen: Screen,
    /// Previous screens with their selected index, for going back
    history: Vec<(Screen, usize)>,
    /// Index of the selected recipe in the focused list
    pub selected_index: usize,
    /// Focused list on the home screen
    pub focus: HomeSection,
    pub detail_tab: DetailTab,
    /// Scroll offset for the recipe view
    pub detail_scroll: u16,
    pub input_mode: InputMode,
    /// Search term being typed
    pub search_input: String,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    page_sizes: PageSizes,
    /// Popular recipes on the home screen
    pub popular: QuerySubscription,
    /// Vegetarian recipes on the home screen
    pub vegetarian: QuerySubscription,
    /// Cuisine or search results
    pub listing: QuerySubscription,
    /// The open recipe
    pub detail: QuerySubscription,
}

impl App {
    /// Creates the app and starts loading the home lists and the start screen
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        orchestrator: &QueryOrchestrator,
        page_sizes: PageSizes,
        startup: StartupConfig,
    ) -> Self {
        let mut app = Self {
            screen: Screen::Home,
            history: Vec::new(),
            selected_index: 0,
            focus: HomeSection::Popular,
            detail_tab: DetailTab::Instructions,
            detail_scroll: 0,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            show_help: false,
            should_quit: false,
            page_sizes,
            popular: orchestrator.subscribe(),
            vegetarian: orchestrator.subscribe(),
            listing: orchestrator.subscribe(),
            detail: orchestrator.subscribe(),
        };

        app.popular
            .resolve(LogicalQuery::trending(page_sizes.trending));
        app.vegetarian
            .resolve(LogicalQuery::vegetarian(page_sizes.vegetarian));

        let start = Screen::from(startup.start_screen);
        if start != Screen::Home {
            app.open(start);
        }
        app
    }

    /// Query backing a non-home screen
    fn query_for(&self, screen: &Screen) -> Option<LogicalQuery> {
        match screen {
            Screen::Home => None,
            Screen::Cuisine(name) => Some(LogicalQuery::cuisine(name, self.page_sizes.cuisine)),
            Screen::Searched(term) => Some(LogicalQuery::search(term)),
            Screen::Recipe(id) => Some(LogicalQuery::recipe(*id)),
        }
    }

    /// Shows a screen, resolving its query unless it already shows data
    ///
    /// A query that settled as `Error` or `Empty` is resolved again, so
    /// reopening the screen asks the API once more.
    fn show(&mut self, screen: Screen) {
        if let Some(query) = self.query_for(&screen) {
            let subscription = match screen {
                Screen::Recipe(_) => &mut self.detail,
                _ => &mut self.listing,
            };
            let showing = subscription.query() == Some(&query)
                && matches!(
                    subscription.state().status,
                    QueryStatus::Success | QueryStatus::Loading
                );
            if !showing {
                subscription.resolve(query);
            }
        }
        if let Screen::Recipe(_) = screen {
            self.detail_tab = DetailTab::Instructions;
            self.detail_scroll = 0;
        }
        self.screen = screen;
    }

    /// Navigates to a screen, remembering the current one
    pub fn open(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        let previous = std::mem::replace(&mut self.screen, Screen::Home);
        self.history.push((previous, self.selected_index));
        self.selected_index = 0;
        self.show(screen);
    }

    /// Returns to the previous screen; quits from an empty history
    pub fn back(&mut self) {
        match self.history.pop() {
            Some((screen, selected)) => {
                self.show(screen);
                self.selected_index = selected;
            }
            None => self.should_quit = true,
        }
    }

    /// Returns to the home screen and forgets the history
    pub fn go_home(&mut self) {
        self.history.clear();
        self.selected_index = 0;
        self.show(Screen::Home);
    }

    /// Subscription behind the focused list or recipe
    pub fn focused(&self) -> &QuerySubscription {
        match (&self.screen, self.focus) {
            (Screen::Home, HomeSection::Popular) => &self.popular,
            (Screen::Home, HomeSection::Vegetarian) => &self.vegetarian,
            (Screen::Recipe(_), _) => &self.detail,
            _ => &self.listing,
        }
    }

    fn focused_mut(&mut self) -> &mut QuerySubscription {
        match (&self.screen, self.focus) {
            (Screen::Home, HomeSection::Popular) => &mut self.popular,
            (Screen::Home, HomeSection::Vegetarian) => &mut self.vegetarian,
            (Screen::Recipe(_), _) => &mut self.detail,
            _ => &mut self.listing,
        }
    }

    /// Recipes of the focused list, empty when it has none loaded
    pub fn focused_items(&self) -> Vec<RecipeSummary> {
        list_items(&self.focused().state())
    }

    pub fn selected_recipe(&self) -> Option<RecipeSummary> {
        self.focused_items().into_iter().nth(self.selected_index)
    }

    /// Loaded recipe for the recipe screen
    pub fn current_detail(&self) -> Option<RecipeDetail> {
        self.detail
            .state()
            .data
            .and_then(|payload| payload.as_detail().cloned())
    }

    /// Re-fetches the focused query
    pub fn retry(&mut self) {
        self.focused_mut().retry();
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application
    /// - `Up`/`k`, `Down`/`j`: Move selection (or scroll a recipe)
    /// - `Enter`: Open the selected recipe
    /// - `Tab`: Switch home list, or recipe tab
    /// - `1`-`6`: Open a cuisine
    /// - `/`: Search
    /// - `r`: Retry the focused query
    /// - `h`: Home
    /// - `Esc`/`Backspace`: Go back
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.input_mode == InputMode::Search {
            self.handle_search_key(key_event);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.search_input.clear();
            }
            KeyCode::Char('h') => self.go_home(),
            KeyCode::Char('r') => self.retry(),
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                self.open(Screen::Cuisine(CUISINES[index].to_string()));
            }
            KeyCode::Esc | KeyCode::Backspace => self.back(),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Tab => self.toggle(),
            KeyCode::Enter => {
                if let Some(recipe) = self.selected_recipe() {
                    if !matches!(self.screen, Screen::Recipe(_)) {
                        self.open(Screen::Recipe(recipe.id));
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
            }
            KeyCode::Enter => {
                let term = self.search_input.trim().to_string();
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
                if !term.is_empty() {
                    self.open(Screen::Searched(term));
                }
            }
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Char(c) => self.search_input.push(c),
            _ => {}
        }
    }

    fn toggle(&mut self) {
        match self.screen {
            Screen::Home => {
                self.focus = match self.focus {
                    HomeSection::Popular => HomeSection::Vegetarian,
                    HomeSection::Vegetarian => HomeSection::Popular,
                };
                self.selected_index = 0;
            }
            Screen::Recipe(_) => {
                self.detail_tab = match self.detail_tab {
                    DetailTab::Instructions => DetailTab::Ingredients,
                    DetailTab::Ingredients => DetailTab::Instructions,
                };
                self.detail_scroll = 0;
            }
            _ => {}
        }
    }

    fn move_up(&mut self) {
        if let Screen::Recipe(_) = self.screen {
            self.detail_scroll = self.detail_scroll.saturating_sub(1);
        } else {
            self.selected_index = self.selected_index.saturating_sub(1);
        }
    }

    fn move_down(&mut self) {
        if let Screen::Recipe(_) = self.screen {
            self.detail_scroll = self.detail_scroll.saturating_add(1);
            return;
        }
        let count = self.focused_items().len();
        if count > 0 && self.selected_index < count - 1 {
            self.selected_index += 1;
        }
    }
}

/// Recipes carried by a list-shaped state
pub fn list_items(state: &QueryState) -> Vec<RecipeSummary> {
    state
        .data
        .as_ref()
        .and_then(|payload| payload.as_list())
        .map(<[RecipeSummary]>::to_vec)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use recipebox::cache::TieredCache;
    use recipebox::data::{ErrorInfo, RecipeFetcher, RecipePayload};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serves a few recipes for every list and a detail for every id
    struct StubFetcher;

    #[async_trait]
    impl RecipeFetcher for StubFetcher {
        async fn fetch(&self, query: &LogicalQuery) -> Result<RecipePayload, ErrorInfo> {
            match query {
                LogicalQuery::RecipeDetail { recipe_id } => Ok(RecipePayload::Detail(
                    serde_json::from_value(serde_json::json!({
                        "id": recipe_id,
                        "title": format!("Recipe {}", recipe_id),
                    }))
                    .map_err(ErrorInfo::from)?,
                )),
                LogicalQuery::TextSearch { term } if term == "nothing" => {
                    Ok(RecipePayload::List(vec![]))
                }
                _ => Ok(RecipePayload::List(
                    (1..=3)
                        .map(|id| RecipeSummary {
                            id,
                            title: format!("{} {}", query.describe(), id),
                            image: None,
                        })
                        .collect(),
                )),
            }
        }
    }

    /// Cuisine lookups always fail and searches find nothing
    #[derive(Default)]
    struct OutageFetcher {
        cuisine_calls: AtomicUsize,
        search_calls: AtomicUsize,
    }

    #[async_trait]
    impl RecipeFetcher for OutageFetcher {
        async fn fetch(&self, query: &LogicalQuery) -> Result<RecipePayload, ErrorInfo> {
            match query {
                LogicalQuery::CuisineFiltered { .. } => {
                    self.cuisine_calls.fetch_add(1, Ordering::SeqCst);
                    Err(ErrorInfo::http_status(503))
                }
                LogicalQuery::TextSearch { .. } => {
                    self.search_calls.fetch_add(1, Ordering::SeqCst);
                    Ok(RecipePayload::List(vec![]))
                }
                _ => StubFetcher.fetch(query).await,
            }
        }
    }

    fn outage_app() -> (App, Arc<OutageFetcher>) {
        let fetcher = Arc::new(OutageFetcher::default());
        let orchestrator = QueryOrchestrator::new(
            Arc::new(TieredCache::in_memory()),
            fetcher.clone(),
        );
        let app = App::new(&orchestrator, PageSizes::default(), StartupConfig::default());
        (app, fetcher)
    }

    fn test_app(startup: StartupConfig) -> App {
        let orchestrator = QueryOrchestrator::new(
            Arc::new(TieredCache::in_memory()),
            Arc::new(StubFetcher),
        );
        App::new(&orchestrator, PageSizes::default(), startup)
    }

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_new_app_starts_home_and_loads_lists() {
        let app = test_app(StartupConfig::default());
        assert_eq!(app.screen, Screen::Home);

        let popular = app.popular.settled().await;
        let vegetarian = app.vegetarian.settled().await;
        assert_eq!(popular.status, QueryStatus::Success);
        assert_eq!(vegetarian.status, QueryStatus::Success);
        assert_eq!(
            app.popular.query(),
            Some(&LogicalQuery::trending(10))
        );
    }

    #[tokio::test]
    async fn test_start_screen_from_cli_search() {
        let app = test_app(StartupConfig {
            start_screen: StartScreen::Search("pasta".to_string()),
        });
        assert_eq!(app.screen, Screen::Searched("pasta".to_string()));
        assert_eq!(app.listing.query(), Some(&LogicalQuery::search("pasta")));
    }

    #[tokio::test]
    async fn test_number_keys_open_cuisines() {
        let mut app = test_app(StartupConfig::default());

        app.handle_key(key_event(KeyCode::Char('3')));

        assert_eq!(app.screen, Screen::Cuisine("Thai".to_string()));
        assert_eq!(
            app.listing.query(),
            Some(&LogicalQuery::cuisine("Thai", 15))
        );
    }

    #[tokio::test]
    async fn test_search_input_submits_on_enter() {
        let mut app = test_app(StartupConfig::default());

        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Search);
        for c in "soup".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.screen, Screen::Searched("soup".to_string()));
    }

    #[tokio::test]
    async fn test_blank_search_is_ignored() {
        let mut app = test_app(StartupConfig::default());

        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char(' ')));
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.screen, Screen::Home);
    }

    #[tokio::test]
    async fn test_q_while_typing_is_text_not_quit() {
        let mut app = test_app(StartupConfig::default());

        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char('q')));

        assert!(!app.should_quit);
        assert_eq!(app.search_input, "q");
    }

    #[tokio::test]
    async fn test_enter_opens_selected_recipe_and_esc_returns() {
        let mut app = test_app(StartupConfig::default());
        app.popular.settled().await;

        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_index, 1);
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.screen, Screen::Recipe(2));
        let detail = app.detail.settled().await;
        assert_eq!(detail.status, QueryStatus::Success);
        assert_eq!(app.current_detail().map(|d| d.id), Some(2));

        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Home);
        assert_eq!(app.selected_index, 1, "selection restored on back");
    }

    #[tokio::test]
    async fn test_selection_stops_at_last_item() {
        let mut app = test_app(StartupConfig::default());
        app.popular.settled().await;

        for _ in 0..10 {
            app.handle_key(key_event(KeyCode::Char('j')));
        }

        assert_eq!(app.selected_index, 2);
    }

    #[tokio::test]
    async fn test_tab_switches_home_focus() {
        let mut app = test_app(StartupConfig::default());

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.focus, HomeSection::Vegetarian);
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.focus, HomeSection::Popular);
    }

    #[tokio::test]
    async fn test_tab_switches_detail_tab() {
        let mut app = test_app(StartupConfig {
            start_screen: StartScreen::Recipe(7),
        });

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.detail_tab, DetailTab::Ingredients);
    }

    #[tokio::test]
    async fn test_empty_search_settles_empty() {
        let app = test_app(StartupConfig {
            start_screen: StartScreen::Search("nothing".to_string()),
        });

        let state = app.listing.settled().await;
        assert_eq!(state.status, QueryStatus::Empty);
        assert!(app.focused_items().is_empty());
    }

    #[tokio::test]
    async fn test_esc_on_home_quits() {
        let mut app = test_app(StartupConfig::default());
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_h_returns_home_and_clears_history() {
        let mut app = test_app(StartupConfig::default());
        app.handle_key(key_event(KeyCode::Char('1')));
        app.handle_key(key_event(KeyCode::Char('2')));

        app.handle_key(key_event(KeyCode::Char('h')));
        assert_eq!(app.screen, Screen::Home);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_help_overlay_intercepts_keys() {
        let mut app = test_app(StartupConfig::default());
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('1')));
        assert_eq!(app.screen, Screen::Home);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_retry_reloads_focused_list() {
        let mut app = test_app(StartupConfig::default());
        app.popular.settled().await;

        app.handle_key(key_event(KeyCode::Char('r')));

        assert_eq!(app.popular.state().status, QueryStatus::Loading);
        assert_eq!(app.popular.settled().await.status, QueryStatus::Success);
    }

    #[tokio::test]
    async fn test_reopening_failed_cuisine_fetches_again() {
        let (mut app, fetcher) = outage_app();

        app.handle_key(key_event(KeyCode::Char('1')));
        assert_eq!(app.listing.settled().await.status, QueryStatus::Error);
        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Home);

        app.handle_key(key_event(KeyCode::Char('1')));
        assert_eq!(app.listing.state().status, QueryStatus::Loading);
        assert_eq!(app.listing.settled().await.status, QueryStatus::Error);
        assert_eq!(fetcher.cuisine_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_repeating_empty_search_fetches_again() {
        let (mut app, fetcher) = outage_app();

        for _ in 0..2 {
            app.handle_key(key_event(KeyCode::Char('/')));
            for c in "zzzznotreal".chars() {
                app.handle_key(key_event(KeyCode::Char(c)));
            }
            app.handle_key(key_event(KeyCode::Enter));
            assert_eq!(app.listing.settled().await.status, QueryStatus::Empty);
            app.handle_key(key_event(KeyCode::Esc));
        }

        assert_eq!(fetcher.search_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reopening_loaded_cuisine_keeps_its_state() {
        let mut app = test_app(StartupConfig::default());

        app.handle_key(key_event(KeyCode::Char('2')));
        let first = app.listing.settled().await;
        app.handle_key(key_event(KeyCode::Esc));
        app.handle_key(key_event(KeyCode::Char('2')));

        assert_eq!(app.listing.state(), first);
    }
}
