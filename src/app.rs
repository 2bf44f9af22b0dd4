//! The single owner of all mutable UI state.
//!
//! Terminal events become [`Intent`]s; [`App::update`] applies one intent at a
//! time and recomputes the gallery view whenever the filter changes. Anything
//! that must happen outside the process (opening a browser, exiting) comes
//! back as an [`Effect`] for the event loop to carry out.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::catalog::ProjectRecord;
use crate::config::SiteInfo;
use crate::filter::FilterState;
use crate::nav::{NavDisclosure, Section};
use crate::store::PreferenceStore;
use crate::tags::TagFilters;
use crate::theme::ThemeController;
use crate::view::{self, GridView, LinkKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Search,
    Tags,
    Grid,
    Nav,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Search => Focus::Tags,
            Focus::Tags => Focus::Grid,
            Focus::Grid => Focus::Search,
            Focus::Nav => Focus::Nav,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Search => Focus::Grid,
            Focus::Tags => Focus::Search,
            Focus::Grid => Focus::Tags,
            Focus::Nav => Focus::Nav,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    SetQuery(String),
    ToggleTag(usize),
    ToggleTheme,
    ToggleNav,
    SelectNavLink(usize),
    FocusNext,
    FocusPrev,
    MoveTagCursor(isize),
    MoveNavCursor(isize),
    MoveCard(isize),
    OpenLink(LinkKind),
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    OpenLink(String),
    Quit,
}

pub struct App<S: PreferenceStore> {
    catalog: Vec<ProjectRecord>,
    filter: FilterState,
    tag_filters: TagFilters,
    grid: GridView,
    theme: ThemeController<S>,
    nav: NavDisclosure,
    section: Section,
    site: SiteInfo,
    search: Input,
    focus: Focus,
    focus_before_nav: Focus,
    selected_card: usize,
    grid_columns: usize,
    status: Option<String>,
}

impl<S: PreferenceStore> App<S> {
    pub fn new(catalog: Vec<ProjectRecord>, site: SiteInfo, theme: ThemeController<S>) -> Self {
        let filter = FilterState::default();
        let tag_filters = TagFilters::build(&catalog);
        let grid = view::render(&catalog, &filter);
        Self {
            catalog,
            filter,
            tag_filters,
            grid,
            theme,
            nav: NavDisclosure::default(),
            section: Section::Projects,
            site,
            search: Input::default(),
            focus: Focus::Search,
            focus_before_nav: Focus::Search,
            selected_card: 0,
            grid_columns: 1,
            status: None,
        }
    }

    pub fn update(&mut self, intent: Intent) -> Effect {
        tracing::debug!(?intent, "dispatch");
        self.status = None;
        match intent {
            Intent::SetQuery(value) => {
                if self.search.value() != value {
                    self.search = Input::new(value.clone());
                }
                self.filter.search_query = value;
                self.selected_card = 0;
                self.refresh_grid();
            }
            Intent::ToggleTag(index) => {
                if self.tag_filters.toggle(index, &mut self.filter).is_some() {
                    let control = &self.tag_filters.controls()[index];
                    tracing::info!(
                        tag = %control.tag,
                        aria_pressed = control.aria_pressed(),
                        "tag filter toggled"
                    );
                    self.selected_card = 0;
                    self.refresh_grid();
                }
            }
            Intent::ToggleTheme => {
                let effective = self.theme.toggle();
                tracing::info!(?effective, "theme toggled");
            }
            Intent::ToggleNav => {
                if self.nav.toggle() {
                    self.focus_before_nav = self.focus;
                    self.focus = Focus::Nav;
                } else {
                    self.focus = self.focus_before_nav;
                }
            }
            Intent::SelectNavLink(index) => {
                if let Some(section) = self.nav.select(index) {
                    self.section = section;
                    self.focus = match section {
                        Section::Projects => Focus::Search,
                        Section::About | Section::Contact => Focus::Grid,
                    };
                }
            }
            Intent::FocusNext => {
                if self.section == Section::Projects {
                    self.focus = self.focus.next();
                }
            }
            Intent::FocusPrev => {
                if self.section == Section::Projects {
                    self.focus = self.focus.prev();
                }
            }
            Intent::MoveTagCursor(delta) => self.tag_filters.move_cursor(delta),
            Intent::MoveNavCursor(delta) => self.nav.move_cursor(delta),
            Intent::MoveCard(delta) => {
                let count = self.grid.card_count();
                if count > 0 {
                    self.selected_card = self
                        .selected_card
                        .saturating_add_signed(delta)
                        .min(count - 1);
                }
            }
            Intent::OpenLink(kind) => return self.open_link(kind),
            Intent::Quit => return Effect::Quit,
        }
        Effect::None
    }

    /// Maps a key press to an intent for the current focus. Unmapped keys
    /// edit the search field while it has focus.
    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        match self.intent_for_key(key) {
            Some(intent) => self.update(intent),
            None => {
                if self.focus == Focus::Search && self.section == Section::Projects {
                    let before = self.search.value().to_string();
                    let _ = self.search.handle_event(&Event::Key(key));
                    if self.search.value() != before {
                        let value = self.search.value().to_string();
                        return self.update(Intent::SetQuery(value));
                    }
                }
                Effect::None
            }
        }
    }

    fn intent_for_key(&self, key: KeyEvent) -> Option<Intent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return Some(Intent::Quit),
            KeyCode::Char('t') if ctrl => return Some(Intent::ToggleTheme),
            KeyCode::Char('n') if ctrl => return Some(Intent::ToggleNav),
            KeyCode::Esc if self.nav.is_open() => return Some(Intent::ToggleNav),
            KeyCode::Esc => return Some(Intent::Quit),
            _ => {}
        }

        match self.focus {
            Focus::Nav => match key.code {
                KeyCode::Up => Some(Intent::MoveNavCursor(-1)),
                KeyCode::Down => Some(Intent::MoveNavCursor(1)),
                KeyCode::Enter => Some(Intent::SelectNavLink(self.nav.cursor())),
                _ => None,
            },
            _ if self.section != Section::Projects => None,
            Focus::Search => match key.code {
                KeyCode::Tab | KeyCode::Down => Some(Intent::FocusNext),
                KeyCode::BackTab => Some(Intent::FocusPrev),
                KeyCode::Char('u') if ctrl => Some(Intent::SetQuery(String::new())),
                _ => None,
            },
            Focus::Tags => match key.code {
                KeyCode::Tab => Some(Intent::FocusNext),
                KeyCode::BackTab => Some(Intent::FocusPrev),
                KeyCode::Left => Some(Intent::MoveTagCursor(-1)),
                KeyCode::Right => Some(Intent::MoveTagCursor(1)),
                KeyCode::Char(' ') | KeyCode::Enter => {
                    Some(Intent::ToggleTag(self.tag_filters.cursor()))
                }
                _ => None,
            },
            Focus::Grid => match key.code {
                KeyCode::Tab => Some(Intent::FocusNext),
                KeyCode::BackTab => Some(Intent::FocusPrev),
                KeyCode::Up => Some(Intent::MoveCard(-(self.grid_columns as isize))),
                KeyCode::Down => Some(Intent::MoveCard(self.grid_columns as isize)),
                KeyCode::Left => Some(Intent::MoveCard(-1)),
                KeyCode::Right => Some(Intent::MoveCard(1)),
                KeyCode::Enter | KeyCode::Char('l') => Some(Intent::OpenLink(LinkKind::Demo)),
                KeyCode::Char('c') => Some(Intent::OpenLink(LinkKind::Source)),
                _ => None,
            },
        }
    }

    fn open_link(&mut self, kind: LinkKind) -> Effect {
        if self.section != Section::Projects {
            return Effect::None;
        }
        let Some(card) = self.grid.cards().get(self.selected_card) else {
            return Effect::None;
        };
        match card.link(kind) {
            Some(link) => {
                tracing::info!(url = %link.url, "opening link");
                Effect::OpenLink(link.url.clone())
            }
            None => {
                self.status = Some(format!("{} has no {} link", card.title, kind.label()));
                Effect::None
            }
        }
    }

    fn refresh_grid(&mut self) {
        self.grid = view::render(&self.catalog, &self.filter);
        let count = self.grid.card_count();
        self.selected_card = self.selected_card.min(count.saturating_sub(1));
    }

    /// Up/Down step by this many cards so they move a whole grid row.
    pub fn set_grid_columns(&mut self, columns: usize) {
        self.grid_columns = columns.max(1);
    }

    pub fn set_status(&mut self, message: String) {
        self.status = Some(message);
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn tag_filters(&self) -> &TagFilters {
        &self.tag_filters
    }

    pub fn grid(&self) -> &GridView {
        &self.grid
    }

    pub fn theme(&self) -> &ThemeController<S> {
        &self.theme
    }

    pub fn nav(&self) -> &NavDisclosure {
        &self.nav
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn site(&self) -> &SiteInfo {
        &self.site
    }

    pub fn search(&self) -> &Input {
        &self.search
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected_card(&self) -> usize {
        self.selected_card
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{builtin_catalog, ProjectLinks};
    use crate::store::MemoryStore;
    use crate::theme::{EffectiveTheme, THEME_KEY};
    use crate::view::EMPTY_MESSAGE;
    use pretty_assertions::assert_eq;

    fn app() -> App<MemoryStore> {
        app_with(builtin_catalog())
    }

    fn app_with(catalog: Vec<ProjectRecord>) -> App<MemoryStore> {
        let theme = ThemeController::activate(MemoryStore::default(), true);
        App::new(catalog, SiteInfo::default(), theme)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn titles(app: &App<MemoryStore>) -> Vec<String> {
        app.grid()
            .cards()
            .iter()
            .map(|card| card.title.clone())
            .collect()
    }

    fn tag_index(app: &App<MemoryStore>, tag: &str) -> usize {
        app.tag_filters()
            .controls()
            .iter()
            .position(|control| control.tag == tag)
            .unwrap()
    }

    #[test]
    fn starts_with_full_gallery() {
        let app = app();
        assert_eq!(titles(&app).len(), 4);
        assert_eq!(app.focus(), Focus::Search);
        assert_eq!(app.section(), Section::Projects);
    }

    #[test]
    fn typing_in_search_filters_immediately() {
        let mut app = app();
        for c in "api".chars() {
            assert_eq!(app.handle_key(key(KeyCode::Char(c))), Effect::None);
        }
        assert_eq!(app.filter().search_query, "api");
        assert_eq!(titles(&app), vec!["Task Manager API"]);

        app.handle_key(ctrl('u'));
        assert_eq!(app.search().value(), "");
        assert_eq!(titles(&app).len(), 4);
    }

    #[test]
    fn set_query_updates_the_input_field() {
        let mut app = app();
        app.update(Intent::SetQuery("zzz".to_string()));
        assert_eq!(app.search().value(), "zzz");
        assert_eq!(
            app.grid(),
            &GridView::Empty {
                message: EMPTY_MESSAGE
            }
        );
    }

    #[test]
    fn tag_toggle_twice_is_a_no_op() {
        let mut app = app();
        let before = app.grid().clone();
        let python = tag_index(&app, "Python");

        app.update(Intent::ToggleTag(python));
        assert_eq!(titles(&app), vec!["Image Classifier"]);
        assert!(app.tag_filters().controls()[python].pressed);

        app.update(Intent::ToggleTag(python));
        assert!(app.filter().selected_tags.is_empty());
        assert_eq!(app.grid(), &before);
    }

    #[test]
    fn tag_keys_move_cursor_and_toggle() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::Tags);
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(
            app.filter().selected_tags.iter().cloned().collect::<Vec<_>>(),
            vec!["Go".to_string()]
        );
        assert_eq!(titles(&app), vec!["Task Manager API"]);
    }

    #[test]
    fn theme_toggle_persists_opposite_of_system() {
        let mut app = app();
        assert_eq!(app.theme().effective(), EffectiveTheme::Dark);
        app.handle_key(ctrl('t'));
        assert_eq!(app.theme().effective(), EffectiveTheme::Light);
        assert_eq!(
            app.theme().store().get(THEME_KEY).as_deref(),
            Some("light")
        );
    }

    #[test]
    fn nav_toggle_and_link_selection() {
        let mut app = app();
        app.handle_key(ctrl('n'));
        assert!(app.nav().is_open());
        assert_eq!(app.nav().aria_expanded(), "true");
        assert_eq!(app.focus(), Focus::Nav);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.nav().is_open());
        assert_eq!(app.section(), Section::About);

        app.update(Intent::ToggleNav);
        app.update(Intent::SelectNavLink(0));
        assert_eq!(app.section(), Section::Projects);
        assert_eq!(app.focus(), Focus::Search);
    }

    #[test]
    fn escape_closes_nav_before_quitting() {
        let mut app = app();
        app.update(Intent::FocusNext);
        app.update(Intent::ToggleNav);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Effect::None);
        assert!(!app.nav().is_open());
        assert_eq!(app.focus(), Focus::Tags);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Effect::Quit);
    }

    #[test]
    fn placeholder_links_do_not_open() {
        let mut app = app();
        app.update(Intent::FocusPrev);
        assert_eq!(app.focus(), Focus::Grid);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Effect::None);
        assert_eq!(app.status(), Some("Realtime Chat App has no Live link"));
    }

    #[test]
    fn real_links_come_back_as_effects() {
        let mut catalog = builtin_catalog();
        catalog[1].links = Some(ProjectLinks {
            demo: None,
            source: Some("https://example.com/classifier".to_string()),
        });
        let mut app = app_with(catalog);
        app.update(Intent::FocusPrev);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_card(), 1);
        assert_eq!(
            app.handle_key(key(KeyCode::Char('c'))),
            Effect::OpenLink("https://example.com/classifier".to_string())
        );
    }

    #[test]
    fn arrows_move_by_row_in_two_columns() {
        let mut app = app();
        app.set_grid_columns(2);
        app.update(Intent::FocusPrev);

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_card(), 2);
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.selected_card(), 3);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_card(), 1);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.selected_card(), 0);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_card(), 0);
    }

    #[test]
    fn selection_is_clamped_after_filtering() {
        let mut app = app();
        app.update(Intent::MoveCard(10));
        assert_eq!(app.selected_card(), 3);
        app.update(Intent::SetQuery("zzz".to_string()));
        assert_eq!(app.selected_card(), 0);
        app.update(Intent::MoveCard(1));
        assert_eq!(app.selected_card(), 0);
    }
}
