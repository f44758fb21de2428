use std::cmp::min;
use std::mem;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tracing::{debug, info};

use crate::bengali::to_bengali_number;
use crate::catalog::Catalog;
use crate::db::{
    clamp_lyrics_width, load_lyrics_width, save_lyrics_width, FavoritesStore, LYRICS_WIDTH_STEP,
};
use crate::models::Hymn;
use crate::reflection::ReflectionSource;
use crate::search::LatinCache;

use super::helpers::{
    centered_column, centered_rect, cursor_column, hymn_card_lines, surface_error, title_spans,
    ACCENT, FAVORITE,
};
use super::screens::{CategoryList, DetailScreen, HymnList, ReflectionState, Tab};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header rows: app title, subtitle and the tab bar.
const HEADER_HEIGHT: u16 = 4;
/// Search bar height including its border.
const SEARCH_HEIGHT: u16 = 3;
/// Rows moved by PageUp/PageDown.
const PAGE_STEP: isize = 5;

const APP_TITLE: &str = "জয়ধ্বনি";
const APP_SUBTITLE: &str = "বাংলা খ্রীষ্টিয় সংগীত";
const SEARCH_PLACEHOLDER: &str = "গানের নাম বা নম্বর দিয়ে খুঁজুন...";
const NO_RESULTS: &str = "গান খুঁজে পাওয়া যায়নি।";
const ALL_HYMNS_HEADING: &str = "সংকলন";
const FAVORITES_HEADING: &str = "সংরক্ষিত গান";
const REFLECTION_LOADING: &str = "আত্মিক ধ্যান তৈরি হচ্ছে...";

/// Whether the lyrics view or the browsing lists own the screen.
enum Screen {
    Browse,
    Detail(DetailScreen),
}

/// Keyboard focus inside the browse screen.
enum Mode {
    Normal,
    Searching,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    catalog: Catalog,
    favorites: FavoritesStore,
    reflections: Arc<dyn ReflectionSource>,
    latin_cache: LatinCache,
    tab: Tab,
    selected_category: Option<String>,
    query: String,
    results: HymnList,
    categories: CategoryList,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    lyrics_width: u16,
}

impl App {
    pub fn new(
        catalog: Catalog,
        favorites: FavoritesStore,
        reflections: Arc<dyn ReflectionSource>,
    ) -> Self {
        let lyrics_width = load_lyrics_width(favorites.connection());
        let categories = CategoryList::new(catalog.categories());
        let mut app = Self {
            catalog,
            favorites,
            reflections,
            latin_cache: LatinCache::new(),
            tab: Tab::Home,
            selected_category: None,
            query: String::new(),
            results: HymnList::default(),
            categories,
            screen: Screen::Browse,
            mode: Mode::Normal,
            status: None,
            lyrics_width,
        };
        app.refresh_results();
        app
    }

    /// Handle one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let screen = mem::replace(&mut self.screen, Screen::Browse);

        self.screen = match screen {
            Screen::Detail(detail) => self.handle_detail_key(code, detail, &mut exit)?,
            Screen::Browse => {
                let mode = mem::replace(&mut self.mode, Mode::Normal);
                self.mode = match mode {
                    Mode::Normal => self.handle_normal_key(code, &mut exit)?,
                    Mode::Searching => self.handle_search(code)?,
                };
                // Opening a hymn from the list replaces the browse screen.
                mem::replace(&mut self.screen, Screen::Browse)
            }
        };

        Ok(exit)
    }

    /// Background work that needs no key press, run once per loop iteration.
    pub fn tick(&mut self) {
        if let Screen::Detail(detail) = &mut self.screen {
            if detail.poll_reflection() {
                debug!(hymn = detail.hymn.id, "reflection delivered");
            }
        }
    }

    /// Hymns currently listed, in catalog order.
    pub fn visible_hymns(&self) -> Vec<&Hymn> {
        self.results
            .ids
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .collect()
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if self.showing_category_list() {
                    *exit = true;
                } else if !self.query.is_empty() {
                    self.set_query(String::new());
                } else if self.selected_category.is_some() {
                    self.selected_category = None;
                    self.refresh_results();
                } else {
                    *exit = true;
                }
            }
            KeyCode::Tab | KeyCode::Right => self.switch_tab(self.tab.offset(1)),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.tab.offset(-1)),
            KeyCode::Char('1') => self.switch_tab(Tab::Home),
            KeyCode::Char('2') => self.switch_tab(Tab::Categories),
            KeyCode::Char('3') => self.switch_tab(Tab::Favorites),
            KeyCode::Char('4') => self.switch_tab(Tab::Info),
            KeyCode::Char('/') | KeyCode::Char('s') => {
                if self.tab != Tab::Info {
                    self.clear_status();
                    return Ok(Mode::Searching);
                }
            }
            KeyCode::Char('f') => self.toggle_selected_favorite()?,
            KeyCode::Enter => self.activate_selection(),
            code => self.move_cursor(code),
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_query(String::new());
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                if self.showing_category_list() || self.results.current_id().is_some() {
                    self.activate_selection();
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Tab => return Ok(Mode::Normal),
            KeyCode::Backspace => {
                let mut query = mem::take(&mut self.query);
                query.pop();
                self.set_query(query);
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                let mut query = mem::take(&mut self.query);
                query.push(ch);
                self.set_query(query);
            }
            code => self.move_cursor(code),
        }
        Ok(Mode::Searching)
    }

    fn handle_detail_key(
        &mut self,
        code: KeyCode,
        mut detail: DetailScreen,
        exit: &mut bool,
    ) -> Result<Screen> {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                self.clear_status();
                // Favorites may have changed while the hymn was open.
                self.refresh_results();
                return Ok(Screen::Browse);
            }
            KeyCode::Up => detail.scroll_by(-1),
            KeyCode::Down => detail.scroll_by(1),
            KeyCode::PageUp => detail.scroll_by(-(PAGE_STEP as i32)),
            KeyCode::PageDown => detail.scroll_by(PAGE_STEP as i32),
            KeyCode::Home => detail.scroll = 0,
            KeyCode::Char('f') => {
                let id = detail.hymn.id;
                self.toggle_favorite(id)?;
            }
            KeyCode::Char('r') => {
                if detail.is_loading_reflection() {
                    self.set_status("Reflection already on its way.", StatusKind::Info);
                } else {
                    self.request_reflection(&mut detail);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.adjust_lyrics_width(LYRICS_WIDTH_STEP as i32)?
            }
            KeyCode::Char('-') => self.adjust_lyrics_width(-(LYRICS_WIDTH_STEP as i32))?,
            _ => {}
        }
        Ok(Screen::Detail(detail))
    }

    fn move_cursor(&mut self, code: KeyCode) {
        let selection = if self.showing_category_list() {
            &mut self.categories.selection
        } else {
            &mut self.results.selection
        };
        match code {
            KeyCode::Up => selection.move_selection(-1),
            KeyCode::Down => selection.move_selection(1),
            KeyCode::PageUp => selection.move_selection(-PAGE_STEP),
            KeyCode::PageDown => selection.move_selection(PAGE_STEP),
            KeyCode::Home => selection.select_first(),
            KeyCode::End => selection.select_last(),
            _ => {}
        }
    }

    /// Enter on the browse screen: drill into a category or open a hymn.
    fn activate_selection(&mut self) {
        if self.showing_category_list() {
            if let Some(category) = self.categories.current() {
                self.selected_category = Some(category.name.clone());
                self.results.selection.reset();
                self.refresh_results();
            }
            return;
        }

        match self.results.current_id().and_then(|id| self.catalog.get(id)) {
            Some(hymn) => {
                info!(hymn = hymn.id, "opening hymn");
                self.screen = Screen::Detail(DetailScreen::new(hymn.clone()));
                self.clear_status();
            }
            None => self.set_status("No hymn selected.", StatusKind::Error),
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.tab == tab {
            return;
        }
        self.tab = tab;
        self.selected_category = None;
        self.results.selection.reset();
        self.clear_status();
        self.refresh_results();
    }

    fn set_query(&mut self, query: String) {
        self.query = query;
        self.results.selection.reset();
        self.refresh_results();
    }

    /// Recompute the listed hymns from the active tab, category and query.
    fn refresh_results(&mut self) {
        let base: Vec<&Hymn> = match (self.tab, &self.selected_category) {
            (Tab::Categories, Some(category)) => self.catalog.in_category(category),
            (Tab::Favorites, _) => self.catalog.favorites(&self.favorites),
            _ => self.catalog.hymns().iter().collect(),
        };
        let ids: Vec<u32> = self
            .latin_cache
            .search(base, &self.query)
            .into_iter()
            .map(|hymn| hymn.id)
            .collect();
        debug!(query = %self.query, results = ids.len(), "search refreshed");
        self.results.set_ids(ids);
    }

    /// The category overview replaces the hymn list until a category is picked
    /// or a search is typed.
    fn showing_category_list(&self) -> bool {
        self.tab == Tab::Categories && self.selected_category.is_none() && self.query.is_empty()
    }

    fn toggle_selected_favorite(&mut self) -> Result<()> {
        if self.showing_category_list() || self.tab == Tab::Info {
            return Ok(());
        }
        match self.results.current_id() {
            Some(id) => {
                self.toggle_favorite(id)?;
                if self.tab == Tab::Favorites {
                    self.refresh_results();
                }
            }
            None => self.set_status("No hymn selected.", StatusKind::Error),
        }
        Ok(())
    }

    fn toggle_favorite(&mut self, id: u32) -> Result<()> {
        match self.favorites.toggle(id) {
            Ok(true) => self.set_status(
                format!("Saved hymn {} to favorites.", to_bengali_number(id)),
                StatusKind::Info,
            ),
            Ok(false) => self.set_status(
                format!("Removed hymn {} from favorites.", to_bengali_number(id)),
                StatusKind::Info,
            ),
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
        Ok(())
    }

    fn request_reflection(&mut self, detail: &mut DetailScreen) {
        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.reflections);
        let title = detail.hymn.title.clone();
        let lyrics = detail.hymn.lyrics.clone();
        info!(hymn = detail.hymn.id, "requesting reflection");

        thread::spawn(move || {
            let reflection = source.reflect(&title, &lyrics);
            // The receiver is gone if the reader already left the hymn.
            let _ = tx.send(reflection);
        });

        detail.reflection = ReflectionState::Loading(rx);
        self.clear_status();
    }

    fn adjust_lyrics_width(&mut self, delta: i32) -> Result<()> {
        let width = clamp_lyrics_width((self.lyrics_width as i32 + delta).max(0) as u16);
        if width == self.lyrics_width {
            return Ok(());
        }
        self.lyrics_width = width;
        if let Err(err) = save_lyrics_width(self.favorites.connection(), width)
            .context("lyrics width will reset on restart")
        {
            self.set_status(surface_error(&err), StatusKind::Error);
        } else {
            self.set_status(format!("Lyrics width {width}%."), StatusKind::Info);
        }
        Ok(())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Browse => self.draw_browse(frame, content_area),
            Screen::Detail(detail) => self.draw_detail(frame, content_area, detail),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }
    }

    fn draw_browse(&self, frame: &mut Frame, area: Rect) {
        let search_height = if self.tab == Tab::Info { 0 } else { SEARCH_HEIGHT };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(search_height),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        if search_height > 0 {
            self.draw_search_bar(frame, chunks[1]);
        }

        let body = chunks[2];
        if self.tab == Tab::Info {
            self.draw_info(frame, body);
        } else if self.showing_category_list() {
            self.draw_categories(frame, body);
        } else {
            self.draw_hymn_list(frame, body);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                APP_TITLE,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(APP_SUBTITLE, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.label()))
            .select(self.tab.index())
            .block(Block::default().borders(Borders::BOTTOM))
            .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[1]);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let searching = matches!(self.mode, Mode::Searching);
        let border_style = if searching {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("খুঁজুন");

        let content = if self.query.is_empty() && !searching {
            Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.query.clone())
        };
        let paragraph = Paragraph::new(Line::from(content)).block(block.clone());
        frame.render_widget(paragraph, area);

        if searching {
            let inner = block.inner(area);
            frame.set_cursor_position((cursor_column(inner, &self.query), inner.y));
        }
    }

    fn list_heading(&self) -> String {
        match (self.tab, &self.selected_category) {
            (Tab::Favorites, _) => FAVORITES_HEADING.to_string(),
            (Tab::Categories, Some(category)) => category.clone(),
            _ => ALL_HYMNS_HEADING.to_string(),
        }
    }

    fn draw_hymn_list(&self, frame: &mut Frame, area: Rect) {
        let heading = format!(
            "{} · {}",
            self.list_heading(),
            to_bengali_number(self.results.ids.len())
        );
        let block = Block::default()
            .borders(Borders::TOP)
            .title(Span::styled(heading, Style::default().fg(Color::Gray)));
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let hymns = self.visible_hymns();
        if hymns.is_empty() {
            let message = Paragraph::new(NO_RESULTS)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(message, inner);
            return;
        }

        self.render_hymn_cards(frame, inner, &hymns, self.results.selection.selected);
    }

    fn render_hymn_cards(&self, frame: &mut Frame, area: Rect, hymns: &[&Hymn], selected: usize) {
        if hymns.is_empty() || area.height == 0 {
            return;
        }

        let cards: Vec<Vec<Line<'static>>> = hymns
            .iter()
            .enumerate()
            .map(|(index, hymn)| {
                hymn_card_lines(hymn, index == selected, self.favorites.contains(hymn.id))
            })
            .collect();

        // Scroll so the selected card is fully visible.
        let height = area.height as usize;
        let mut start = 0;
        let mut used: usize = cards[..=min(selected, cards.len() - 1)]
            .iter()
            .map(|card| card.len() + 1)
            .sum();
        while used > height && start < selected {
            used -= cards[start].len() + 1;
            start += 1;
        }

        let mut lines = Vec::new();
        for (index, card) in cards.into_iter().enumerate().skip(start) {
            let style = if index == selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            lines.extend(card.into_iter().map(|line| line.patch_style(style)));
            lines.push(Line::from(""));
            if lines.len() >= height {
                break;
            }
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_categories(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .categories
            .categories
            .iter()
            .map(|category| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        category.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {} টি গান", to_bengali_number(category.count)),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::TOP).title("বিষয়সমূহ"))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.categories.selection.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_info(&self, frame: &mut Frame, area: Rect) {
        let heading = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(Color::Gray);
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(APP_TITLE, heading)),
            Line::from(Span::styled("বাংলা খ্রীষ্টিয় সংগীত সংকলন", dim)),
            Line::from(""),
            Line::from(Span::styled("উৎসর্গ", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(Span::styled(
                "স্বর্গীয় বিভু রঞ্জন সরকার",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "জন্ম : ১লা আগস্ট ১৯২৮ · নিদ্রিত : ৩০শে ডিসেম্বর ১৯৮৫",
                dim,
            )),
            Line::from(""),
            Line::from(
                "আমাদের পিতৃব্য স্বর্গীয় বিভু রঞ্জন সরকার মহাশয়ের স্মরণার্থে ‘জয়ধ্বনি’ পুস্তকটি উৎসর্গীকৃত।",
            ),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "{} টি গান · {} টি বিষয়",
                    to_bengali_number(self.catalog.len()),
                    to_bengali_number(self.categories.categories.len())
                ),
                dim,
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, centered_column(80, area));
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, detail: &DetailScreen) {
        let hymn = &detail.hymn;
        let favorite = self.favorites.contains(hymn.id);

        let reflection_height = match &detail.reflection {
            ReflectionState::Idle => 0,
            ReflectionState::Loading(_) => 3,
            ReflectionState::Ready(_) => (area.height / 3).max(6),
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(reflection_height),
            ])
            .split(area);

        let mut title_line = vec![
            Span::styled(
                format!("{}  ", hymn.number()),
                Style::default()
                    .fg(if favorite { FAVORITE } else { ACCENT })
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        title_line.extend(title_spans(hymn, Style::default().add_modifier(Modifier::BOLD)));
        if favorite {
            title_line.push(Span::styled("  ♥", Style::default().fg(FAVORITE)));
        }

        let mut header = vec![Line::from(title_line)];
        if let Some(composer) = hymn.composer() {
            header.push(Line::from(Span::styled(
                composer.to_string(),
                Style::default().fg(Color::Gray),
            )));
        }
        header.push(Line::from(Span::styled(
            format!("# {}", hymn.category),
            Style::default().fg(Color::Gray),
        )));
        let header = Paragraph::new(header)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, chunks[0]);

        let mut lines = Vec::new();
        for stanza in &detail.stanzas {
            lines.push(Line::from(""));
            if let Some(marker) = &stanza.marker {
                let style = if stanza.chorus {
                    Style::default()
                        .fg(FAVORITE)
                        .add_modifier(Modifier::ITALIC | Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)
                };
                lines.push(Line::from(Span::styled(marker.clone(), style)));
            }
            let body_style = if stanza.chorus {
                Style::default().add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };
            for text in stanza.content.lines() {
                lines.push(Line::from(Span::styled(text.to_string(), body_style)));
            }
        }

        let lyrics = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .scroll((detail.scroll, 0));
        frame.render_widget(lyrics, centered_column(self.lyrics_width, chunks[1]));

        if reflection_height > 0 {
            self.draw_reflection(frame, chunks[2], &detail.reflection);
        }
    }

    fn draw_reflection(&self, frame: &mut Frame, area: Rect, state: &ReflectionState) {
        let popup_area = centered_rect(90, 100, area);
        frame.render_widget(Clear, popup_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title("আত্মিক ধ্যান");

        let lines = match state {
            ReflectionState::Ready(reflection) => vec![
                Line::from(reflection.reflection.clone()),
                Line::from(""),
                Line::from(Span::styled(
                    reflection.bible_verse.clone(),
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
            ],
            _ => vec![Line::from(Span::styled(
                REFLECTION_LOADING,
                Style::default().fg(Color::Gray),
            ))],
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (Screen::Detail(_), _) => &[
                ("[↑↓]", " Scroll   "),
                ("[f]", " Favorite   "),
                ("[r]", " Reflection   "),
                ("[+/-]", " Width   "),
                ("[Esc]", " Back   "),
                ("[q]", " Quit"),
            ],
            (_, Mode::Searching) => &[
                ("[type]", " Search   "),
                ("[↑↓]", " Select   "),
                ("[Enter]", " Open   "),
                ("[Tab]", " Done   "),
                ("[Esc]", " Clear"),
            ],
            _ if self.tab == Tab::Info => &[
                ("[←→]", " Tabs   "),
                ("[1-4]", " Jump   "),
                ("[q]", " Quit"),
            ],
            _ if self.showing_category_list() => &[
                ("[↑↓]", " Select   "),
                ("[Enter]", " Open   "),
                ("[/]", " Search   "),
                ("[←→]", " Tabs   "),
                ("[q]", " Quit"),
            ],
            _ => &[
                ("[↑↓]", " Select   "),
                ("[Enter]", " Open   "),
                ("[/]", " Search   "),
                ("[f]", " Favorite   "),
                ("[←→]", " Tabs   "),
                ("[Esc]", " Back   "),
                ("[q]", " Quit"),
            ],
        };

        Line::from(
            hints
                .iter()
                .flat_map(|(key, label)| {
                    [Span::styled(*key, key_style), Span::raw(*label)]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::models::Reflection;

    struct FixedReflection;

    impl ReflectionSource for FixedReflection {
        fn reflect(&self, title: &str, _lyrics: &str) -> Reflection {
            Reflection {
                reflection: format!("about {title}"),
                bible_verse: "v".into(),
            }
        }
    }

    fn app() -> App {
        let catalog = Catalog::from_json(
            r#"[
                {"id": 1, "title": "প্রভু যীশু", "category": "আরাধনা", "lyrics": "a\n\nb"},
                {"id": 2, "title": "গান গাও", "category": "প্রার্থনা", "lyrics": "x", "transliteration": "Gan Gao"},
                {"id": 12, "title": "আনন্দ", "category": "আরাধনা", "lyrics": "y"}
            ]"#,
        )
        .unwrap();
        let favorites = FavoritesStore::load(open_in_memory().unwrap());
        App::new(catalog, favorites, Arc::new(FixedReflection))
    }

    fn ids(app: &App) -> Vec<u32> {
        app.visible_hymns().iter().map(|hymn| hymn.id).collect()
    }

    fn type_query(app: &mut App, text: &str) {
        app.handle_key(KeyCode::Char('/')).unwrap();
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    #[test]
    fn typing_filters_the_list() {
        let mut app = app();
        assert_eq!(ids(&app), vec![1, 2, 12]);
        type_query(&mut app, "1");
        assert_eq!(ids(&app), vec![1, 12]);
        app.handle_key(KeyCode::Backspace).unwrap();
        for ch in "gan".chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
        assert_eq!(ids(&app), vec![2]);
        app.handle_key(KeyCode::Esc).unwrap();
        assert_eq!(ids(&app), vec![1, 2, 12]);
    }

    #[test]
    fn favorites_tab_lists_toggled_hymns() {
        let mut app = app();
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Char('f')).unwrap();
        app.handle_key(KeyCode::Char('3')).unwrap();
        assert_eq!(ids(&app), vec![2]);
        app.handle_key(KeyCode::Char('f')).unwrap();
        assert!(ids(&app).is_empty());
    }

    #[test]
    fn category_drill_down_and_back() {
        let mut app = app();
        app.handle_key(KeyCode::Char('2')).unwrap();
        assert!(app.showing_category_list());
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(ids(&app), vec![1, 12]);
        app.handle_key(KeyCode::Esc).unwrap();
        assert!(app.showing_category_list());
    }

    #[test]
    fn reflection_arrives_through_tick() {
        let mut app = app();
        app.handle_key(KeyCode::Enter).unwrap();
        app.handle_key(KeyCode::Char('r')).unwrap();

        let mut delivered = false;
        for _ in 0..200 {
            app.tick();
            if let Screen::Detail(detail) = &app.screen {
                if let ReflectionState::Ready(reflection) = &detail.reflection {
                    assert_eq!(reflection.reflection, "about প্রভু যীশু");
                    delivered = true;
                    break;
                }
            }
            thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(delivered);

        assert!(!app.handle_key(KeyCode::Esc).unwrap());
        assert!(matches!(app.screen, Screen::Browse));
    }

    #[test]
    fn lyrics_width_is_clamped_and_saved() {
        let mut app = app();
        app.handle_key(KeyCode::Enter).unwrap();
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('+')).unwrap();
        }
        assert_eq!(app.lyrics_width, 100);
        assert_eq!(load_lyrics_width(app.favorites.connection()), 100);
    }

    #[test]
    fn q_exits() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
