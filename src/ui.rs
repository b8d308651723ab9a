use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use education_finder::record::FIELD_SEPARATOR;
use education_finder::{render, Card, Criteria, Rendered, Table, NO_RESULTS};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Country,
    Field,
    Search,
    Results,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::Country => Focus::Field,
            Focus::Field => Focus::Search,
            Focus::Search => Focus::Results,
            Focus::Results => Focus::Country,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Focus::Country => Focus::Results,
            Focus::Field => Focus::Country,
            Focus::Search => Focus::Field,
            Focus::Results => Focus::Search,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Focus::Country => "Country",
            Focus::Field => "Field",
            Focus::Search => "Search",
            Focus::Results => "Results",
        }
    }
}

pub struct App {
    pub table: Table,
    pub countries: Vec<String>,
    pub fields: Vec<String>,
    pub country_index: usize,
    pub field_index: usize,
    pub search: String,
    pub rendered: Rendered,
    pub state: ListState,
    pub focus: Focus,
    pub show_detail: bool,
}

impl App {
    pub fn new(table: Table) -> Self {
        let countries = table.country_options();
        let fields = table.field_options();

        let mut app = Self {
            table,
            countries,
            fields,
            country_index: 0,
            field_index: 0,
            search: String::new(),
            rendered: Rendered::NoResults,
            state: ListState::default(),
            focus: Focus::Country,
            show_detail: false,
        };
        app.refresh();
        app
    }

    pub fn criteria(&self) -> Criteria {
        Criteria::new()
            .with_country(self.countries[self.country_index].clone())
            .with_field(self.fields[self.field_index].clone())
            .with_search(self.search.clone())
    }

    /// Re-run the filter for the current criteria and reset the selection.
    pub fn refresh(&mut self) {
        self.rendered = render(&self.table, &self.criteria());

        if self.rendered.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.state
            .selected()
            .and_then(|i| self.rendered.cards().get(i))
    }

    /// Step the focused dropdown by `delta`, wrapping around.
    pub fn cycle_option(&mut self, delta: isize) {
        let (index, len) = match self.focus {
            Focus::Country => (&mut self.country_index, self.countries.len()),
            Focus::Field => (&mut self.field_index, self.fields.len()),
            Focus::Search | Focus::Results => return,
        };

        *index = (*index as isize + delta).rem_euclid(len as isize) as usize;
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.country_index = 0;
        self.field_index = 0;
        self.search.clear();
        self.refresh();
    }

    /// Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return true;
        }

        if self.focus == Focus::Search {
            match key.code {
                KeyCode::Char(c) => {
                    self.search.push(c);
                    self.refresh();
                    return false;
                }
                KeyCode::Backspace => {
                    self.search.pop();
                    self.refresh();
                    return false;
                }
                KeyCode::Enter => {
                    self.focus = Focus::Results;
                    return false;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.focus = self.focus.previous()
            }
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Char('c') => self.clear_filter(),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_option(-1),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_option(1),
            KeyCode::Enter => self.toggle_detail(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => self.first(),
            KeyCode::End => self.last(),
            _ => {}
        }

        false
    }

    pub fn next(&mut self) {
        let len = self.rendered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.rendered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.rendered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + PAGE_SIZE).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.rendered.is_empty() {
            return;
        }
        let i = self
            .state
            .selected()
            .map(|i| i.saturating_sub(PAGE_SIZE))
            .unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.rendered.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        let len = self.rendered.len();
        if len > 0 {
            self.state.select(Some(len - 1));
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Filters
            Constraint::Min(0),    // Results
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_filters(f, chunks[1], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);

        render_results(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_results(f, chunks[2], app);
    }

    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            "🎓 Education Finder",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Total: {}", app.table.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Showing: {}", app.rendered.len()),
            Style::default().fg(Color::Cyan),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_filters(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(area);

    let country = format!("◀ {} ▶", app.countries[app.country_index]);
    let field = format!("◀ {} ▶", app.fields[app.field_index]);
    let search = if app.focus == Focus::Search {
        format!("{}█", app.search)
    } else {
        app.search.clone()
    };

    for (i, (focus, text)) in [
        (Focus::Country, country),
        (Focus::Field, field),
        (Focus::Search, search),
    ]
    .into_iter()
    .enumerate()
    {
        let border = if focus == app.focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let widget = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {} ", focus.title())),
        );

        f.render_widget(widget, chunks[i]);
    }
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    let border = if app.focus == Focus::Results {
        Color::Yellow
    } else {
        Color::White
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" 📚 Available Universities ");

    if app.rendered.is_empty() {
        let notice = Paragraph::new(NO_RESULTS)
            .style(Style::default().fg(Color::Yellow))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(notice, area);
        return;
    }

    let width = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = app
        .rendered
        .cards()
        .iter()
        .map(|card| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    truncate(&card.name, width),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::styled("  📍 ", Style::default().fg(Color::Cyan)),
                    Span::raw(truncate(&card.location, width)),
                ]),
                Line::from(vec![
                    Span::styled("  📘 ", Style::default().fg(Color::Cyan)),
                    Span::styled(
                        truncate(&card.fields, width),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, app.rendered.len()),
        Style::default().fg(Color::Cyan),
    )];

    if !app.criteria().is_unconstrained() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled("Filtered", Style::default().fg(Color::Green)));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    for (key, label) in [
        ("Tab", " Focus | "),
        ("←/→", " Option | "),
        ("↑/↓", " Nav | "),
        ("Enter", " Details | "),
    ] {
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(label));
    }
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" University Details ");

    let card = match app.selected_card() {
        Some(card) => card,
        None => {
            f.render_widget(Paragraph::new("No university selected").block(block), area);
            return;
        }
    };

    let label = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut content = vec![
        Line::from(""),
        Line::from(vec![Span::styled("  Name: ", label), Span::raw(&card.name)]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Location: ", label),
            Span::raw(&card.location),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Website: ", label),
            Span::styled(&card.website, Style::default().fg(Color::Green)),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Fields:", label)),
    ];

    for tag in card.fields.split(FIELD_SEPARATOR).filter(|t| !t.is_empty()) {
        content.push(Line::from(format!("    • {}", tag)));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  Press Enter to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    let detail_panel = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(block);

    f.render_widget(detail_panel, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len || max_len < 4 {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
