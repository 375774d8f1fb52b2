//! Ratatui-based terminal dashboard.
//!
//! Tabs mirror the web dashboard: an overview plus one screen per segmentation.
//! Data is fetched on a background thread; every fetch carries a ticket so a
//! slow earlier request can never overwrite a newer one.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
};
use tracing::debug;

use crate::app::pipeline::{overview_screen, segment_screen};
use crate::data::{DatasetLoader, LoadState, LoadTicket};
use crate::domain::{DashboardConfig, Dataset, SegmentAxis, Series};
use crate::error::AppError;
use crate::report::{format_currency, format_percentage, truncate};
use crate::view::{DrillDown, drill_down, drill_series};

mod plotters_chart;

use plotters_chart::{TrendChart, chart_lines, legend_color};

type FetchResult = (LoadTicket, Result<Dataset, AppError>);

/// Start the TUI. `notice` stays in the status line for the whole session.
pub fn run(config: DashboardConfig, notice: Option<String>) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::fetch(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.notice = notice;
    app.start_fetch();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::fetch(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::fetch(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which screen a tab shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Overview,
    Segment(SegmentAxis),
}

const SCREENS: [Screen; 6] = [
    Screen::Overview,
    Screen::Segment(SegmentAxis::EndUser),
    Screen::Segment(SegmentAxis::Aircraft),
    Screen::Segment(SegmentAxis::Region),
    Screen::Segment(SegmentAxis::Application),
    Screen::Segment(SegmentAxis::Equipment),
];

/// An open drill-down panel, by name; the view is rebuilt on each draw.
#[derive(Debug, Clone, PartialEq)]
struct DrillState {
    /// `None` drills into the total market.
    axis: Option<SegmentAxis>,
    name: String,
    related_selected: usize,
    /// Second level: a related series opened from the first panel.
    opened: Option<String>,
}

struct App {
    config: DashboardConfig,
    loader: DatasetLoader,
    tx: Sender<FetchResult>,
    rx: Receiver<FetchResult>,
    tab: usize,
    selected: usize,
    stacked_index: usize,
    drill: Option<DrillState>,
    status: String,
    /// Startup problem (e.g. no log file) kept beside every status message.
    notice: Option<String>,
}

impl App {
    fn new(config: DashboardConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            config,
            loader: DatasetLoader::new(),
            tx,
            rx,
            tab: 0,
            selected: 0,
            stacked_index: 0,
            drill: None,
            status: String::new(),
            notice: None,
        }
    }

    fn status_line(&self) -> String {
        match &self.notice {
            Some(notice) if self.status.is_empty() => notice.clone(),
            Some(notice) => format!("{} | {notice}", self.status),
            None => self.status.clone(),
        }
    }

    fn start_fetch(&mut self) {
        let ticket = self.loader.begin();
        let tx = self.tx.clone();
        let source = self.config.source.clone();
        self.status = format!("Fetching {}...", source.describe());
        debug!(?ticket, source = %source.describe(), "spawning fetch");

        thread::spawn(move || {
            let outcome = crate::data::load_dataset(&source);
            // The receiver is gone only when the TUI has exited.
            let _ = tx.send((ticket, outcome));
        });
    }

    /// Drain finished fetches. Returns whether anything was applied.
    fn poll_fetches(&mut self) -> bool {
        let mut changed = false;
        while let Ok((ticket, outcome)) = self.rx.try_recv() {
            changed |= self.accept(ticket, outcome);
        }
        changed
    }

    fn accept(&mut self, ticket: LoadTicket, outcome: Result<Dataset, AppError>) -> bool {
        if !self.loader.finish(ticket, outcome) {
            return false;
        }
        self.status = match self.loader.state() {
            LoadState::Ready(ds) => {
                self.selected = 0;
                self.drill = None;
                format!("Loaded {} years from {}", ds.years.len(), self.config.source.describe())
            }
            LoadState::Failed(message) => format!("Error loading data: {message} (r to retry)"),
            LoadState::Pending => String::new(),
        };
        true
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_fetches() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::fetch(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::fetch(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::fetch(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.drill.is_some() {
            return self.handle_drill_key(code);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Right => self.switch_tab(1),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(-1),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.category_count() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('[') => self.step_year(-1),
            KeyCode::Char(']') => self.step_year(1),
            KeyCode::Char('s') => {
                self.stacked_index = self.stacked_index.wrapping_add(1);
            }
            KeyCode::Char('r') => self.start_fetch(),
            KeyCode::Enter => self.open_drill(),
            _ => {}
        }
        false
    }

    fn handle_drill_key(&mut self, code: KeyCode) -> bool {
        let related_len = self.drill_related_len();
        let Some(drill) = self.drill.as_mut() else {
            return false;
        };

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Backspace => {
                if drill.opened.take().is_none() {
                    self.drill = None;
                }
            }
            KeyCode::Up => drill.related_selected = drill.related_selected.saturating_sub(1),
            KeyCode::Down => {
                if drill.related_selected + 1 < related_len {
                    drill.related_selected += 1;
                }
            }
            KeyCode::Enter => {
                if drill.opened.is_none() {
                    if let Some(ds) = self.loader.dataset() {
                        drill.opened = related_name(&ds, drill, &self.config);
                    }
                }
            }
            _ => {}
        }
        false
    }

    fn screen(&self) -> Screen {
        SCREENS[self.tab % SCREENS.len()]
    }

    fn switch_tab(&mut self, delta: isize) {
        let n = SCREENS.len() as isize;
        self.tab = (self.tab as isize + delta).rem_euclid(n) as usize;
        self.selected = 0;
        self.stacked_index = 0;
    }

    fn category_count(&self) -> usize {
        let Some(ds) = self.loader.dataset() else {
            return 0;
        };
        match self.screen() {
            Screen::Overview => 1,
            Screen::Segment(axis) => ds.segments(axis).len(),
        }
    }

    /// Move the selected year through the dataset's years.
    fn step_year(&mut self, delta: isize) {
        let Some(ds) = self.loader.dataset() else {
            return;
        };
        if let Some(year) = stepped_year(&ds.years, self.config.selected_year, delta) {
            self.config.selected_year = year;
            self.status = format!("year: {year}");
        }
    }

    fn open_drill(&mut self) {
        let Some(ds) = self.loader.dataset() else {
            return;
        };
        let (axis, name) = match self.screen() {
            Screen::Overview => (None, ds.total_market.name.clone()),
            Screen::Segment(axis) => match ds.segments(axis).as_slice().get(self.selected) {
                Some(series) => (Some(axis), series.name.clone()),
                None => return,
            },
        };
        self.drill = Some(DrillState {
            axis,
            name,
            related_selected: 0,
            opened: None,
        });
    }

    fn drill_related_len(&self) -> usize {
        let (Some(ds), Some(state)) = (self.loader.dataset(), self.drill.as_ref()) else {
            return 0;
        };
        build_drill(&ds, state, &self.config)
            .and_then(|d| d.related.map(|r| r.series.len()))
            .unwrap_or(0)
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        if let Some(state) = &self.drill {
            if let Some(ds) = self.loader.dataset() {
                if let Some(drill) = build_drill(&ds, state, &self.config) {
                    draw_drill(frame, size, &drill, state, &self.config);
                }
            }
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let loaded = self
            .loader
            .loaded_at()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let line = Line::from(vec![
            Span::styled("mkt", Style::default().fg(Color::Cyan)),
            Span::raw(" - Market Dashboard"),
            Span::styled(
                format!(
                    " | year: {} | source: {} | loaded: {loaded}",
                    self.config.selected_year,
                    self.config.source.describe()
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = SCREENS
            .iter()
            .map(|s| match s {
                Screen::Overview => Line::from("Overview"),
                Screen::Segment(axis) => Line::from(axis.tab_label()),
            })
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab % SCREENS.len())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let ds = match self.loader.state() {
            LoadState::Pending => {
                let msg = Paragraph::new("Loading market data...")
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
            LoadState::Failed(message) => {
                let text = Text::from(vec![
                    Line::from(Span::styled(
                        "Error loading market data",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(message.as_str()),
                    Line::from(""),
                    Line::from("Press r to retry."),
                ]);
                frame.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL)), area);
                return;
            }
            LoadState::Ready(ds) => ds,
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        match self.screen() {
            Screen::Overview => {
                self.draw_chart(frame, columns[0], "Total Market Trend", &[&ds.total_market]);
                self.draw_overview_side(frame, columns[1], ds);
            }
            Screen::Segment(axis) => {
                let series: Vec<&Series> = ds.segments(axis).iter().collect();
                self.draw_chart(frame, columns[0], axis.title(), &series);
                self.draw_segment_side(frame, columns[1], ds, axis);
            }
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, series: &[&Series]) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (lines, x_bounds, y_bounds) = chart_lines(series);
        let widget = TrendChart {
            lines: &lines,
            marker_x: Some(self.config.selected_year as f64),
            x_bounds,
            y_bounds,
            x_label: "year",
            y_label: "US$M",
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_value,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_overview_side(&self, frame: &mut ratatui::Frame<'_>, area: Rect, ds: &Dataset) {
        let screen = overview_screen(ds, &self.config);

        let mut lines = kpi_lines(
            screen.kpis.selected_year,
            screen.kpis.market_size,
            screen.kpis.cagr,
            screen.kpis.forecast_value,
            &self.config,
        );
        for (axis, slices) in &screen.distributions {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                axis.title(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for slice in slices {
                lines.push(Line::from(format!(
                    "  {:<20} {:>9} {:>5.1}%",
                    truncate(&slice.name, 20),
                    format_currency(slice.value),
                    slice.share
                )));
            }
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Overview").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_segment_side(&self, frame: &mut ratatui::Frame<'_>, area: Rect, ds: &Dataset, axis: SegmentAxis) {
        let screen = segment_screen(ds, axis, &self.config);

        let has_stacked = !screen.stacked.is_empty();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(if has_stacked {
                vec![Constraint::Length(5), Constraint::Min(4), Constraint::Min(6)]
            } else {
                vec![Constraint::Length(5), Constraint::Min(0)]
            })
            .split(area);

        let kpis = kpi_lines(
            screen.kpis.selected_year,
            screen.kpis.market_size,
            screen.kpis.cagr,
            screen.kpis.forecast_value,
            &self.config,
        );
        frame.render_widget(
            Paragraph::new(Text::from(kpis)).block(Block::default().title("KPIs").borders(Borders::ALL)),
            rows[0],
        );

        let items: Vec<ListItem> = screen
            .growth
            .iter()
            .zip(&screen.distribution)
            .enumerate()
            .map(|(i, (g, d))| {
                ListItem::new(Line::from(vec![
                    Span::styled("■ ", Style::default().fg(legend_color(i))),
                    Span::raw(format!(
                        "{:<18} {:>9} {:>5.1}% cagr {:>5.1}%",
                        truncate(&g.name, 18),
                        format_currency(d.value),
                        d.share,
                        g.cagr
                    )),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().title(format!("{} ({})", screen.view.title, self.config.selected_year)).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, rows[1], &mut state);

        if has_stacked {
            let sv = &screen.stacked[self.stacked_index % screen.stacked.len()];
            let b = &sv.breakdown;
            let mut lines = Vec::new();
            for bar in &b.bars {
                lines.push(Line::from(Span::styled(
                    format!("{} {}", bar.primary_name, format_currency(bar.total)),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                for sub in &bar.sub_segments {
                    lines.push(Line::from(format!(
                        "  {:<20} {:>9}",
                        truncate(&sub.name, 20),
                        format_currency(sub.value_at_year)
                    )));
                }
            }
            let title = format!("{} [{}]", sv.title, b.basis.label());
            frame.render_widget(
                Paragraph::new(Text::from(lines)).block(Block::default().title(title).borders(Borders::ALL)),
                rows[2],
            );
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = if self.drill.is_some() {
            "↑/↓ select  Enter open  Esc back  q quit"
        } else {
            "←/→ tab  ↑/↓ select  Enter drill  [/] year  s stack  r reload  q quit"
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.status_line(), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn build_drill<'a>(ds: &'a Dataset, state: &DrillState, config: &DashboardConfig) -> Option<DrillDown<'a>> {
    let first = match state.axis {
        Some(axis) => drill_down(ds, axis, &state.name, config)?,
        None => drill_series(&ds.total_market, config),
    };
    match &state.opened {
        Some(name) => first.open_related(name, config),
        None => Some(first),
    }
}

fn related_name(ds: &Dataset, state: &DrillState, config: &DashboardConfig) -> Option<String> {
    let drill = build_drill(ds, state, config)?;
    let related = drill.related?;
    related.series.get(state.related_selected).map(|s| s.name.clone())
}

fn stepped_year(years: &[i32], current: i32, delta: isize) -> Option<i32> {
    if years.is_empty() {
        return None;
    }
    let idx = years
        .iter()
        .position(|&y| y == current)
        .unwrap_or_else(|| years.iter().position(|&y| y > current).unwrap_or(years.len() - 1));
    let next = (idx as isize + delta).clamp(0, years.len() as isize - 1) as usize;
    Some(years[next])
}

fn kpi_lines(year: i32, size: f64, cagr: f64, forecast: f64, config: &DashboardConfig) -> Vec<Line<'static>> {
    vec![
        Line::from(format!("{year} Market Size: {}", format_currency(size))),
        Line::from(format!("{}-Year CAGR: {cagr:.1}%", config.growth_span())),
        Line::from(format!("{} Forecast: {}", config.forecast_year, format_currency(forecast))),
    ]
}

fn draw_drill(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    drill: &DrillDown<'_>,
    state: &DrillState,
    config: &DashboardConfig,
) {
    let rect = centered_rect(80, 80, area);
    frame.render_widget(Clear, rect);
    let block = Block::default()
        .title(format!("{} - Deep Dive", drill.name))
        .borders(Borders::ALL);
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(8), Constraint::Length(10)])
        .split(inner);

    let summary = format!(
        "{} Value: ${:.2}B | {} Forecast: ${:.2}B | {}Y CAGR: {:.1}% | YoY Growth: {}",
        config.base_year,
        drill.base_value / 1000.0,
        config.forecast_year,
        drill.forecast_value / 1000.0,
        config.growth_span(),
        drill.cagr,
        format_percentage(drill.yoy_growth),
    );
    frame.render_widget(Paragraph::new(summary).style(Style::default().fg(Color::Cyan)), rows[0]);

    let (lines, x_bounds, y_bounds) = chart_lines(&[&drill.series]);
    frame.render_widget(
        TrendChart {
            lines: &lines,
            marker_x: Some(config.base_year as f64),
            x_bounds,
            y_bounds,
            x_label: "year",
            y_label: "US$M",
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_value,
        },
        rows[1],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    let yoy: Vec<Line> = drill
        .rows
        .iter()
        .rev()
        .map(|r| {
            Line::from(format!(
                "{}  {:>12}  {:>8}",
                r.year,
                format!("${:.1}M", r.value),
                r.change.map(format_percentage).unwrap_or_else(|| "-".to_string())
            ))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Text::from(yoy)).block(Block::default().title("Year-over-Year").borders(Borders::ALL)),
        bottom[0],
    );

    match &drill.related {
        Some(related) if state.opened.is_none() => {
            let items: Vec<ListItem> = drill
                .related_bars(config)
                .into_iter()
                .map(|(name, value)| ListItem::new(format!("{:<22} {:>9}", truncate(&name, 22), format_currency(value))))
                .collect();
            let list = List::new(items)
                .block(Block::default().title(related.title.clone()).borders(Borders::ALL))
                .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
                .highlight_symbol("» ");
            let mut list_state = ListState::default();
            list_state.select(Some(state.related_selected));
            frame.render_stateful_widget(list, bottom[1], &mut list_state);
        }
        _ => {
            frame.render_widget(
                Paragraph::new("No further breakdown.").block(Block::default().borders(Borders::ALL)),
                bottom[1],
            );
        }
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_value(v: f64) -> String {
    format_currency(v)
}
