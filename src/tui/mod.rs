//! Ratatui-based terminal UI.
//!
//! The TUI is the interactive calculator: a points editor, the model list, a
//! chart of points + fitted curve, and a pane with every intermediate matrix.
//! Any edit or model change reruns the whole fit pipeline.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::{RunOutput, run_fit_with_points};
use crate::cli::TuiArgs;
use crate::error::AppError;
use crate::fit::unknown_model;
use crate::io::parse_points;
use crate::models::{Model, all, position};
use crate::plot::axis_range;
use crate::report::{format_matrices, format_r_squared};

mod plotters_chart;

use plotters_chart::TrendPlottersChart;

const CURVE_SAMPLES: usize = 200;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let model_index = position(&args.model).ok_or_else(|| unknown_model(&args.model))?;
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            AppError::usage(format!("Failed to read points file '{}': {e}", path.display()))
        })?,
        None => String::new(),
    };
    let mut app = App::new(&text, model_index);

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Points,
    Models,
}

struct App {
    /// Editor contents, one entry per line (never empty).
    lines: Vec<String>,
    cursor: usize,
    model_index: usize,
    focus: Focus,
    matrices_scroll: u16,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(text: &str, model_index: usize) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let mut app = Self {
            cursor: lines.len() - 1,
            lines,
            model_index,
            focus: Focus::Points,
            matrices_scroll: 0,
            status: "Type points as `x, y`, one per line.".to_string(),
            run: None,
        };
        app.refit();
        app
    }

    fn model(&self) -> &'static Model {
        &all()[self.model_index]
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Points => Focus::Models,
                    Focus::Models => Focus::Points,
                };
            }
            KeyCode::PageDown => self.matrices_scroll = self.matrices_scroll.saturating_add(5),
            KeyCode::PageUp => self.matrices_scroll = self.matrices_scroll.saturating_sub(5),
            _ => match self.focus {
                Focus::Points => self.handle_editor_key(key.code),
                Focus::Models => return self.handle_model_key(key.code),
            },
        }
        false
    }

    fn handle_editor_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => self.cursor = (self.cursor + 1).min(self.lines.len() - 1),
            KeyCode::Enter => {
                self.cursor += 1;
                self.lines.insert(self.cursor, String::new());
            }
            KeyCode::Backspace => {
                if self.lines[self.cursor].pop().is_none() && self.cursor > 0 {
                    self.lines.remove(self.cursor);
                    self.cursor -= 1;
                }
                self.refit();
            }
            KeyCode::Char(c) => {
                self.lines[self.cursor].push(c);
                self.refit();
            }
            _ => {}
        }
    }

    fn handle_model_key(&mut self, code: KeyCode) -> bool {
        let last = all().len() - 1;
        let next = match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => self.model_index.saturating_sub(1),
            KeyCode::Down => (self.model_index + 1).min(last),
            KeyCode::Home => 0,
            KeyCode::End => last,
            _ => return false,
        };
        if next != self.model_index {
            self.model_index = next;
            self.refit();
        }
        false
    }

    /// Recompute everything from the editor text.
    fn refit(&mut self) {
        let points = parse_points(&self.lines.join("\n"));
        match run_fit_with_points(points, self.model().key) {
            Ok(run) => {
                self.status = format!(
                    "model: {} | n={} | invalid={}",
                    run.fit.model.key, run.stats.n_points, run.stats.n_invalid
                );
                self.run = Some(run);
            }
            Err(err) => {
                self.status = err.to_string();
                self.run = None;
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (equation, r2) = match &self.run {
            Some(run) => (
                run.fit
                    .equation()
                    .unwrap_or_else(|| "(no fit: enter at least one point)".to_string()),
                format_r_squared(run.fit.r_squared),
            ),
            None => ("-".to_string(), "-".to_string()),
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(equation, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(Span::styled(
                format!("R² = {r2} | {}", self.model().label),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("trend").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(26),
                Constraint::Min(30),
                Constraint::Length(44),
            ])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[0]);

        self.draw_editor(frame, left[0]);
        self.draw_models(frame, left[1]);
        self.draw_chart(frame, columns[1]);
        self.draw_matrices(frame, columns[2]);
    }

    fn draw_editor(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .lines
            .iter()
            .map(|line| ListItem::new(line.clone()))
            .collect();

        let list = List::new(items)
            .block(focus_block("Points (x, y)", self.focus == Focus::Points))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_models(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = all().iter().map(|m| ListItem::new(m.key)).collect();

        let list = List::new(items)
            .block(focus_block("Model", self.focus == Focus::Models))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.model_index));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Chart").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No data.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let series = chart_series(run);
        let widget = TrendPlottersChart {
            curve: &series.curve,
            points: &series.points,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_matrices(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = self
            .run
            .as_ref()
            .map(|run| format_matrices(&run.fit.stages))
            .unwrap_or_default();

        let p = Paragraph::new(text)
            .scroll((self.matrices_scroll, 0))
            .block(Block::default().title("Matrices (PgUp/PgDn)").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab switch pane  ↑/↓ move  Enter new line  Esc quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default().title(title).borders(Borders::ALL).border_style(style)
}

/// Data prepared for the Plotters chart.
struct ChartSeries {
    curve: Vec<Vec<(f64, f64)>>,
    points: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Bounds follow the ASCII plot (origin included, 10% headroom); the curve is
/// cut into segments wherever it is not finite or leaves the y bounds.
fn chart_series(run: &RunOutput) -> ChartSeries {
    let (x0, x1) = axis_range(run.points.iter().map(|p| p.x));
    let (y0, y1) = axis_range(run.points.iter().map(|p| p.y));

    let points = run
        .points
        .iter()
        .filter(|p| p.is_finite())
        .map(|p| (p.x, p.y))
        .collect();

    let mut curve = Vec::new();
    if let Some(trend) = run.fit.trend_fn() {
        let mut segment = Vec::new();
        for (x, y) in trend.sample(x0, x1, CURVE_SAMPLES) {
            if y.is_finite() && (y0..=y1).contains(&y) {
                segment.push((x, y));
            } else if !segment.is_empty() {
                curve.push(std::mem::take(&mut segment));
            }
        }
        if !segment.is_empty() {
            curve.push(segment);
        }
    }

    ChartSeries {
        curve,
        points,
        x_bounds: [x0, x1],
        y_bounds: [y0, y1],
    }
}
