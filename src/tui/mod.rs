//! TUI module - Terminal heat-map dashboard with ratatui

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use std::io::{Stdout, stdout};

use crate::body::{Body, HeatMapOptions, PartRef};
use crate::db::{Database, WorkoutLog};
use crate::heatmap::{self, IntensityCalculator, Rgb, heat_color, scene::format_value, shapes};
use crate::ml::{BalanceAnalyzer, Threshold, TimeFrame};
use crate::tags::TagMap;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// One table line: part, raw value, intensity and its color
#[derive(Debug, Clone, PartialEq)]
pub struct PartLine {
    pub part: PartRef,
    pub value: f64,
    pub intensity: f64,
    pub color: Rgb,
}

/// Visible parts of the current view, in drawing order
pub fn part_lines(body: &Body) -> Vec<PartLine> {
    let calc = IntensityCalculator::new(body.options().effective_max());
    shapes::visible_parts(body.view())
        .into_iter()
        .map(|part| {
            let value = body.value(part);
            let intensity = calc.normalize(value);
            PartLine { part, value, intensity, color: heat_color(intensity) }
        })
        .collect()
}

/// App state for TUI
pub struct App {
    db: Database,
    logs: Vec<WorkoutLog>,
    tags: TagMap,
    options: HeatMapOptions,
    timeframe: TimeFrame,
    analyzer: BalanceAnalyzer,
    body: Body,
    should_quit: bool,
}

impl App {
    pub fn new(db: Database, options: HeatMapOptions, timeframe: TimeFrame, threshold: Threshold) -> Result<Self> {
        let mut app = Self {
            db,
            logs: Vec::new(),
            tags: TagMap::new(),
            options,
            timeframe,
            analyzer: BalanceAnalyzer::new(threshold),
            body: Body::new(options),
            should_quit: false,
        };
        app.reload()?;
        Ok(app)
    }

    /// Re-read logs and tags, then rebuild the body
    pub fn reload(&mut self) -> Result<()> {
        self.logs = self.db.get_logs()?;
        self.tags = self.db.load_tag_map()?;
        self.rebuild();
        Ok(())
    }

    fn rebuild(&mut self) {
        let range = self.timeframe.range(Utc::now().date_naive());
        self.body = heatmap::build_body(&self.logs, &self.tags, range, self.options);
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn timeframe(&self) -> TimeFrame {
        self.timeframe
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        with_restore(|| self.event_loop(&mut terminal), restore_terminal)
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(3)])
            .split(area);

        let header = Paragraph::new(format!(
            "musclemap - {} view, last {}, max {}",
            self.body.view(),
            self.timeframe,
            format_value(self.options.effective_max()),
        ))
        .style(Style::default().fg(Color::Cyan).bold())
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        let rows: Vec<Row> = part_lines(&self.body)
            .into_iter()
            .map(|line| {
                let Rgb { r, g, b } = line.color;
                Row::new(vec![
                    Cell::from(line.part.name()),
                    Cell::from(format_value(line.value)),
                    Cell::from(format!("{:>3.0}%", line.intensity * 100.0)),
                    Cell::from("      ").style(Style::default().bg(Color::Rgb(r, g, b))),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Min(16), Constraint::Length(10), Constraint::Length(6), Constraint::Length(8)],
        )
        .header(Row::new(vec!["Muscle", "Volume", "Load", "Heat"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Heat map"));
        frame.render_widget(table, columns[0]);

        let report = self.analyzer.analyze(&self.body);
        let balance = Paragraph::new(report.to_string())
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Balance"));
        frame.render_widget(balance, columns[1]);

        let footer = Paragraph::new("q: quit | v: front/back | t: timeframe | r: reload")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    /// Apply one key press
    pub fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('v') => {
                self.options.view = self.options.view.toggled();
                self.body.set_view(self.options.view);
            }
            KeyCode::Char('t') => {
                self.timeframe = self.timeframe.next();
                self.rebuild();
            }
            KeyCode::Char('r') => self.reload()?,
            _ => {}
        }
        Ok(())
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key.code)?;
        }
        Ok(())
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Runs `body`, then `restore` even if `body` failed. The body's error wins.
fn with_restore<T>(body: impl FnOnce() -> Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::View;

    fn create_app() -> App {
        let db = Database::open(":memory:").unwrap();
        db.add_log(&WorkoutLog {
            id: None,
            date: Utc::now(),
            exercise: "Lat pulldown".to_string(),
            tags: vec!["back".to_string()],
            reps: Some(10),
            weight: Some(50.0),
            volume: 0.0,
            notes: None,
        })
        .unwrap();
        App::new(db, HeatMapOptions::default(), TimeFrame::Month, Threshold::default()).unwrap()
    }

    #[test]
    fn test_part_lines_follow_view() {
        let app = create_app();
        let lats = PartRef::parse("back.lats").unwrap();
        assert!(part_lines(app.body()).iter().all(|l| l.part != lats));

        let mut body = app.body().clone();
        body.set_view(View::Back);
        let line = part_lines(&body).into_iter().find(|l| l.part == lats).unwrap();
        assert_eq!(line.value, 500.0);
        assert_eq!(line.intensity, 0.5);
        assert_eq!(line.color, heat_color(0.5));
    }

    #[test]
    fn test_keys() {
        let mut app = create_app();
        app.handle_key(KeyCode::Char('v')).unwrap();
        assert_eq!(app.body().view(), View::Back);

        app.handle_key(KeyCode::Char('t')).unwrap();
        assert_eq!(app.timeframe(), TimeFrame::Year);
        // view survives a rebuild
        assert_eq!(app.body().view(), View::Back);

        app.handle_key(KeyCode::Char('r')).unwrap();
        assert_eq!(app.body().value(PartRef::parse("back.lats").unwrap()), 500.0);

        app.handle_key(KeyCode::Char('q')).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_restore_runs_after_failure() {
        let mut restored = false;
        let result: Result<()> = with_restore(
            || anyhow::bail!("reload failed"),
            || {
                restored = true;
                Ok(())
            },
        );
        assert!(restored);
        assert_eq!(result.unwrap_err().to_string(), "reload failed");

        let mut calls = 0;
        let value = with_restore(
            || Ok(7),
            || {
                calls += 1;
                Ok(())
            },
        )
        .unwrap();
        assert_eq!((value, calls), (7, 1));
    }
}
