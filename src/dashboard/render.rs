//! Screen rendering.
//!
//! [`compose`] turns the dashboard into styled lines without touching the
//! terminal; [`draw`] writes those lines with crossterm. Keeping the two
//! apart lets the layout be tested as plain strings.

use std::io::Write;

use chrono::{DateTime, Local};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use super::{Dashboard, CONFIRM_CLEAR_PROMPT};
use crate::shortcuts::{FocusTarget, HELP_SECTIONS};
use crate::timer::TickScheduler;
use crate::types::TimerStatus;

/// How a line is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Normal,
    Dim,
    Bright,
    Alert,
}

/// One screen row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub shade: Shade,
}

impl Line {
    fn new(text: impl Into<String>, shade: Shade) -> Self {
        Self {
            text: text.into(),
            shade,
        }
    }

    fn normal(text: impl Into<String>) -> Self {
        Self::new(text, Shade::Normal)
    }

    fn blank() -> Self {
        Self::normal("")
    }
}

/// Lays out the whole screen for a terminal `width` columns wide.
pub fn compose<S: TickScheduler>(dashboard: &Dashboard<S>, now: DateTime<Local>, width: u16) -> Vec<Line> {
    let width = usize::from(width.max(40));
    let mut lines = vec![
        Line::new(
            spread(
                "RETRODASH v1.0",
                &now.format("%a %Y-%m-%d %H:%M:%S").to_string(),
                width,
            ),
            Shade::Bright,
        ),
        Line::new("═".repeat(width), Shade::Dim),
    ];

    if dashboard.is_help_open() {
        help_lines(&mut lines);
    } else {
        todo_lines(dashboard, width, &mut lines);
        lines.push(Line::blank());
        timer_lines(dashboard, width, &mut lines);
        lines.push(Line::blank());
        weather_lines(dashboard, width, &mut lines);
    }

    lines.push(Line::blank());
    if dashboard.confirm_pending() {
        lines.push(Line::new(CONFIRM_CLEAR_PROMPT, Shade::Alert));
    } else {
        lines.push(Line::new(
            "[?] Help  [1/2/3] Focus  [S/P/R] Timer  [CTRL+K] Clear  [Q] Quit",
            Shade::Dim,
        ));
    }
    lines
}

/// Writes `lines` from the top-left corner, clearing whatever was there.
pub fn draw<W: Write>(out: &mut W, lines: &[Line]) -> std::io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    for (row, line) in lines.iter().enumerate() {
        let Ok(row) = u16::try_from(row) else {
            break;
        };
        queue!(out, MoveTo(0, row))?;
        match line.shade {
            Shade::Normal => queue!(out, SetForegroundColor(Color::Green))?,
            Shade::Dim => queue!(out, SetForegroundColor(Color::DarkGreen))?,
            Shade::Bright => queue!(
                out,
                SetForegroundColor(Color::Green),
                SetAttribute(Attribute::Bold)
            )?,
            Shade::Alert => queue!(
                out,
                SetForegroundColor(Color::Yellow),
                SetAttribute(Attribute::Bold)
            )?,
        }
        queue!(out, Print(&line.text), SetAttribute(Attribute::Reset), ResetColor)?;
    }

    out.flush()
}

// ============================================================================
// Panels
// ============================================================================

fn todo_lines<S: TickScheduler>(dashboard: &Dashboard<S>, width: usize, lines: &mut Vec<Line>) {
    let todos = dashboard.todos();
    lines.push(panel_title("[1] TODO LIST", &todos.status_label(), width));
    lines.push(input_line(
        dashboard.todo_input(),
        "Add new task...",
        dashboard.focus() == Some(FocusTarget::TodoInput),
    ));

    if todos.is_empty() {
        lines.push(Line::new("  No tasks yet. Press [1] to add one.", Shade::Dim));
        return;
    }

    let show_selection = !dashboard.focus().is_some_and(|f| f.is_text_input());
    for (index, todo) in todos.items().iter().enumerate() {
        let cursor = if show_selection && index == dashboard.selected() {
            '>'
        } else {
            ' '
        };
        let check = if todo.completed { 'x' } else { ' ' };
        let shade = if todo.completed { Shade::Dim } else { Shade::Normal };
        lines.push(Line::new(format!(" {cursor} [{check}] {}", todo.text), shade));
    }
}

fn timer_lines<S: TickScheduler>(dashboard: &Dashboard<S>, width: usize, lines: &mut Vec<Line>) {
    let engine = dashboard.engine();
    let state = engine.state();

    lines.push(panel_title("[2] POMODORO TIMER", state.status.as_str(), width));

    let clock_shade = match state.status {
        TimerStatus::Complete => Shade::Alert,
        TimerStatus::Running => Shade::Bright,
        _ => Shade::Normal,
    };
    lines.push(Line::new(format!("      {}", state.format_clock()), clock_shade));
    lines.push(Line::normal(format!("      {}", state.mode.label())));

    let start = if dashboard.focus() == Some(FocusTarget::TimerStart) {
        ">START [S]<"
    } else {
        " START [S] "
    };
    lines.push(Line::normal(format!("  {start} PAUSE [P]  RESET [R]")));
    lines.push(Line::new(
        format!(
            "  Sessions: {}   Mode: {}",
            state.session_count,
            engine.config().mode_summary()
        ),
        Shade::Dim,
    ));
}

fn weather_lines<S: TickScheduler>(dashboard: &Dashboard<S>, width: usize, lines: &mut Vec<Line>) {
    let weather = dashboard.weather();
    lines.push(panel_title("[3] WEATHER INFO", weather.status().as_str(), width));
    lines.push(input_line(
        dashboard.weather_input(),
        "Enter city name...",
        dashboard.focus() == Some(FocusTarget::WeatherInput),
    ));

    match weather.report() {
        _ if weather.is_loading() => {
            lines.push(Line::new("  Fetching weather data...", Shade::Dim));
        }
        Some(report) => {
            lines.push(Line::new(format!("  {}", report.city.to_uppercase()), Shade::Bright));
            lines.push(Line::normal(format!(
                "  {}°C  {}   Feels like {}°C",
                report.temp, report.condition, report.feels_like
            )));
            lines.push(Line::normal(format!(
                "  Humidity {}%   Wind {} km/h",
                report.humidity, report.wind_speed
            )));
            lines.push(Line::new(format!("  Updated {}", report.timestamp), Shade::Dim));
        }
        None => lines.push(Line::new("  Enter a city to get weather.", Shade::Dim)),
    }
}

fn help_lines(lines: &mut Vec<Line>) {
    lines.push(Line::new("KEYBOARD SHORTCUTS", Shade::Bright));
    for (heading, entries) in HELP_SECTIONS {
        lines.push(Line::blank());
        lines.push(Line::new(format!("  {heading}"), Shade::Bright));
        for entry in entries.iter() {
            lines.push(Line::normal(format!("    {entry}")));
        }
    }
    lines.push(Line::blank());
    lines.push(Line::new("  Press [?] or [ESC] to close", Shade::Dim));
}

// ============================================================================
// Helpers
// ============================================================================

fn panel_title(title: &str, status: &str, width: usize) -> Line {
    Line::new(spread(title, status, width), Shade::Bright)
}

fn input_line(buffer: &str, placeholder: &str, focused: bool) -> Line {
    match (focused, buffer.is_empty()) {
        (true, _) => Line::new(format!("  > {buffer}_"), Shade::Bright),
        (false, true) => Line::new(format!("    {placeholder}"), Shade::Dim),
        (false, false) => Line::normal(format!("    {buffer}")),
    }
}

/// Places `left` and `right` at opposite ends of a `width`-column row.
fn spread(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = width.saturating_sub(used).max(1);
    format!("{left}{}{right}", " ".repeat(gap))
}

// ============================================================================
// Tests
// ============================================================================
