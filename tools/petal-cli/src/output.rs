//! Terminal rendering: status lines, tables and badges.

use std::fmt;

use console::{pad_str, style, Alignment, Style};
use indicatif::{ProgressBar, ProgressStyle};

/// Kind of status line, deciding its marker and stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Info,
    Success,
    Warn,
    Error,
    Trace,
}

impl Tone {
    fn marker(self) -> console::StyledObject<&'static str> {
        match self {
            Tone::Info => style("ℹ").blue(),
            Tone::Success => style("✓").green(),
            Tone::Warn => style("⚠").yellow(),
            Tone::Error => style("✗").red(),
            Tone::Trace => style("→").dim(),
        }
    }

    fn body(self, msg: &str) -> String {
        match self {
            Tone::Error => style(msg).red().to_string(),
            Tone::Trace => style(msg).dim().to_string(),
            _ => msg.to_string(),
        }
    }

    fn on_stderr(self) -> bool {
        !matches!(self, Tone::Info | Tone::Success)
    }
}

/// A table cell. Text is padded to the column width before any styling
/// is applied, so escape codes never count toward alignment.
#[derive(Debug, Clone)]
pub struct Cell {
    text: String,
    style: Option<Style>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }

    /// Render padded (or truncated) to `width` display columns.
    fn render(&self, width: usize) -> String {
        let padded = pad_str(&self.text, width, Alignment::Left, Some("…"));
        match &self.style {
            Some(style) => style.apply_to(padded).to_string(),
            None => padded.into_owned(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.style {
            Some(style) => write!(f, "{}", style.apply_to(&self.text)),
            None => f.write_str(&self.text),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::plain(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::plain(text)
    }
}

fn render_row(cells: &[Cell], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| cell.render(width))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Output handler for CLI messages. Human output is suppressed in JSON mode.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    fn emit(&self, tone: Tone, msg: &str) {
        if self.json {
            return;
        }
        let line = format!("{} {}", tone.marker(), tone.body(msg));
        if tone.on_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    pub fn info(&self, msg: &str) {
        self.emit(Tone::Info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.emit(Tone::Success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.emit(Tone::Warn, msg);
    }

    /// Errors still reach stderr in JSON mode, as `{"error": ...}`.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        self.emit(Tone::Error, msg);
    }

    /// Verbose-only detail.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.emit(Tone::Trace, msg);
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Pretty JSON on stdout, regardless of mode.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{json}");
        }
    }

    /// Labelled value, indented under the current header.
    pub fn kv(&self, key: &str, value: impl fmt::Display) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// Column titles for a table.
    pub fn columns(&self, titles: &[&str], widths: &[usize]) {
        let cells: Vec<Cell> = titles
            .iter()
            .map(|title| Cell::styled(*title, Style::new().bold()))
            .collect();
        self.row(&cells, widths);
    }

    /// Dim separator spanning the table.
    pub fn rule(&self, widths: &[usize]) {
        if !self.json {
            let span = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
            println!("  {}", style("-".repeat(span)).dim());
        }
    }

    pub fn row(&self, cells: &[Cell], widths: &[usize]) {
        if !self.json {
            println!("  {}", render_row(cells, widths));
        }
    }

    /// Spinner for indeterminate waits; hidden in JSON mode.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(template);
        }
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Stock level: red when sold out, yellow when five or fewer remain.
pub fn stock_badge(stock: u64) -> Cell {
    match stock {
        0 => Cell::styled("out of stock", Style::new().red()),
        1..=5 => Cell::styled(format!("{stock} left"), Style::new().yellow()),
        _ => Cell::styled(stock.to_string(), Style::new().green()),
    }
}

/// Checkout phase name, colored by outcome.
pub fn phase_badge(phase: &str) -> Cell {
    let style = match phase {
        "succeeded" => Style::new().green(),
        "submitting" | "validating" => Style::new().yellow(),
        "failed" => Style::new().red(),
        _ => Style::new().dim(),
    };
    Cell::styled(phase, style)
}
