//! Tables for console output, laid out by ratatui's `Table` widget.
//!
//! The widget is rendered into an off-screen [`Buffer`] sized to fit the
//! content, and the buffer is then read back line by line. This keeps the
//! output printable inline (journeys) as well as inside a redrawn frame
//! (live board).

use std::fmt;

use crossterm::style::{Attribute, ContentStyle};
use ratatui::backend::IntoCrossterm;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{self, Block, Padding, Row, Widget};

/// Blank cells between two columns.
const COLUMN_SPACING: u16 = 2;

/// A table column header with an optional colour for its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub color: Option<Color>,
}

/// A titled table of string cells.
///
/// Each column is as wide as its widest entry. The title sits in the top
/// border:
///
/// ```text
/// ┌──Abfahrten───┐
/// │ Zeit   Zug   │
/// │ 08:05  RE1   │
/// └──────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    title: String,
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with a title and no columns.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Add a plain column.
    pub fn with_column(mut self, header: impl Into<String>) -> Self {
        self.columns.push(Column {
            header: header.into(),
            color: None,
        });
        self
    }

    /// Add a column whose cells are coloured on terminals.
    pub fn with_colored_column(mut self, header: impl Into<String>, color: Color) -> Self {
        self.columns.push(Column {
            header: header.into(),
            color: Some(color),
        });
        self
    }

    /// Append a row. Missing trailing cells render empty, extra cells are dropped.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Render the table, with ANSI colours if `colored` is set.
    pub fn render(&self, colored: bool) -> String {
        let widths = self.column_widths();
        let area = self.area(&widths);

        let mut buf = Buffer::empty(area);
        Widget::render(self.widget(&widths), area, &mut buf);

        buffer_text(&buf, colored)
    }

    fn column_widths(&self) -> Vec<u16> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| text_width(cell))
                    .chain(std::iter::once(text_width(&column.header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Smallest area holding border, padding, header and every row.
    fn area(&self, widths: &[u16]) -> Rect {
        let gaps = u16::try_from(widths.len().saturating_sub(1))
            .unwrap_or(u16::MAX)
            .saturating_mul(COLUMN_SPACING);
        let content = widths
            .iter()
            .fold(gaps, |acc, w| acc.saturating_add(*w))
            .saturating_add(2);

        let width = content.max(text_width(&self.title)).saturating_add(2);
        let height = u16::try_from(self.rows.len())
            .unwrap_or(u16::MAX)
            .saturating_add(3);

        Rect::new(0, 0, width, height)
    }

    fn widget(&self, widths: &[u16]) -> widgets::Table<'_> {
        let header = Row::new(self.columns.iter().map(|c| c.header.as_str()))
            .style(Style::new().add_modifier(Modifier::BOLD));

        let rows = self.rows.iter().map(|row| {
            Row::new(self.columns.iter().enumerate().map(|(i, column)| {
                let cell = widgets::Cell::from(row.get(i).map(String::as_str).unwrap_or(""));
                match column.color {
                    Some(color) => cell.style(Style::new().fg(color)),
                    None => cell,
                }
            }))
        });

        widgets::Table::new(rows, widths.iter().map(|&w| Constraint::Length(w)))
            .header(header)
            .column_spacing(COLUMN_SPACING)
            .block(
                Block::bordered()
                    .title_top(Line::from(self.title.as_str()).centered())
                    .padding(Padding::horizontal(1)),
            )
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

fn text_width(text: &str) -> u16 {
    u16::try_from(Line::raw(text).width()).unwrap_or(u16::MAX)
}

/// Read a buffer back as text, one line per row, merging equally styled
/// cells into a single styled run.
fn buffer_text(buf: &Buffer, colored: bool) -> String {
    let area = buf.area;
    let mut out = String::new();

    for y in area.top()..area.bottom() {
        let mut run = String::new();
        let mut run_style = ContentStyle::new();
        // Wide graphemes occupy more than one cell
        let mut skip = 0;

        for x in area.left()..area.right() {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let Some(cell) = buf.cell((x, y)) else {
                continue;
            };
            skip = text_width(cell.symbol()).saturating_sub(1);

            let style = if colored {
                cell_style(cell)
            } else {
                ContentStyle::new()
            };
            if style != run_style {
                push_run(&mut out, &run, run_style);
                run.clear();
                run_style = style;
            }
            run.push_str(cell.symbol());
        }

        push_run(&mut out, &run, run_style);
        out.push('\n');
    }

    out
}

fn cell_style(cell: &ratatui::buffer::Cell) -> ContentStyle {
    let mut style = ContentStyle::new();
    if cell.fg != Color::Reset {
        style.foreground_color = Some(cell.fg.into_crossterm());
    }
    if cell.modifier.contains(Modifier::BOLD) {
        style.attributes.set(Attribute::Bold);
    }
    style
}

fn push_run(out: &mut String, text: &str, style: ContentStyle) {
    if text.is_empty() || style == ContentStyle::new() {
        out.push_str(text);
    } else {
        out.push_str(&style.apply(text).to_string());
    }
}
