//! Rendering of summary reports.
//!
//! Text formats (`csv`, `latex`, `markdown`) are built as strings. The
//! `table` format is a `ratatui` widget drawn inline below the cursor, or as
//! plain text when stdout is not a terminal.

use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Cell, Row, Table};
use ratatui::{Terminal, TerminalOptions, Viewport};
use refsweep_core::analysis::{SummaryReport, SummaryRow};

use crate::util::format::{format_count, format_seconds};
use crate::util::styles::{CONTEXT_COLOR, VALUE_COLOR, header_style, titled_block};

/// Output format of `summarise`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Latex,
    Markdown,
    #[default]
    Table,
}

const COLUMNS: [&str; 3] = ["States", "Transitions", "Time"];

/// Write `report` to stdout in `format`
pub fn print_report(
    report: &SummaryReport,
    format: ReportFormat,
    show_context: bool,
) -> io::Result<()> {
    let text = match format {
        ReportFormat::Csv => render_csv(report, show_context),
        ReportFormat::Latex => render_latex(report, show_context),
        ReportFormat::Markdown => render_markdown(report, show_context),
        ReportFormat::Table => return print_table(report, show_context),
    };
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}

// ============================================================================
// CSV
// ============================================================================

/// Quote a field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn render_csv(report: &SummaryReport, show_context: bool) -> String {
    let mut header = vec![csv_field(&report.target)];
    header.extend(COLUMNS.iter().map(|c| c.to_string()));
    if show_context {
        header.push("Context".to_string());
    }

    let mut out = header.join(",");
    out.push('\n');
    for row in &report.rows {
        let mut fields = vec![
            csv_field(&row.value.to_string()),
            row.states.to_string(),
            row.transitions.to_string(),
            format_seconds(row.time),
        ];
        if show_context {
            fields.push(csv_field(&row.context));
        }
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

// ============================================================================
// LaTeX
// ============================================================================

fn latex_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '_' | '&' | '%' | '#' | '$' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_latex(report: &SummaryReport, show_context: bool) -> String {
    let spec = if show_context { "lrrrl" } else { "lrrr" };
    let mut header = vec![latex_escape(&report.target)];
    header.extend(COLUMNS.iter().map(|c| c.to_string()));
    if show_context {
        header.push("Context".to_string());
    }

    let mut out = format!("\\begin{{tabular}}{{{spec}}}\n\\hline\n");
    out.push_str(&header.join(" & "));
    out.push_str(" \\\\\n\\hline\n");
    for row in &report.rows {
        let mut cells = vec![
            latex_escape(&row.value.to_string()),
            format_count(row.states),
            format_count(row.transitions),
            format!("{}s", format_seconds(row.time)),
        ];
        if show_context {
            cells.push(format!("\\small{{{}}}", latex_escape(&row.context)));
        }
        out.push_str(&cells.join(" & "));
        out.push_str(" \\\\\n");
    }
    out.push_str("\\hline\n\\end{tabular}\n");
    out
}

// ============================================================================
// Markdown
// ============================================================================

fn markdown_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

pub fn render_markdown(report: &SummaryReport, show_context: bool) -> String {
    let mut header = vec![markdown_cell(&report.target)];
    header.extend(COLUMNS.iter().map(|c| c.to_string()));
    let mut separator = "|---:|---:|---:|---:|".to_string();
    if show_context {
        header.push("Context".to_string());
        separator.push_str("---|");
    }

    let mut out = format!("| {} |\n{separator}\n", header.join(" | "));
    for row in &report.rows {
        let mut cells = vec![
            markdown_cell(&row.value.to_string()),
            format_count(row.states),
            format_count(row.transitions),
            format!("{}s", format_seconds(row.time)),
        ];
        if show_context {
            cells.push(markdown_cell(&row.context));
        }
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

// ============================================================================
// Console table
// ============================================================================

fn table_title(report: &SummaryReport) -> String {
    format!("FDR Metric Summary: {}", report.target)
}

fn row_cells(row: &SummaryRow, show_context: bool) -> Vec<String> {
    let mut cells = vec![
        row.value.to_string(),
        format_count(row.states),
        format_count(row.transitions),
        format!("{}s", format_seconds(row.time)),
    ];
    if show_context {
        cells.push(row.context.clone());
    }
    cells
}

fn header_cells(report: &SummaryReport, show_context: bool) -> Vec<String> {
    let mut cells = vec![report.target.clone()];
    cells.extend(COLUMNS.iter().map(|c| c.to_string()));
    if show_context {
        cells.push("Context".to_string());
    }
    cells
}

/// Column widths fitting the header and every cell
fn column_widths(report: &SummaryReport, show_context: bool) -> Vec<u16> {
    let mut widths: Vec<usize> = header_cells(report, show_context)
        .iter()
        .map(|c| c.chars().count())
        .collect();
    for row in &report.rows {
        for (w, cell) in widths.iter_mut().zip(row_cells(row, show_context)) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
        .into_iter()
        .map(|w| u16::try_from(w).unwrap_or(u16::MAX))
        .collect()
}

/// Width and height the table needs, borders included
fn table_size(report: &SummaryReport, show_context: bool) -> (u16, u16) {
    let widths = column_widths(report, show_context);
    let spacing = widths.len().saturating_sub(1) as u16;
    let content: u16 = widths.iter().fold(0u16, |acc, w| acc.saturating_add(*w));
    let title = table_title(report).chars().count() as u16;
    let width = content
        .saturating_add(spacing)
        .max(title)
        .saturating_add(2);
    let height = (report.rows.len() as u16).saturating_add(3);
    (width, height)
}

/// Styled summary table; numeric columns are right-aligned
pub fn summary_table(report: &SummaryReport, show_context: bool) -> Table<'static> {
    let header = Row::new(
        header_cells(report, show_context)
            .into_iter()
            .enumerate()
            .map(|(i, h)| aligned_cell(h, i)),
    )
    .style(header_style());

    let rows = report.rows.iter().map(|row| {
        Row::new(
            row_cells(row, show_context)
                .into_iter()
                .enumerate()
                .map(|(i, c)| {
                    let cell = aligned_cell(c, i);
                    match i {
                        0 => cell.style(Style::default().fg(VALUE_COLOR)),
                        4 => cell.style(Style::default().fg(CONTEXT_COLOR)),
                        _ => cell,
                    }
                }),
        )
    });

    let widths = column_widths(report, show_context)
        .into_iter()
        .map(Constraint::Length);

    Table::new(rows, widths)
        .header(header)
        .block(titled_block(&table_title(report)))
}

fn aligned_cell(text: String, column: usize) -> Cell<'static> {
    let alignment = if (1..=3).contains(&column) {
        Alignment::Right
    } else {
        Alignment::Left
    };
    Cell::from(Line::from(text).alignment(alignment))
}

/// Draw the table into an off-screen buffer sized to fit it
pub fn render_table(report: &SummaryReport, show_context: bool) -> Buffer {
    let (width, height) = table_size(report, show_context);
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    Widget::render(summary_table(report, show_context), area, &mut buffer);
    buffer
}

/// Text content of a buffer, one string per row with trailing blanks trimmed
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let line: String = (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}

fn print_table(report: &SummaryReport, show_context: bool) -> io::Result<()> {
    if !io::stdout().is_terminal() {
        let mut stdout = io::stdout().lock();
        for line in buffer_lines(&render_table(report, show_context)) {
            writeln!(stdout, "{line}")?;
        }
        return stdout.flush();
    }

    let (_, height) = table_size(report, show_context);
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )?;
    terminal.draw(|frame| frame.render_widget(summary_table(report, show_context), frame.area()))?;
    terminal.show_cursor()?;
    drop(terminal);
    println!();
    Ok(())
}
