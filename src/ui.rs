//! Plain-text presenters for everything the console prints.
//!
//! Tables are laid out with ratatui's `Table` widget, rendered into an
//! off-screen `Buffer` and flattened to text, so the output works the same
//! on a terminal and through a pipe.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::Text,
    widgets::{Block, Cell, Row, Table, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::records::BestRecord;
use crate::session::{AttemptFeedback, AttemptPrompt, WordResult};
use crate::util::two_decimals;

const COLUMN_SPACING: u16 = 1;
const CELL_PADDING: usize = 1;

pub const RESULTS_HEADER: [&str; 3] = ["Word", "Average Accuracy (%)", "WPM"];
pub const RECORDS_HEADER: [&str; 3] = ["Word", "Best WPM", "Best Accuracy (%)"];

/// Pure presenter for one session result row
pub fn present_result_row(result: &WordResult) -> [String; 3] {
    [
        result.word.clone(),
        two_decimals(result.average_accuracy),
        two_decimals(result.wpm),
    ]
}

/// Pure presenter for one best-record row
pub fn present_record_row(record: &BestRecord) -> [String; 3] {
    [
        record.word.clone(),
        two_decimals(record.best_wpm),
        two_decimals(record.best_accuracy),
    ]
}

pub fn results_table(results: &[WordResult]) -> String {
    render_table(RESULTS_HEADER, results.iter().map(present_result_row).collect())
}

pub fn records_table(records: &[BestRecord]) -> String {
    render_table(RECORDS_HEADER, records.iter().map(present_record_row).collect())
}

fn column_widths(header: [&str; 3], rows: &[[String; 3]]) -> [u16; 3] {
    let mut widths = header.map(|h| h.width());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
    }
    widths.map(|w| u16::try_from(w + CELL_PADDING * 2).unwrap_or(u16::MAX))
}

fn padded(content: &str) -> String {
    let pad = " ".repeat(CELL_PADDING);
    format!("{pad}{content}{pad}")
}

/// Render a bordered three-column table; the first column is left aligned,
/// the numeric ones right aligned.
fn render_table(header: [&str; 3], rows: Vec<[String; 3]>) -> String {
    let widths = column_widths(header, &rows);

    let header_row = Row::new(header.map(|h| Cell::from(padded(h))))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            Row::new(row.iter().enumerate().map(|(i, content)| {
                let alignment = if i == 0 {
                    Alignment::Left
                } else {
                    Alignment::Right
                };
                Cell::from(Text::from(padded(content)).alignment(alignment))
            }))
        })
        .collect();

    let inner_width = widths
        .iter()
        .fold(0u16, |acc, w| acc.saturating_add(*w))
        .saturating_add(COLUMN_SPACING * 2);
    let height = u16::try_from(rows.len() + 3).unwrap_or(u16::MAX);
    let area = Rect::new(0, 0, inner_width.saturating_add(2), height);

    let table = Table::new(body, widths.map(Constraint::Length))
        .header(header_row)
        .column_spacing(COLUMN_SPACING)
        .block(Block::bordered());

    let mut buf = Buffer::empty(area);
    table.render(area, &mut buf);
    buffer_to_string(&buf)
}

/// Flatten a buffer to lines of text, skipping cells hidden behind wide
/// graphemes.
fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut lines = Vec::with_capacity(area.height as usize);

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        let mut skip = 0usize;
        for x in area.left()..area.right() {
            let symbol = buf[(x, y)].symbol();
            if skip == 0 {
                line.push_str(symbol);
            }
            skip = skip.max(symbol.width()).saturating_sub(1);
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Numbered listing used when choosing a word to remove
pub fn numbered_words(words: &[String]) -> String {
    words
        .iter()
        .enumerate()
        .map(|(i, word)| format!("{}. {word}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn prompt_header(prompt: &AttemptPrompt<'_>) -> Vec<String> {
    let mut lines = Vec::with_capacity(3);
    // an empty previous submission is not worth echoing
    if let Some(previous) = prompt.previous_attempt.filter(|p| !p.is_empty()) {
        lines.push(format!("Previous attempt: {previous}"));
    }
    lines.push(format!(
        "Repetition {}/{} / {}",
        prompt.repetition, prompt.repetitions, prompt.word
    ));
    lines.push("Start typing now!".to_string());
    lines
}

pub fn attempt_report(feedback: &AttemptFeedback) -> String {
    format!(
        "Results for the current attempt:\nTime taken: {} seconds\nAccuracy: {}%",
        two_decimals(feedback.elapsed_seconds),
        two_decimals(feedback.accuracy),
    )
}

pub fn word_summary(result: &WordResult) -> String {
    format!(
        "Summary for '{}':\nAverage time: {} seconds\nAverage accuracy: {}%\nWords per minute (WPM): {}",
        result.word,
        two_decimals(result.average_time_seconds),
        two_decimals(result.average_accuracy),
        two_decimals(result.wpm),
    )
}
