//! Text rendering of console state.
//!
//! Headers come from the keys of the first row, in that row's order. Cells
//! use `display_value`, so SQL NULL prints as `NULL` (and so does a text
//! cell that literally holds "NULL").

use crate::query::{display_value, Row};

pub const NO_RESULTS: &str = "Query executed successfully. No results to display.";
pub const LOADING: &str = "Executing...";

/// Maximum column width before truncation
const MAX_COLUMN_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    /// Nothing submitted yet.
    Initial,
    Loading,
    Error(&'a str),
    /// Successful statement that returned no rows.
    Empty { affected_rows: Option<u64> },
    Rows(&'a [Row]),
}

pub fn render(view: &View<'_>) -> String {
    match view {
        View::Initial => String::new(),
        View::Loading => LOADING.to_string(),
        View::Error(message) => format!("ERROR: {}", message),
        View::Empty { affected_rows } => match affected_rows {
            Some(n) => format!("{}\n{}", NO_RESULTS, affected_line(*n)),
            None => NO_RESULTS.to_string(),
        },
        View::Rows(rows) => format!("{}{}", render_table(rows), row_count_line(rows.len())),
    }
}

/// Column headers: the first row's keys in order.
pub fn header(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

pub fn row_count_line(count: usize) -> String {
    format!("{} {} returned", count, if count == 1 { "row" } else { "rows" })
}

fn affected_line(count: u64) -> String {
    format!("{} {} affected", count, if count == 1 { "row" } else { "rows" })
}

fn cell_text(value: &str) -> String {
    let flat: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();

    if flat.chars().count() <= MAX_COLUMN_WIDTH {
        flat
    } else {
        let kept: String = flat.chars().take(MAX_COLUMN_WIDTH - 3).collect();
        format!("{}...", kept)
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (idx, width) in widths.iter().enumerate() {
        line.push_str(&"─".repeat(width + 2));
        line.push(if idx == widths.len() - 1 { right } else { mid });
    }
    line.push('\n');
    line
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let mut out = String::from("│");
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(&pad(cell, *width));
        out.push_str(" │");
    }
    out.push('\n');
    out
}

/// Boxed table of `rows`; empty input renders nothing.
pub fn render_table(rows: &[Row]) -> String {
    let columns = header(rows);
    if columns.is_empty() {
        return String::new();
    }

    let headers: Vec<String> = columns.iter().map(|c| cell_text(c)).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|col| row.get(col).map(|v| cell_text(&display_value(v))).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = border(&widths, '┌', '┬', '┐');
    out.push_str(&line(&headers, &widths));
    out.push_str(&border(&widths, '├', '┼', '┤'));
    for cells in &body {
        out.push_str(&line(cells, &widths));
    }
    out.push_str(&border(&widths, '└', '┴', '┘'));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn select_one_renders_one_column_one_row() {
        let rows = vec![row(&[("x", json!(1))])];
        let out = render(&View::Rows(&rows));

        assert_eq!(
            out,
            "┌───┐\n\
             │ x │\n\
             ├───┤\n\
             │ 1 │\n\
             └───┘\n\
             1 row returned"
        );
    }

    #[test]
    fn header_follows_first_row_key_order() {
        let rows = vec![
            row(&[("zeta", json!(1)), ("alpha", json!(2)), ("mid", json!(3))]),
            row(&[("alpha", json!(5)), ("zeta", json!(4)), ("mid", json!(6))]),
        ];
        assert_eq!(header(&rows), vec!["zeta", "alpha", "mid"]);

        let out = render_table(&rows);
        let header_line = out.lines().nth(1).unwrap();
        assert!(header_line.find("zeta").unwrap() < header_line.find("alpha").unwrap());
        // Later rows are laid out under the first row's columns.
        assert!(out.lines().nth(4).unwrap().starts_with("│ 4    │ 5     │ 6   │"));
    }

    #[test]
    fn null_renders_as_token() {
        let rows = vec![row(&[("email", Value::Null), ("name", json!("Ada"))])];
        let out = render_table(&rows);
        assert!(out.contains("│ NULL  │ Ada  │"));
    }

    #[test]
    fn states_are_visually_distinct() {
        let rows: Vec<Row> = vec![];
        let initial = render(&View::Initial);
        let empty = render(&View::Empty { affected_rows: None });
        let error = render(&View::Error("boom"));

        assert_eq!(initial, "");
        assert_eq!(empty, NO_RESULTS);
        assert_eq!(error, "ERROR: boom");
        assert_ne!(empty, error);
        assert_eq!(render_table(&rows), "");
    }

    #[test]
    fn empty_statement_mentions_affected_rows() {
        assert_eq!(
            render(&View::Empty { affected_rows: Some(3) }),
            format!("{}\n3 rows affected", NO_RESULTS)
        );
    }

    #[test]
    fn long_and_multiline_cells_are_flattened_and_truncated() {
        let long = "a".repeat(100);
        let rows = vec![row(&[("note", json!(long)), ("agenda", json!("line1\nline2"))])];
        let out = render_table(&rows);

        assert!(out.contains(&format!("{}...", "a".repeat(MAX_COLUMN_WIDTH - 3))));
        assert!(out.contains("line1 line2"));
        assert!(!out.contains(&"a".repeat(MAX_COLUMN_WIDTH)));
    }

    #[test]
    fn row_count_pluralizes() {
        assert_eq!(row_count_line(0), "0 rows returned");
        assert_eq!(row_count_line(1), "1 row returned");
        assert_eq!(row_count_line(2), "2 rows returned");
    }
}
