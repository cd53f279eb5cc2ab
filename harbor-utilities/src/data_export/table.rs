use std::io::Write;

use harbor_models::errors::SendableError;

use super::{TableData, TableExporter};

const MAX_CELL_CHARS: usize = 60;

/// Box-drawn table for terminals.
#[derive(Debug, Default)]
pub struct BoxTableExporter;

impl BoxTableExporter {
    pub fn new() -> Self {
        Self
    }
}

impl TableExporter for BoxTableExporter {
    fn export(&self, out: &mut dyn Write, table: &TableData) -> Result<(), SendableError> {
        out.write_all(render_table(table).as_bytes())?;
        Ok(())
    }
}

pub fn render_table(table: &TableData) -> String {
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate_cell(cell, MAX_CELL_CHARS)).collect())
        .collect();

    let mut widths: Vec<usize> = table.headers.iter().map(|v| v.chars().count()).collect();
    for row in &rows {
        for (idx, value) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(value.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_border(&mut out, '╔', '╦', '╗', &widths);
    push_row(&mut out, &table.headers, &widths);
    push_border(&mut out, '╠', '╬', '╣', &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    push_border(&mut out, '╚', '╩', '╝', &widths);
    out
}

fn truncate_cell(value: &str, max_chars: usize) -> String {
    let single_line = value.replace(['\r', '\n'], " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }

    let mut out: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn push_border(out: &mut String, left: char, middle: char, right: char, widths: &[usize]) {
    out.push(left);
    for (idx, width) in widths.iter().enumerate() {
        out.push_str(&"═".repeat(*width + 2));
        if idx + 1 == widths.len() {
            out.push(right);
        } else {
            out.push(middle);
        }
    }
    out.push('\n');
}

fn push_row(out: &mut String, values: &[String], widths: &[usize]) {
    out.push('║');
    for (idx, width) in widths.iter().enumerate() {
        let value = values.get(idx).map(String::as_str).unwrap_or("");
        let padding = width.saturating_sub(value.chars().count());
        out.push_str(&format!(" {}{} ║", value, " ".repeat(padding)));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_box() {
        let table = TableData::new(
            vec!["id".into(), "status".into()],
            vec![vec!["12".into(), "Running".into()]],
        );
        let expected = "\
╔════╦═════════╗
║ id ║ status  ║
╠════╬═════════╣
║ 12 ║ Running ║
╚════╩═════════╝
";
        assert_eq!(render_table(&table), expected);
    }

    #[test]
    fn truncates_long_and_multiline_cells() {
        assert_eq!(truncate_cell("abcdefgh", 6), "abc...");
        assert_eq!(truncate_cell("a\nb", 6), "a b");
    }

    #[test]
    fn short_rows_are_padded() {
        let table = TableData::new(vec!["a".into(), "b".into()], vec![vec!["x".into()]]);
        assert!(render_table(&table).contains("║ x ║   ║"));
    }
}
