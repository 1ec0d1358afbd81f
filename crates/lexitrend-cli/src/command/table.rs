//! Console report tables
//!
//! The first column is left-aligned, every other column right-aligned.
//! Column widths fit the widest cell.

use std::fmt::Write as _;

pub(super) struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(super) fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: vec![],
        }
    }

    pub(super) fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = cells.into_iter().map(Into::into).collect::<Vec<_>>();
        assert_eq!(row.len(), self.headers.len(), "row width must match header");
        self.rows.push(row);
    }

    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain([header.chars().count()])
                    .max()
                    .unwrap_or_default()
            })
            .collect()
    }

    pub(super) fn render(&self) -> String {
        let widths = self.column_widths();
        let total_width = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);

        let mut out = String::new();
        write_line(&mut out, &self.headers, &widths);
        let _ = writeln!(out, "  {}", "-".repeat(total_width));
        for row in &self.rows {
            write_line(&mut out, row, &widths);
        }
        out
    }

    pub(super) fn print(&self) {
        print!("{}", self.render());
    }
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push(' ');
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i == 0 {
            let _ = write!(out, " {cell:<width$}");
        } else {
            let _ = write!(out, " {cell:>width$}");
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = Table::new(["DV", "b", "R²"]);
        table.push_row(["Affect", "0.00123", "0.512"]);
        table.push_row(["Cognition", "-0.01000", "0.9"]);
        let rendered = table.render();
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "  DV               b    R²");
        assert_eq!(lines[1], format!("  {}", "-".repeat(24)));
        assert_eq!(lines[2], "  Affect     0.00123 0.512");
        assert_eq!(lines[3], "  Cognition -0.01000   0.9");
    }

    #[test]
    #[should_panic(expected = "row width")]
    fn test_row_width_mismatch() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(["only one"]);
    }
}
