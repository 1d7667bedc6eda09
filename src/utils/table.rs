//! Fixed-layout text tables for CLI listings.
//!
//! Column widths start at the declared minimum and grow to the widest cell;
//! widths count characters, not bytes, so workplace names with accents line
//! up.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: String,
    pub min_width: usize,
    pub align: Align,
}

impl Column {
    pub fn left(header: &str, min_width: usize) -> Self {
        Self {
            header: header.to_string(),
            min_width,
            align: Align::Left,
        }
    }

    /// Amounts and durations read better right-aligned.
    pub fn right(header: &str, min_width: usize) -> Self {
        Self {
            align: Align::Right,
            ..Self::left(header, min_width)
        }
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    separator: char,
}

impl Table {
    pub fn new(columns: Vec<Column>, separator: char) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            separator,
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain([col.header.chars().count(), col.min_width])
                    .max()
                    .unwrap_or(col.min_width)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let headers: Vec<&str> = self.columns.iter().map(|c| c.header.as_str()).collect();
        self.push_line(&mut out, &headers, &widths);

        let total: usize = widths.iter().map(|w| w + 1).sum();
        out.push_str(&self.separator.to_string().repeat(total.saturating_sub(1)));
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<&str> = (0..self.columns.len())
                .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
                .collect();
            self.push_line(&mut out, &cells, &widths);
        }

        out
    }

    fn push_line(&self, out: &mut String, cells: &[&str], widths: &[usize]) {
        let mut line = String::new();
        for ((cell, col), width) in cells.iter().zip(&self.columns).zip(widths) {
            let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
            match col.align {
                Align::Left => {
                    line.push_str(cell);
                    line.push_str(&pad);
                }
                Align::Right => {
                    line.push_str(&pad);
                    line.push_str(cell);
                }
            }
            line.push(' ');
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}
