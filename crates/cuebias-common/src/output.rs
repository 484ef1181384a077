//! Plain-text table rendering for terminal output.

use serde_json::{Map, Value};

/// A rendered-on-demand table of string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Render with columns padded to their widest cell.
    pub fn render(&self) -> String {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&self.headers).chain(self.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        if !self.headers.is_empty() {
            out.push_str(&render_row(&self.headers, &widths));
            out.push('\n');
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
        for row in &self.rows {
            out.push_str(&render_row(row, &widths));
            out.push('\n');
        }
        out
    }

    /// Rows as JSON objects keyed by header.
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (header, cell) in self.headers.iter().zip(row) {
                    obj.insert(header.clone(), Value::String(cell.clone()));
                }
                Value::Object(obj)
            })
            .collect();
        Value::Array(rows)
    }
}

fn render_row(row: &[String], widths: &[usize]) -> String {
    let cells: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = row.get(i).map_or("", String::as_str);
            format!("{cell:<w$}")
        })
        .collect();
    cells.join(" | ").trim_end().to_string()
}

/// Builder for [`Table`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(mut self, headers: Vec<&str>) -> Self {
        self.table.headers = headers.into_iter().map(str::to_string).collect();
        self
    }

    pub fn row(mut self, row: Vec<&str>) -> Self {
        self.table.rows.push(row.into_iter().map(str::to_string).collect());
        self
    }

    pub fn build(self) -> Table {
        self.table
    }
}

/// Format a fraction as a percentage with one decimal.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}
