// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared table renderer for CLI list views. Column widths are
//! auto-computed from data; color is applied after padding so ANSI escapes
//! never corrupt width math.

use std::io::Write;

use crate::color;

pub enum Align {
    Left,
    Right,
}

pub enum CellStyle {
    Plain,
    Muted,
    Status,
}

pub struct Column {
    pub name: &'static str,
    pub align: Align,
    pub style: CellStyle,
}

impl Column {
    pub fn left(name: &'static str) -> Self {
        Self { name, align: Align::Left, style: CellStyle::Plain }
    }

    pub fn status(name: &'static str) -> Self {
        Self { name, align: Align::Left, style: CellStyle::Status }
    }

    pub fn muted(name: &'static str) -> Self {
        Self { name, align: Align::Left, style: CellStyle::Muted }
    }
}

const SEP: &str = "  ";

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    colorize: bool,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, rows: Vec::new(), colorize: color::should_colorize() }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn render(&self, out: &mut impl Write) {
        if self.rows.is_empty() {
            return;
        }
        let widths = self.compute_widths();

        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let is_last = i == self.columns.len() - 1;
                let padded = if is_last { col.name.to_string() } else { pad(col.name, widths[i], &col.align) };
                if self.colorize { color::apply_header(&padded) } else { padded }
            })
            .collect();
        let _ = writeln!(out, "{}", header.join(SEP));

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let is_last = i == self.columns.len() - 1;
                    let raw = row.get(i).map(|s| s.as_str()).unwrap_or("");
                    let padded = if is_last { raw.to_string() } else { pad(raw, widths[i], &col.align) };
                    stylize(&padded, &col.style, self.colorize)
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join(SEP));
        }
    }

    fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let min = col.name.len();
                let max_data = self.rows.iter().map(|row| row.get(i).map(|s| s.len()).unwrap_or(0)).max().unwrap_or(0);
                min.max(max_data)
            })
            .collect()
    }
}

fn pad(text: &str, width: usize, align: &Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", text),
        Align::Right => format!("{:>width$}", text),
    }
}

fn stylize(text: &str, style: &CellStyle, colorize: bool) -> String {
    if !colorize {
        return text.to_string();
    }
    match style {
        CellStyle::Plain => text.to_string(),
        CellStyle::Muted => color::apply_muted(text),
        CellStyle::Status => color::apply_status(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_widest_cell() {
        let mut t = Table::new(vec![Column::left("ID"), Column::left("TITLE")]);
        t.row(vec!["abcdef".into(), "x".into()]);
        t.row(vec!["a".into(), "y".into()]);
        let mut buf = Vec::new();
        t.render(&mut buf);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.lines().next().unwrap().starts_with("ID    "));
    }

    #[test]
    fn empty_rows_render_nothing() {
        let t = Table::new(vec![Column::left("ID")]);
        let mut buf = Vec::new();
        t.render(&mut buf);
        assert!(buf.is_empty());
    }
}
