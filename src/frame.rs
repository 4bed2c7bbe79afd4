// src/frame.rs

use crate::tables::RawTable;

/// A table read as header + records. Rows shorter than the header are
/// padded with absent values; longer rows are truncated.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    columns: Vec<Option<&'a str>>,
    rows: Vec<Vec<Option<&'a str>>>,
}

/// One data row, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'f, 'a> {
    frame: &'f Frame<'a>,
    row: &'f [Option<&'a str>],
}

impl<'a> Frame<'a> {
    pub fn from_raw(table: &'a RawTable) -> Self {
        let mut rows = table.rows.iter();
        let columns: Vec<Option<&str>> = rows
            .next()
            .map(|header| header.iter().map(Option::as_deref).collect())
            .unwrap_or_default();

        let rows = rows
            .map(|row| {
                (0..columns.len())
                    .map(|i| row.get(i).and_then(Option::as_deref))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Option<&'a str>] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the header; with duplicates the last one wins.
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().rposition(|c| *c == Some(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_, 'a>> {
        self.rows.iter().map(move |row| Record { frame: self, row })
    }
}

impl<'a> Record<'_, 'a> {
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.frame.column_index(column)?;
        self.row.get(idx).copied().flatten()
    }
}
