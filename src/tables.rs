// src/tables.rs

use pdfplumber::{Page, Table};
use serde::Deserialize;

/// How table boundaries are found on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Cells bounded by drawn ruling lines.
    #[default]
    Lines,
    /// Columns inferred from aligned words.
    Text,
}

/// Tolerances for table detection, all in PDF points.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub strategy: Strategy,
    pub snap_tolerance: f64,
    pub join_tolerance: f64,
    pub edge_min_length: f64,
    pub intersection_tolerance: f64,
    pub text_x_tolerance: f64,
    pub text_y_tolerance: f64,
    pub min_words_vertical: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Lines,
            snap_tolerance: 3.0,
            join_tolerance: 3.0,
            edge_min_length: 3.0,
            intersection_tolerance: 3.0,
            text_x_tolerance: 3.0,
            text_y_tolerance: 3.0,
            min_words_vertical: 3,
        }
    }
}

impl TableSettings {
    /// Finder settings for the extractor. Each tolerance applies to both axes.
    pub fn to_finder(&self) -> pdfplumber::TableSettings {
        let strategy = match self.strategy {
            Strategy::Lines => pdfplumber::Strategy::Lattice,
            Strategy::Text => pdfplumber::Strategy::Stream,
        };
        pdfplumber::TableSettings {
            strategy,
            snap_tolerance: self.snap_tolerance,
            snap_x_tolerance: self.snap_tolerance,
            snap_y_tolerance: self.snap_tolerance,
            join_tolerance: self.join_tolerance,
            join_x_tolerance: self.join_tolerance,
            join_y_tolerance: self.join_tolerance,
            edge_min_length: self.edge_min_length,
            intersection_tolerance: self.intersection_tolerance,
            intersection_x_tolerance: self.intersection_tolerance,
            intersection_y_tolerance: self.intersection_tolerance,
            text_x_tolerance: self.text_x_tolerance,
            text_y_tolerance: self.text_y_tolerance,
            min_words_vertical: self.min_words_vertical,
            ..pdfplumber::TableSettings::default()
        }
    }
}

/// A table as a grid of text cells. `None` marks a grid position that no
/// cell covers; an empty cell is `Some("")`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// 1-based.
    pub page_number: u32,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(page_number: u32, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { page_number, rows }
    }

    pub fn from_table(page_number: u32, table: &Table) -> Self {
        let rows = table
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.text.clone()).collect())
            .collect();
        Self::new(page_number, rows)
    }
}

/// Detect the tables on one page, top to bottom.
pub fn find_tables(page: &Page, settings: &TableSettings) -> Vec<RawTable> {
    let page_number = u32::try_from(page.page_number() + 1).unwrap_or(u32::MAX);
    page.find_tables(&settings.to_finder())
        .iter()
        .map(|table| RawTable::from_table(page_number, table))
        .collect()
}
