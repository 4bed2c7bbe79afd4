// src/pipeline.rs

use crate::amount::{Amount, clean_amount, sum_amounts};
use crate::error::AnalyzeError;
use crate::frame::Frame;
use crate::pdf_extract::{extract_tables, open_pdf};
use crate::tables::{RawTable, TableSettings};
use serde::Serialize;
use tracing::info;

pub const ITEM_COLUMN: &str = "Item";
pub const TOTAL_COLUMN: &str = "Total";
pub const TARGET_ITEM: &str = "Contraption";

/// Response body of a successful analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub sum: Amount,
}

/// Bytes in, summed `Total` of every `Contraption` row of the first table out.
pub fn analyze(pdf_bytes: &[u8], settings: &TableSettings) -> Result<Summary, AnalyzeError> {
    let pdf = open_pdf(pdf_bytes)?;
    let tables = extract_tables(&pdf, settings)?;
    info!(tables = tables.len(), "Tables extracted");

    let first = tables.first().ok_or(AnalyzeError::NoTables)?;
    summarize_table(first)
}

/// Filter, clean and sum one table.
pub fn summarize_table(table: &RawTable) -> Result<Summary, AnalyzeError> {
    let frame = Frame::from_raw(table);
    if !frame.has_column(ITEM_COLUMN) || !frame.has_column(TOTAL_COLUMN) {
        return Err(AnalyzeError::MissingColumns);
    }

    let totals: Vec<Option<Amount>> = frame
        .records()
        .filter(|rec| rec.get(ITEM_COLUMN) == Some(TARGET_ITEM))
        .map(|rec| rec.get(TOTAL_COLUMN).and_then(clean_amount))
        .collect();
    let valid: Vec<Amount> = totals.iter().flatten().copied().collect();
    let sum = sum_amounts(valid.iter().copied());

    info!(
        page = table.page_number,
        records = frame.len(),
        matched = totals.len(),
        summed = valid.len(),
        sum = %sum,
        "Table summarized"
    );
    Ok(Summary { sum })
}
