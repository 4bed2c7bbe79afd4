// src/pdf_extract.rs

use crate::error::AnalyzeError;
use crate::tables::{RawTable, TableSettings, find_tables};
use pdfplumber::{ExtractOptions, Page, Pdf};
use tracing::{debug, info, warn};

/// Nested Form XObjects deeper than this are not interpreted.
const MAX_FORM_DEPTH: usize = 10;

/// Parse raw bytes into a PDF document.
pub fn open_pdf(pdf_bytes: &[u8]) -> Result<Pdf, AnalyzeError> {
    let options = ExtractOptions {
        max_recursion_depth: MAX_FORM_DEPTH,
        collect_warnings: true,
        ..ExtractOptions::default()
    };
    let pdf = Pdf::open_bytes(pdf_bytes, Some(options))?;
    info!(pages = pdf.page_count(), "PDF parsed");
    Ok(pdf)
}

/// Every table of the document, page by page, top to bottom within a page.
pub fn extract_tables(pdf: &Pdf, settings: &TableSettings) -> Result<Vec<RawTable>, AnalyzeError> {
    let mut all_tables = Vec::new();
    for page in pdf.pages() {
        let page = page?;
        let span = tracing::debug_span!("page", number = page.page_number() + 1);
        let _guard = span.enter();

        if looks_like_scanned(&page) {
            warn!("Page has images but no text, likely scanned; it will yield no tables");
        }
        for warning in page.warnings() {
            debug!(warning = %warning.description, "Extraction warning");
        }

        let tables = find_tables(&page, settings);
        debug!(
            chars = page.chars().len(),
            lines = page.lines().len(),
            rects = page.rects().len(),
            tables = tables.len(),
            "Page scanned for tables"
        );
        all_tables.extend(tables);
    }
    Ok(all_tables)
}

/// A page that draws images but carries no text is almost certainly a scan.
fn looks_like_scanned(page: &Page) -> bool {
    page.chars().is_empty() && !page.images().is_empty()
}
