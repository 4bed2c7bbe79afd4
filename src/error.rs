use thiserror::Error;

/// Everything that can stop an invoice from being summarized.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Invalid file type. Please upload a PDF.")]
    InvalidFileType,

    #[error("No tables found in the PDF.")]
    NoTables,

    #[error("PDF does not contain 'Item' and/or 'Total' columns.")]
    MissingColumns,

    #[error("{0}")]
    Pdf(#[from] pdfplumber::PdfError),

    #[error("{0}")]
    Processing(String),
}

impl AnalyzeError {
    /// Client-side problems the caller can fix by sending a different file.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidFileType | Self::MissingColumns)
    }
}
