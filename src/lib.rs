//! Invoice analyzer: sums the `Total` of every `Contraption` row in the
//! first table of an uploaded PDF invoice.

pub mod amount;
pub mod config;
pub mod error;
pub mod frame;
pub mod pdf_extract;
pub mod pipeline;
pub mod server;
pub mod tables;

pub use error::AnalyzeError;
pub use pipeline::{Summary, analyze};
