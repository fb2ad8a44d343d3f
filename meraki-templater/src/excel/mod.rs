//! Excel input and output
//!
//! Assignments come in through calamine, results go out through
//! rust_xlsxwriter.

pub mod reader;
pub mod writer;

pub use reader::{TemplateAssignment, read_assignments};
pub use writer::write_results;
