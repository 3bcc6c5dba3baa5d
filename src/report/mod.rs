//! Output of a compilation run.
//!
//! The compiled bundle map is written as pretty JSON; a per-bundle summary
//! table is printed for the operator.

pub mod summary;
pub mod writer;

pub use summary::render_summary;
pub use writer::write_report;
