//! cmsnap Report - spreadsheet and document renderings of a diff
//!
//! Both artifacts carry the same seven columns in differ order and colour
//! each row by its change category. They are independent: a failure
//! producing one does not prevent the other.

pub mod errors;
pub mod outcome;
pub mod pdf;
pub mod rows;
pub mod xlsx;

pub use errors::RenderError;
pub use outcome::{render_all, ArtifactKind, ReportOutcome};
pub use rows::{rows_from_records, ReportRow, COLUMNS};
