//! Shared infrastructure for cuebias tools.
//!
//! - Error handling with actionable diagnostics
//! - Table rendering for terminal output

pub mod error;
pub mod output;

pub use error::{CuebiasError, Result};
pub use output::{format_percent, Table, TableBuilder};
