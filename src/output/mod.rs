//! Output module for writing the roster and reporting on a run
//!
//! This module handles:
//! - Writing the merged records to a JSON file
//! - Summarizing per-source results and fetch counters

mod json_file;
pub mod stats;
mod traits;

pub use json_file::{to_json_string, JsonFileSink};
pub use stats::{print_summary, RunSummary};
pub use traits::{OutputError, OutputResult, OutputSink};
