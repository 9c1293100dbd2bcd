//! Use case orchestration for licenseguard.
//!
//! This crate provides the application layer: it loads the license knowledge base and override
//! list, runs the configured finders, evaluates the archives, and produces the scan report.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod inputs;
mod report;
mod scan;

pub use inputs::{Inputs, load_inputs};
pub use report::{
    parse_report_json, render_summary, runtime_error_report, serialize_report, write_report,
};
pub use scan::{ScanInput, ScanOutput, run_scan, run_scan_with, verdict_exit_code, verdict_for};
