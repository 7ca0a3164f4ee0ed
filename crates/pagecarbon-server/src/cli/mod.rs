//! CLI subcommand implementations for the pagecarbon binary.

pub mod audit_cmd;
pub mod serve_cmd;
