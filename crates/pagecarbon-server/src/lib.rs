//! pagecarbon server — REST API and CLI over the pagecarbon audit pipeline,
//! plus the CO2 and data cost estimates derived from byte totals.

pub mod cli;
pub mod config;
pub mod report;
pub mod rest;
