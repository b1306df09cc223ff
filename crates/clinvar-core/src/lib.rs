//! Core types for the ClinVar statistics engine.
//!
//! This crate is deliberately free of database dependencies. It defines the
//! filter record callers hand to every metric, the plain row types metrics
//! return, the domain ranking of significance terms and conflict levels, and
//! the assembler that shapes raw grouped rows into nested breakdowns.

pub mod breakdown;
pub mod conflict;
pub mod error;
pub mod filter;
pub mod rows;
pub mod significance;

pub use error::{Error, Result};
