//! Storage is organized through [session_store::CsvSessionStore].
//! The basic idea is:
//!   - There is a single csv file with every completed session.
//!   - Each write replaces the whole file through a temporary file and a rename.
//!   - Derived columns are written for humans reading the file but never trusted on read.

pub mod entities;
pub mod recorder;
pub mod session_store;
