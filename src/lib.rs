//! Terminal focus timer. Every finished session is written into a plain csv file and the
//! history can be turned into a small dashboard: totals, daily trend, the plants you've grown and
//! the hours you focus best at.
//!

pub mod analysis;
pub mod cli;
pub mod storage;
pub mod timer;
pub mod utils;
