//! Everything derived from the stored history: the aggregates shown on the dashboard and the
//! synthetic history used to demo them.

pub mod generator;
pub mod insights;
