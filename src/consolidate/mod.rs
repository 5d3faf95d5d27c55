mod engine;
#[cfg(test)]
mod tests;

pub use engine::{ConsolidationReport, consolidate, key_columns};
