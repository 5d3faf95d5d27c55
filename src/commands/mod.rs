pub mod consolidate;
pub mod status;

pub const RUN_MANIFEST_PREFIX: &str = "consolidation_run_";
