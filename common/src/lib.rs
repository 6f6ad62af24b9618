pub mod chart;
pub mod config;
pub mod plot;
pub mod record;
pub mod render;
pub mod util;

/// Bytes per KiB, cache sizes are given in KiB
pub const KIB: u64 = 1024;
