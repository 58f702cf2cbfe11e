// Engagement graph: construction, coordination signals and detectors.

pub mod builder;
pub mod engine;
pub mod metrics;
pub mod schema;
pub mod signals;
