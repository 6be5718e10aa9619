mod aggregate;
mod service;
mod tracker;

pub use aggregate::{AggregateStats, aggregate_stats, compute_streak};
pub use service::ProgressService;
pub use tracker::ProgressTracker;
