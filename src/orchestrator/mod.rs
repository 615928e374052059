mod cache;
mod orchestrator;

pub use cache::MetricAccumulator;
pub use orchestrator::MapOrchestrator;
