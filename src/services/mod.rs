pub mod insight_engine;
pub mod metrics_engine;
pub mod session;
