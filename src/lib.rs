pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

pub use {
    builder::Builder,
    directive::{DirectiveId, MetricDirective, MetricValue, Scalar, MAX_DIMENSIONS},
    environment::{Environment, LOG_GROUP_NAME_VAR, LOG_STREAM_NAME_VAR},
    metric::EmbeddedMetric,
    unit::Unit,
};

mod builder;
mod directive;
mod emf;
mod environment;
mod metric;
mod unit;
