use super::{EmbeddedMetric, Environment};
use serde_json::value::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builder for an [EmbeddedMetric] with explicit configuration
///
/// # Example
/// ```
///  use emf_structured_metrics::{Builder, Environment};
///  use std::sync::Arc;
///
///  let env: Environment = [("AWS_LAMBDA_LOG_GROUP_NAME", "/aws/lambda/orders")].into_iter().collect();
///  let metric = Builder::new()
///      .environment(Arc::new(env))
///      .with_property("RequestId", "ABC123")
///      .build();
/// ```
#[derive(Default)]
pub struct Builder {
    environment: Option<Arc<Environment>>,
    properties: BTreeMap<String, Value>,
    timestamp: Option<u64>,
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            environment: None,
            properties: BTreeMap::new(),
            timestamp: None,
        }
    }

    /// Sets the environment the reserved log_group_name and log_steam_name fields are read from
    /// * Defaults to [Environment::global], the process environment captured on first use
    pub fn environment(self, environment: Arc<Environment>) -> Self {
        Self {
            environment: Some(environment),
            ..self
        }
    }

    /// Adds a property (name, value) to pre-seed the record with
    /// * This method can be called multiple times, the last value for a name wins
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Use a fixed timestamp (milliseconds since the epoch) instead of the clock at encode time
    ///
    /// Mainly useful for reproducible output in tests
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn build(self) -> EmbeddedMetric {
        EmbeddedMetric::from_parts(
            self.environment.unwrap_or_else(Environment::global),
            self.properties,
            self.timestamp,
        )
    }
}
