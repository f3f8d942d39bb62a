//! # Embedded Metric
//!
//! A single structured log record: a flat property bag plus the `_aws` directive
//! telling CloudWatch which of those keys are metrics and which are dimensions

use super::directive::{DirectiveId, MetricDirective, MAX_DIMENSIONS};
use super::emf;
use super::environment::Environment;
use super::Builder;
use serde_json::value::{Map, Value};
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, warn};

/// Source of the owner id tying [DirectiveId] handles to the record that issued them
static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Embedded metric record, built up and then published as one line
///
/// Not synchronized, wrap it in a lock if several threads contribute to one record
///
/// # Example
/// ```
/// use emf_structured_metrics::{EmbeddedMetric, Unit};
///
/// let mut metric = EmbeddedMetric::new();
/// metric.with_property("requestId", "abc-123");
///
/// let id = metric.new_metric_directive("MyService", [("Stage", "prod")]);
/// metric[id].put_metric("Latency", 42, Unit::Milliseconds);
///
/// let mut output = Vec::new();
/// metric.publish_to_sink([("traceId", "1-5759e988")], &mut output);
/// assert!(output.ends_with(b"\n"));
/// ```
#[derive(Debug)]
pub struct EmbeddedMetric {
    owner: u64,
    directives: Vec<MetricDirective>,
    properties: BTreeMap<String, Value>,
    environment: Arc<Environment>,
    timestamp: Option<u64>,
}

impl Default for EmbeddedMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedMetric {
    /// Empty record reading the reserved log fields from [Environment::global]
    pub fn new() -> Self {
        Self::from_parts(Environment::global(), BTreeMap::new(), None)
    }

    /// Record pre-seeded with properties
    pub fn with_properties<K, V>(properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut metric = Self::new();
        for (key, value) in properties {
            metric.with_property(key, value);
        }
        metric
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn from_parts(
        environment: Arc<Environment>,
        properties: BTreeMap<String, Value>,
        timestamp: Option<u64>,
    ) -> Self {
        Self {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            directives: Vec::new(),
            properties,
            environment,
            timestamp,
        }
    }

    /// Set a property to emit with the metrics
    /// * Properties should be used for high cardinality values that need to be searchable
    /// * Setting a property with same name multiple times will overwrite the previous value
    pub fn with_property(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Create a new directive owned by this record and return its handle
    /// * The namespace isn't validated, an empty namespace is emitted as is
    pub fn new_metric_directive<K, V>(
        &mut self,
        namespace: impl Into<String>,
        dimensions: impl IntoIterator<Item = (K, V)>,
    ) -> DirectiveId
    where
        K: Into<String>,
        V: Into<String>,
    {
        let dimensions = dimensions.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.directives.push(MetricDirective::new(namespace.into(), dimensions));
        DirectiveId {
            owner: self.owner,
            index: self.directives.len() - 1,
        }
    }

    /// Look up a directive, `None` if the handle was issued by another record
    pub fn directive(&self, id: DirectiveId) -> Option<&MetricDirective> {
        if id.owner != self.owner {
            return None;
        }
        self.directives.get(id.index)
    }

    pub fn directive_mut(&mut self, id: DirectiveId) -> Option<&mut MetricDirective> {
        if id.owner != self.owner {
            return None;
        }
        self.directives.get_mut(id.index)
    }

    /// Directives in creation order
    pub fn directives(&self) -> &[MetricDirective] {
        &self.directives
    }

    /// Compute the timestamp unless it was set via [Builder::with_timestamp]
    fn timestamp(&self) -> u64 {
        match self.timestamp {
            Some(t) => t,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
        }
    }

    /// Flatten the record into a single ordered JSON object
    ///
    /// Fails if a metric value has no JSON representation (NaN or infinite)
    ///
    /// Keys are merged in a fixed order and a later write replaces an earlier one:
    /// reserved log fields, properties, metric values then dimension values of each
    /// directive in creation order. `_aws` is always last.
    pub fn to_value(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut document = Map::new();
        document.insert(emf::LOG_GROUP_NAME_KEY.into(), self.environment.log_group_name().into());
        document.insert(emf::LOG_STREAM_NAME_KEY.into(), self.environment.log_stream_name().into());

        for (key, value) in &self.properties {
            document.insert(key.clone(), value.clone());
        }

        let mut aws = emf::EmbeddedMetricsAws {
            timestamp: self.timestamp(),
            cloudwatch_metrics: Vec::with_capacity(self.directives.len()),
        };

        for directive in &self.directives {
            let mut namespace = emf::EmbeddedNamespace {
                namespace: directive.namespace(),
                dimensions: Vec::with_capacity(directive.dimension_count()),
                metrics: Vec::with_capacity(directive.metrics().len()),
            };

            for (name, metric) in directive.metrics() {
                document.insert(name.clone(), metric.value.to_json()?);
                namespace.metrics.push(emf::EmbeddedMetricDefinition {
                    name,
                    unit: metric.unit,
                });
            }

            for (name, value) in directive.dimensions() {
                document.insert(name.clone(), value.as_str().into());
                namespace.dimensions.push([name.as_str()]);
            }

            aws.cloudwatch_metrics.push(namespace);
        }

        // Re-inserting would keep the slot of a colliding user key, so remove first
        document.shift_remove(emf::AWS_KEY);
        document.insert(emf::AWS_KEY.into(), serde_json::to_value(&aws)?);
        Ok(document)
    }

    /// Encode the record as a single line of compact JSON
    ///
    /// Line breaks inside values are escaped, so the output never spans lines
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_value()?)
    }

    /// Merge additional properties and write the record to an implementation of [std::io::Write]
    ///
    /// Failures are never returned to the caller:
    /// * A directive with more than [MAX_DIMENSIONS] dimensions is logged as a warning and emitted anyway
    /// * An encoding failure writes an error line to the sink in place of the record
    /// * A failed write is logged
    pub fn publish_to_sink<K, V>(
        &mut self,
        additional_properties: impl IntoIterator<Item = (K, V)>,
        mut sink: impl std::io::Write,
    ) where
        K: Into<String>,
        V: Into<Value>,
    {
        for directive in &self.directives {
            if directive.dimension_count() > MAX_DIMENSIONS {
                warn!(
                    namespace = directive.namespace(),
                    count = directive.dimension_count(),
                    limit = MAX_DIMENSIONS,
                    "DimensionSet for structured metric must not have more than {MAX_DIMENSIONS} elements"
                );
            }
        }

        for (key, value) in additional_properties {
            self.with_property(key, value);
        }

        let line = match self.encode() {
            Ok(line) => line,
            Err(err) => {
                error!("Failed to encode embedded metric: {err}");
                format!("Error publishing metric: {err}")
            }
        };

        debug!(bytes = line.len(), directives = self.directives.len(), "publishing embedded metric");

        if let Err(err) = writeln!(sink, "{line}").and_then(|_| sink.flush()) {
            error!("Failed to write embedded metric: {err}");
        }
    }

    /// Merge additional properties and write the record to stdout
    pub fn publish<K, V>(&mut self, additional_properties: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.publish_to_sink(additional_properties, std::io::stdout().lock());
    }
}

impl Index<DirectiveId> for EmbeddedMetric {
    type Output = MetricDirective;

    fn index(&self, id: DirectiveId) -> &Self::Output {
        self.directive(id)
            .unwrap_or_else(|| panic!("{id:?} was not issued by this EmbeddedMetric"))
    }
}

impl IndexMut<DirectiveId> for EmbeddedMetric {
    fn index_mut(&mut self, id: DirectiveId) -> &mut Self::Output {
        self.directive_mut(id)
            .unwrap_or_else(|| panic!("{id:?} was not issued by this EmbeddedMetric"))
    }
}
