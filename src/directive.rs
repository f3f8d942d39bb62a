//! # Directive
//!
//! One namespace worth of dimensions and metric values inside an [EmbeddedMetric](super::EmbeddedMetric)

use super::Unit;
use serde_json::value::Value;
use std::collections::BTreeMap;

/// CloudWatch accepts no more than 9 dimensions in a dimension set
pub const MAX_DIMENSIONS: usize = 9;

/// Raw value of a metric, kept as recorded until the record is encoded
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Floating point value, rejected at encode time unless finite
    Float(f64),
    Json(Value),
}

impl Scalar {
    /// JSON representation for the flat top level of the record
    /// * NaN and infinite values can't be represented in JSON and fail to encode
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            Scalar::Float(value) if value.is_finite() => Ok(Value::from(*value)),
            Scalar::Float(value) => Err(serde::ser::Error::custom(format!("unsupported value: {value}"))),
            Scalar::Json(value) => Ok(value.clone()),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value.into())
    }
}

macro_rules! scalar_from_json {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(value: $t) -> Self {
                    Scalar::Json(value.into())
                }
            }
        )*
    };
}

scalar_from_json!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, bool, String, &str, Value);

/// A recorded value along with its unit
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub value: Scalar,
    pub unit: Unit,
}

impl MetricValue {
    pub fn new(value: impl Into<Scalar>, unit: Unit) -> Self {
        Self {
            value: value.into(),
            unit,
        }
    }
}

/// Handle to a [MetricDirective] owned by an [EmbeddedMetric](super::EmbeddedMetric)
///
/// Only the EmbeddedMetric that issued a handle resolves it. Directives are never
/// removed, so a handle stays valid for the life of that EmbeddedMetric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectiveId {
    pub(crate) owner: u64,
    pub(crate) index: usize,
}

/// Named group of dimensions and metrics under a single CloudWatch namespace
///
/// Create with [EmbeddedMetric::new_metric_directive](super::EmbeddedMetric::new_metric_directive)
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDirective {
    namespace: String,
    dimensions: BTreeMap<String, String>,
    metrics: BTreeMap<String, MetricValue>,
}

impl MetricDirective {
    pub(crate) fn new(namespace: String, dimensions: BTreeMap<String, String>) -> Self {
        Self {
            namespace,
            dimensions,
            metrics: BTreeMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn dimensions(&self) -> &BTreeMap<String, String> {
        &self.dimensions
    }

    pub fn metrics(&self) -> &BTreeMap<String, MetricValue> {
        &self.metrics
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Record a metric value, overwriting any previous value with the same name
    /// * Metric names share the flat top level of the record with properties and dimensions
    pub fn put_metric(&mut self, name: impl Into<String>, value: impl Into<Scalar>, unit: Unit) -> &mut Self {
        self.metrics.insert(name.into(), MetricValue::new(value, unit));
        self
    }

    /// Adds a dimension (name, value), overwriting any previous value with the same name
    /// * More than [MAX_DIMENSIONS] is reported when published but still emitted
    pub fn put_dimension(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.dimensions.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn put_overwrites() {
        let mut directive = MetricDirective::new("Service".into(), BTreeMap::new());
        directive
            .put_metric("Latency", 10, Unit::Milliseconds)
            .put_metric("Latency", 12.5, Unit::Seconds)
            .put_dimension("Stage", "beta")
            .put_dimension("Stage", "prod");

        assert_eq!(directive.metrics().len(), 1);
        assert_eq!(directive.metrics()["Latency"], MetricValue::new(12.5, Unit::Seconds));
        assert_eq!(directive.dimension_count(), 1);
        assert_eq!(directive.dimensions()["Stage"], "prod");
    }

    #[test]
    fn scalar_to_json() {
        assert_eq!(Scalar::from(42).to_json().unwrap(), json!(42));
        assert_eq!(Scalar::from(0.25f32).to_json().unwrap(), json!(0.25));
        assert_eq!(Scalar::from("ok").to_json().unwrap(), json!("ok"));
        assert_eq!(Scalar::from(json!([1.0, 2.0])).to_json().unwrap(), json!([1.0, 2.0]));

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Scalar::from(value).to_json().unwrap_err();
            assert!(err.to_string().contains("unsupported value"), "{err}");
        }
    }
}
