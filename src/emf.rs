//! # EMF
//!
//! Helpers for serializing the `_aws` metadata of CloudWatch Embedded Metrics via serde_json
//!
//! <https://docs.aws.amazon.com/AmazonCloudWatch/latest/monitoring/CloudWatch_Embedded_Metric_Format_Specification.html>

use super::Unit;
use serde::Serialize;

/// Top level key the CloudWatch agent requires to route the record to a log group
pub const LOG_GROUP_NAME_KEY: &str = "log_group_name";

/// Top level key carrying the log stream identity
///
/// The misspelling is the literal downstream parsers have always received
pub const LOG_STREAM_NAME_KEY: &str = "log_steam_name";

/// Top level key holding the metadata block
pub const AWS_KEY: &str = "_aws";

#[derive(Serialize)]
pub struct EmbeddedMetricsAws<'a> {
    #[serde(rename = "Timestamp")]
    pub timestamp: u64,
    #[serde(rename = "CloudWatchMetrics")]
    pub cloudwatch_metrics: Vec<EmbeddedNamespace<'a>>,
}

#[derive(Serialize)]
pub struct EmbeddedNamespace<'a> {
    #[serde(rename = "Namespace")]
    pub namespace: &'a str,
    // One dimension set per dimension name, never grouped
    #[serde(rename = "Dimensions")]
    pub dimensions: Vec<[&'a str; 1]>,
    #[serde(rename = "Metrics")]
    pub metrics: Vec<EmbeddedMetricDefinition<'a>>,
}

#[derive(Serialize)]
pub struct EmbeddedMetricDefinition<'a> {
    #[serde(rename = "Name")]
    pub name: &'a str,
    #[serde(rename = "Unit")]
    pub unit: Unit,
}

#[allow(unused_imports)]
mod tests {
    use super::*;

    #[test]
    fn embedded_metrics_aws() {
        let aws = EmbeddedMetricsAws {
            timestamp: 1687394207903,
            cloudwatch_metrics: vec![EmbeddedNamespace {
                namespace: "GameServerMetrics",
                dimensions: vec![["Address"], ["Port"]],
                metrics: vec![
                    EmbeddedMetricDefinition {
                        name: "FrameTime",
                        unit: Unit::Milliseconds,
                    },
                    EmbeddedMetricDefinition {
                        name: "Throughput",
                        unit: Unit::KilobytesPerSecond,
                    },
                ],
            }],
        };

        assert_eq!(
            serde_json::to_string(&aws).unwrap(),
            r#"{"Timestamp":1687394207903,"CloudWatchMetrics":[{"Namespace":"GameServerMetrics","Dimensions":[["Address"],["Port"]],"Metrics":[{"Name":"FrameTime","Unit":"Milliseconds"},{"Name":"Throughput","Unit":"Kilobytes/Second"}]}]}"#
        );
    }

    #[test]
    fn empty_metadata() {
        let aws = EmbeddedMetricsAws {
            timestamp: 0,
            cloudwatch_metrics: Vec::new(),
        };

        assert_eq!(
            serde_json::to_string(&aws).unwrap(),
            r#"{"Timestamp":0,"CloudWatchMetrics":[]}"#
        );
    }
}
