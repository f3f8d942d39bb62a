//! # Unit
//!
//! Closed set of measurement units accepted by CloudWatch
//!
//! <https://docs.aws.amazon.com/AmazonCloudWatch/latest/APIReference/API_MetricDatum.html>

use super::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Unit label attached to a metric value, serialized as its CloudWatch token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Unit {
    Seconds,
    Microseconds,
    Milliseconds,
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
    Terabytes,
    Bits,
    Kilobits,
    Megabits,
    Gigabits,
    Terabits,
    Percent,
    Count,
    #[serde(rename = "Bytes/Second")]
    BytesPerSecond,
    #[serde(rename = "Kilobytes/Second")]
    KilobytesPerSecond,
    #[serde(rename = "Megabytes/Second")]
    MegabytesPerSecond,
    #[serde(rename = "Gigabytes/Second")]
    GigabytesPerSecond,
    #[serde(rename = "Terabytes/Second")]
    TerabytesPerSecond,
    #[serde(rename = "Bits/Second")]
    BitsPerSecond,
    #[serde(rename = "Kilobits/Second")]
    KilobitsPerSecond,
    #[serde(rename = "Megabits/Second")]
    MegabitsPerSecond,
    #[serde(rename = "Gigabits/Second")]
    GigabitsPerSecond,
    #[serde(rename = "Terabits/Second")]
    TerabitsPerSecond,
    #[serde(rename = "Count/Second")]
    CountPerSecond,
    #[default]
    None,
}

impl Unit {
    /// Every unit, in declaration order
    pub const ALL: [Unit; 27] = [
        Unit::Seconds,
        Unit::Microseconds,
        Unit::Milliseconds,
        Unit::Bytes,
        Unit::Kilobytes,
        Unit::Megabytes,
        Unit::Gigabytes,
        Unit::Terabytes,
        Unit::Bits,
        Unit::Kilobits,
        Unit::Megabits,
        Unit::Gigabits,
        Unit::Terabits,
        Unit::Percent,
        Unit::Count,
        Unit::BytesPerSecond,
        Unit::KilobytesPerSecond,
        Unit::MegabytesPerSecond,
        Unit::GigabytesPerSecond,
        Unit::TerabytesPerSecond,
        Unit::BitsPerSecond,
        Unit::KilobitsPerSecond,
        Unit::MegabitsPerSecond,
        Unit::GigabitsPerSecond,
        Unit::TerabitsPerSecond,
        Unit::CountPerSecond,
        Unit::None,
    ];

    /// The token written to the `Unit` field of a metric definition
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Seconds => "Seconds",
            Unit::Microseconds => "Microseconds",
            Unit::Milliseconds => "Milliseconds",
            Unit::Bytes => "Bytes",
            Unit::Kilobytes => "Kilobytes",
            Unit::Megabytes => "Megabytes",
            Unit::Gigabytes => "Gigabytes",
            Unit::Terabytes => "Terabytes",
            Unit::Bits => "Bits",
            Unit::Kilobits => "Kilobits",
            Unit::Megabits => "Megabits",
            Unit::Gigabits => "Gigabits",
            Unit::Terabits => "Terabits",
            Unit::Percent => "Percent",
            Unit::Count => "Count",
            Unit::BytesPerSecond => "Bytes/Second",
            Unit::KilobytesPerSecond => "Kilobytes/Second",
            Unit::MegabytesPerSecond => "Megabytes/Second",
            Unit::GigabytesPerSecond => "Gigabytes/Second",
            Unit::TerabytesPerSecond => "Terabytes/Second",
            Unit::BitsPerSecond => "Bits/Second",
            Unit::KilobitsPerSecond => "Kilobits/Second",
            Unit::MegabitsPerSecond => "Megabits/Second",
            Unit::GigabitsPerSecond => "Gigabits/Second",
            Unit::TerabitsPerSecond => "Terabits/Second",
            Unit::CountPerSecond => "Count/Second",
            Unit::None => "None",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .iter()
            .find(|unit| unit.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown unit {s:?}").into())
    }
}

/// Convert a metrics::Unit into the matching CloudWatch unit
///
/// Binary prefixed byte units map onto the decimal named CloudWatch tokens.
/// Nanoseconds have no CloudWatch counterpart.
impl TryFrom<metrics::Unit> for Unit {
    type Error = Error;

    fn try_from(unit: metrics::Unit) -> Result<Self, Self::Error> {
        // Match on the label so the mapping doesn't depend on variant spellings
        match unit.as_str() {
            "count" => Ok(Unit::Count),
            "percent" => Ok(Unit::Percent),
            "seconds" => Ok(Unit::Seconds),
            "milliseconds" => Ok(Unit::Milliseconds),
            "microseconds" => Ok(Unit::Microseconds),
            "tebibytes" => Ok(Unit::Terabytes),
            "gibibytes" | "gigibytes" => Ok(Unit::Gigabytes),
            "mebibytes" => Ok(Unit::Megabytes),
            "kibibytes" => Ok(Unit::Kilobytes),
            "bytes" => Ok(Unit::Bytes),
            "terabits_per_second" => Ok(Unit::TerabitsPerSecond),
            "gigabits_per_second" => Ok(Unit::GigabitsPerSecond),
            "megabits_per_second" => Ok(Unit::MegabitsPerSecond),
            "kilobits_per_second" => Ok(Unit::KilobitsPerSecond),
            "bits_per_second" => Ok(Unit::BitsPerSecond),
            "count_per_second" => Ok(Unit::CountPerSecond),
            other => Err(format!("no CloudWatch unit for {other}").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_token() {
        for unit in Unit::ALL {
            assert_eq!(serde_json::to_string(&unit).unwrap(), format!("\"{}\"", unit.as_str()));
        }
    }

    #[test]
    fn parse_tokens() {
        assert_eq!("Count/Second".parse::<Unit>().unwrap(), Unit::CountPerSecond);
        assert_eq!("None".parse::<Unit>().unwrap(), Unit::None);
        assert!("Nanoseconds".parse::<Unit>().is_err());
        assert!("count".parse::<Unit>().is_err());
    }

    #[test]
    fn from_metrics_unit() {
        assert_eq!(Unit::try_from(metrics::Unit::Milliseconds).unwrap(), Unit::Milliseconds);
        assert_eq!(Unit::try_from(metrics::Unit::Kibibytes).unwrap(), Unit::Kilobytes);
        assert_eq!(Unit::try_from(metrics::Unit::BitsPerSecond).unwrap(), Unit::BitsPerSecond);
        assert!(Unit::try_from(metrics::Unit::Nanoseconds).is_err());
    }
}
