use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single sampled metric value.
///
/// Counters accumulate within a sampling cycle and always carry a value
/// (zero when nothing was observed). Gauges are point-in-time readings
/// and may be unavailable on a given host or tick, which the exporter
/// renders as the conventional `-1.00`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum MetricValue {
    Counter(f64),
    Gauge(Option<f64>),
}

impl MetricValue {
    /// The numeric value, or `None` for an unavailable gauge.
    pub fn current(&self) -> Option<f64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            MetricValue::Gauge(v) => *v,
        }
    }

    /// Statsd type tag: `c` for counters, `g` for gauges.
    pub fn type_tag(&self) -> char {
        match self {
            MetricValue::Counter(_) => 'c',
            MetricValue::Gauge(_) => 'g',
        }
    }
}

/// All metric values observed in one sampling tick, keyed by dotted
/// metric path (e.g. `host.load.1`, `memcached.cpu.user`).
///
/// Backed by a `BTreeMap` so iteration order is the export order:
/// lexicographic by path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSnapshot {
    values: BTreeMap<String, MetricValue>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: impl Into<String>, value: MetricValue) {
        self.values.insert(path.into(), value);
    }

    pub fn counter(&mut self, path: impl Into<String>, value: f64) {
        self.set(path, MetricValue::Counter(value));
    }

    pub fn gauge(&mut self, path: impl Into<String>, value: Option<f64>) {
        self.set(path, MetricValue::Gauge(value));
    }

    pub fn get(&self, path: &str) -> Option<MetricValue> {
        self.values.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in export order (lexicographic by path).
    pub fn iter(&self) -> impl Iterator<Item = (&str, MetricValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Source of current metric values for one sampling tick.
///
/// Absence of a metric is not an error at this boundary; it is signaled
/// by `None` and the evaluator downgrades the affected condition to
/// an unknown result.
pub trait MetricSource {
    fn current_value(&self, path: &str) -> Option<f64>;
}

impl MetricSource for MetricSnapshot {
    fn current_value(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(|v| v.current())
    }
}
