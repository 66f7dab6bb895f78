//! Shared metric types for the svcmon workspace.
//!
//! A [`types::MetricSnapshot`] is the unit of exchange between the
//! agent's collectors, the rule evaluator, and the statsd exporter:
//! an ordered map from dotted metric path to the current
//! [`types::MetricValue`] for one sampling tick.

pub mod types;

#[cfg(test)]
mod tests;
