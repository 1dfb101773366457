//! Metrics emission seam

use std::collections::HashMap;
use std::time::Duration;

/// Metric tags (e.g. `table`, `dialect`)
pub type Tags = HashMap<String, String>;

/// Sink for operational metrics.
///
/// Implementations must be cheap to call from the flush path and must not
/// fail; a provider that cannot deliver a metric drops it.
pub trait MetricsProvider: Send + Sync {
    /// Record a point-in-time value
    fn gauge(&self, name: &str, value: f64, tags: &Tags);

    /// Add `value` to a counter
    fn count(&self, name: &str, value: i64, tags: &Tags);

    /// Record a duration
    fn timing(&self, name: &str, value: Duration, tags: &Tags);

    /// Increment a counter by one
    fn incr(&self, name: &str, tags: &Tags) {
        self.count(name, 1, tags);
    }
}

/// Provider that discards every metric.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMetricsProvider;

impl MetricsProvider for NullMetricsProvider {
    fn gauge(&self, _name: &str, _value: f64, _tags: &Tags) {}

    fn count(&self, _name: &str, _value: i64, _tags: &Tags) {}

    fn timing(&self, _name: &str, _value: Duration, _tags: &Tags) {}
}

/// Build a tag map from `(key, value)` pairs.
pub fn tags<const N: usize>(pairs: [(&str, &str); N]) -> Tags {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
