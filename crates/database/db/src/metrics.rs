use metrics::Histogram;
use metrics_derive::Metrics;

/// The metrics for the [`super::Database`].
#[derive(Metrics, Clone)]
#[metrics(scope = "database")]
pub(crate) struct DatabaseMetrics {
    /// Time (s) to read a value.
    #[metric(describe = "Time to read a value from the database (s)")]
    pub(crate) read_duration: Histogram,
    /// Time (s) to write a value.
    #[metric(describe = "Time to write a value to the database (s)")]
    pub(crate) write_duration: Histogram,
}
