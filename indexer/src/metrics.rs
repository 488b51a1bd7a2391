//! Prometheus metrics for the indexer.
//!
//! [`IndexerMetrics`] owns a dedicated [`Registry`] that the RPC `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

pub struct IndexerMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Blocks whose events were applied and whose cursor was persisted.
    pub blocks_processed: IntCounter,
    /// Block attempts that failed and will be retried.
    pub block_failures: IntCounter,
    /// Program events applied to the tree or the durable log.
    pub events_applied: IntCounter,
    /// Program events dropped as malformed or referring to unknown proposals.
    pub events_dropped: IntCounter,
    /// Times the cursor was stepped back because it was ahead of the chain.
    pub cursor_corrections: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub next_height: IntGauge,
    pub chain_head: IntGauge,
    pub leaf_count: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time to fetch and apply one block, in milliseconds.
    pub block_process_time_ms: Histogram,
}

impl IndexerMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let blocks_processed = register_int_counter_with_registry!(
            Opts::new("shadow_blocks_processed_total", "Blocks fully processed"),
            registry
        )?;
        let block_failures = register_int_counter_with_registry!(
            Opts::new(
                "shadow_block_failures_total",
                "Block processing attempts that failed and will be retried"
            ),
            registry
        )?;
        let events_applied = register_int_counter_with_registry!(
            Opts::new("shadow_events_applied_total", "Program events applied"),
            registry
        )?;
        let events_dropped = register_int_counter_with_registry!(
            Opts::new(
                "shadow_events_dropped_total",
                "Program events dropped as malformed or unresolvable"
            ),
            registry
        )?;
        let cursor_corrections = register_int_counter_with_registry!(
            Opts::new(
                "shadow_cursor_corrections_total",
                "Cursor rewinds after the chain head fell behind it"
            ),
            registry
        )?;

        let next_height = register_int_gauge_with_registry!(
            Opts::new("shadow_next_height", "Next block height to process"),
            registry
        )?;
        let chain_head = register_int_gauge_with_registry!(
            Opts::new("shadow_chain_head", "Last observed chain head"),
            registry
        )?;
        let leaf_count = register_int_gauge_with_registry!(
            Opts::new("shadow_leaf_count", "Accounts in the commitment tree"),
            registry
        )?;

        // 0.5 ms .. ~8 s
        let block_process_time_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "shadow_block_process_time_ms",
                "Block processing time in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.5, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            blocks_processed,
            block_failures,
            events_applied,
            events_dropped,
            cursor_corrections,
            next_height,
            chain_head,
            leaf_count,
            block_process_time_ms,
        })
    }

    /// Prometheus text exposition of every metric in the registry.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Saturating conversion for gauges.
pub(crate) fn gauge_value(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_registered_metrics() {
        let metrics = IndexerMetrics::new().unwrap();
        metrics.blocks_processed.inc();
        metrics.chain_head.set(990);
        let text = metrics.encode().unwrap();
        assert!(text.contains("shadow_blocks_processed_total 1"));
        assert!(text.contains("shadow_chain_head 990"));
        assert!(text.contains("shadow_block_process_time_ms_bucket"));
    }

    #[test]
    fn gauge_saturates() {
        assert_eq!(gauge_value(5), 5);
        assert_eq!(gauge_value(u64::MAX), i64::MAX);
    }
}
