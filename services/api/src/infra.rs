use chrono::{DateTime, Utc};
use donor_ledger::workflows::ledger::parse_datetime;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Accepts a bare date (midnight UTC) or any timestamp the upstream sources use.
pub(crate) fn parse_reference_time(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_datetime(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' as YYYY-MM-DD or an RFC 3339 timestamp")
    })
}
