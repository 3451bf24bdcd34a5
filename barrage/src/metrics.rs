//! Per-outcome counters recorded through the `metrics` facade.
//!
//! Nothing is exported unless the embedding application installs a recorder.
use crate::data::RequestOutcome;

#[derive(Copy, Clone, Debug)]
pub struct OutcomeLabels {
    pub success: &'static str,
    pub error: &'static str,
    pub latency: &'static str,
}

pub const OUTCOME_LABELS: OutcomeLabels = OutcomeLabels {
    success: "barrage_success",
    error: "barrage_error",
    latency: "barrage_latency",
};

#[allow(unused_variables)]
pub(crate) fn record(labels: OutcomeLabels, outcome: &RequestOutcome) {
    #[cfg(feature = "metrics")]
    {
        ::metrics::describe_histogram!(labels.latency, ::metrics::Unit::Nanoseconds, "");
        ::metrics::histogram!(labels.latency).record(outcome.latency_ms * 1_000_000.);

        if outcome.success {
            ::metrics::counter!(labels.success).increment(1);
        } else {
            ::metrics::counter!(labels.error).increment(1);
        }
    }
}
