use crate::core::WorkloadKind;
use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

/// Counts admission decisions by workload kind.
#[derive(Clone, Debug)]
pub struct Metrics {
    reviews: Family<Labels, Counter>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    Allowed,
    Denied,
    FailedOpen,
}

#[derive(Clone, Hash, PartialEq, Eq, EncodeLabelSet, Debug)]
struct Labels {
    kind: &'static str,
    decision: &'static str,
}

// === impl Metrics ===

impl Metrics {
    pub fn register(reg: &mut Registry) -> Self {
        let reviews = Family::<Labels, Counter>::default();
        reg.register(
            "reviews",
            "Total number of workload admission reviews by decision",
            reviews.clone(),
        );
        Self { reviews }
    }

    pub(crate) fn record(&self, kind: WorkloadKind, decision: Decision) {
        self.reviews.get_or_create(&Labels::new(kind, decision)).inc();
    }

    #[cfg(test)]
    pub(crate) fn count(&self, kind: WorkloadKind, decision: Decision) -> u64 {
        self.reviews.get_or_create(&Labels::new(kind, decision)).get()
    }
}

impl Labels {
    fn new(kind: WorkloadKind, decision: Decision) -> Self {
        let decision = match decision {
            Decision::Allowed => "allowed",
            Decision::Denied => "denied",
            Decision::FailedOpen => "failed_open",
        };
        Self {
            kind: kind.as_label(),
            decision,
        }
    }
}
