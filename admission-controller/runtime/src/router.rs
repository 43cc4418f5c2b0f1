use crate::{
    core::{EngineConfig, Scan, WorkloadKind},
    Engine, Metrics,
};
use std::sync::Arc;

/// Minimum accepted scores, per workload kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub pod: i64,
    pub deployment: i64,
    pub daemonset: i64,
    pub statefulset: i64,
}

/// Holds a decision engine for each workload kind.
#[derive(Debug)]
pub struct Router<S> {
    pod: Engine<S>,
    deployment: Engine<S>,
    daemonset: Engine<S>,
    statefulset: Engine<S>,
}

// === impl Thresholds ===

impl Thresholds {
    /// Applies the same minimum score to all kinds.
    pub fn uniform(minimum_score: i64) -> Self {
        Self {
            pod: minimum_score,
            deployment: minimum_score,
            daemonset: minimum_score,
            statefulset: minimum_score,
        }
    }

    pub fn get(&self, kind: WorkloadKind) -> i64 {
        match kind {
            WorkloadKind::Pod => self.pod,
            WorkloadKind::Deployment => self.deployment,
            WorkloadKind::DaemonSet => self.daemonset,
            WorkloadKind::StatefulSet => self.statefulset,
        }
    }

    fn config(&self, kind: WorkloadKind) -> EngineConfig {
        EngineConfig {
            kind,
            minimum_score: self.get(kind),
        }
    }
}

// === impl Router ===

impl<S> Router<S>
where
    S: Scan + Send + Sync,
{
    pub fn new(scanner: Arc<S>, thresholds: Thresholds, metrics: Metrics) -> Self {
        let engine = |kind| Engine::new(thresholds.config(kind), scanner.clone(), metrics.clone());
        Self {
            pod: engine(WorkloadKind::Pod),
            deployment: engine(WorkloadKind::Deployment),
            daemonset: engine(WorkloadKind::DaemonSet),
            statefulset: engine(WorkloadKind::StatefulSet),
        }
    }

    pub fn engine(&self, kind: WorkloadKind) -> &Engine<S> {
        match kind {
            WorkloadKind::Pod => &self.pod,
            WorkloadKind::Deployment => &self.deployment,
            WorkloadKind::DaemonSet => &self.daemonset,
            WorkloadKind::StatefulSet => &self.statefulset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ScoreRequest, ScoreResult};
    use prometheus_client::registry::Registry;

    struct NoScan;

    #[async_trait::async_trait]
    impl Scan for NoScan {
        async fn scan(&self, _: &ScoreRequest) -> anyhow::Result<Vec<ScoreResult>> {
            anyhow::bail!("not scanning")
        }
    }

    #[test]
    fn engines_are_configured_per_kind() {
        let thresholds = Thresholds {
            pod: 5,
            deployment: 3,
            ..Thresholds::uniform(-1)
        };
        let metrics = Metrics::register(&mut Registry::default());
        let router = Router::new(Arc::new(NoScan), thresholds, metrics);

        for (kind, minimum_score) in [
            (WorkloadKind::Pod, 5),
            (WorkloadKind::Deployment, 3),
            (WorkloadKind::DaemonSet, -1),
            (WorkloadKind::StatefulSet, -1),
        ] {
            let expected = EngineConfig {
                kind,
                minimum_score,
            };
            assert_eq!(router.engine(kind).config(), &expected);
        }
    }
}
