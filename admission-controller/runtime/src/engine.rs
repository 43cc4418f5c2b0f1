use crate::{
    core::{score, EngineConfig, Scan, ScoreError, Verdict},
    k8s::{normalize, NormalizeError, WorkloadResource},
    metrics::{Decision, Metrics},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Scores workloads of a single kind and decides whether to admit them.
///
/// Only a successfully computed score below the configured minimum denies a
/// workload. Any failure to compute a score admits it.
#[derive(Debug)]
pub struct Engine<S> {
    config: EngineConfig,
    scanner: Arc<S>,
    metrics: Metrics,
}

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("failed to format scan result: {0}")]
    Present(#[source] serde_json::Error),

    #[error("{name} score is {score}, minimum accepted score is {minimum}\nScan Result:\n{report}")]
    Policy {
        name: String,
        score: i64,
        minimum: i64,
        report: String,
    },
}

// === impl Engine ===

impl<S> Engine<S>
where
    S: Scan + Send + Sync,
{
    pub fn new(config: EngineConfig, scanner: Arc<S>, metrics: Metrics) -> Self {
        Self {
            config,
            scanner,
            metrics,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn admit(&self, workload: &WorkloadResource) -> Verdict {
        if workload.kind() != self.config.kind {
            debug!(
                kind = %workload.kind(),
                expected = %self.config.kind,
                "Skipping workload of another kind"
            );
            return Verdict::allow();
        }

        let res = self.evaluate(workload).await;
        self.classify(workload, res)
    }

    async fn evaluate(&self, workload: &WorkloadResource) -> Result<(), Error> {
        let req = normalize(workload)?;

        info!(kind = %req.kind, ns = ?req.namespace, name = %req.name, "Scanning");
        let result = score::score(&*self.scanner, &req).await?;

        // The denial message carries the same list the scanner returned.
        let report =
            serde_json::to_string_pretty(std::slice::from_ref(&result)).map_err(Error::Present)?;
        debug!(name = %req.name, "Scan result:\n{report}");

        if result.score < self.config.minimum_score {
            return Err(Error::Policy {
                name: req.name,
                score: result.score,
                minimum: self.config.minimum_score,
                report,
            });
        }

        Ok(())
    }

    fn classify(&self, workload: &WorkloadResource, res: Result<(), Error>) -> Verdict {
        let kind = self.config.kind;
        match res {
            Ok(()) => {
                self.metrics.record(kind, Decision::Allowed);
                Verdict::allow()
            }
            Err(error @ Error::Policy { .. }) => {
                info!(%kind, name = %workload.name(), "Denied");
                self.metrics.record(kind, Decision::Denied);
                Verdict::deny(error.to_string())
            }
            Err(error) => {
                error!(%error, %kind, name = %workload.name(), "Scan failed, admitting workload");
                self.metrics.record(kind, Decision::FailedOpen);
                Verdict::allow()
            }
        }
    }
}
