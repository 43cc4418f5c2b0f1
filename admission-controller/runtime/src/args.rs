use crate::{kubesec, Admission, Metrics, Router, Thresholds};
use anyhow::{bail, Result};
use clap::Parser;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::info;

#[derive(Debug, Parser)]
#[clap(
    name = "kubesec-admission-controller",
    about = "Admits workloads that meet a minimum kubesec score"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "kubesec=info,warn",
        env = "KUBESEC_ADMISSION_CONTROLLER_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    server: kubert::ServerArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    /// The minimum score a workload must have to be admitted.
    #[clap(long, default_value = "0", allow_negative_numbers = true)]
    min_score: i64,

    /// Overrides `--min-score` for pods.
    #[clap(long, allow_negative_numbers = true)]
    pod_min_score: Option<i64>,

    /// Overrides `--min-score` for deployments.
    #[clap(long, allow_negative_numbers = true)]
    deployment_min_score: Option<i64>,

    /// Overrides `--min-score` for daemonsets.
    #[clap(long, allow_negative_numbers = true)]
    daemonset_min_score: Option<i64>,

    /// Overrides `--min-score` for statefulsets.
    #[clap(long, allow_negative_numbers = true)]
    statefulset_min_score: Option<i64>,

    #[clap(long, default_value = kubesec::DEFAULT_URL)]
    kubesec_url: String,

    /// Bounds each scan request. Workloads are admitted when a scan times out.
    #[clap(long, default_value = "10000")]
    kubesec_timeout_ms: u64,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let thresholds = self.thresholds();
        let Self {
            admin,
            client,
            log_level,
            log_format,
            server,
            kubesec_url,
            kubesec_timeout_ms,
            ..
        } = self;

        let scanner = Arc::new(kubesec::Client::new(
            &kubesec_url,
            Duration::from_millis(kubesec_timeout_ms),
        )?);

        let mut prom = <Registry>::default();
        let metrics = Metrics::register(prom.sub_registry_with_prefix("admission"));
        let rt_metrics = kubert::RuntimeMetrics::register(prom.sub_registry_with_prefix("kube"));

        let runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_metrics(rt_metrics)
            .with_admin(admin.into_builder().with_prometheus(prom))
            .with_client(client)
            .with_optional_server(Some(server))
            .build()
            .await?;

        let router = Arc::new(Router::new(scanner, thresholds, metrics));
        info!(?thresholds, url = %kubesec_url, "Scoring workloads");
        let runtime = runtime.spawn_server(move || Admission::new(router));

        // Serve reviews until the shutdown signal fires.
        if runtime.run().await.is_err() {
            bail!("Aborted");
        }

        Ok(())
    }

    fn thresholds(&self) -> Thresholds {
        let uniform = Thresholds::uniform(self.min_score);
        Thresholds {
            pod: self.pod_min_score.unwrap_or(uniform.pod),
            deployment: self.deployment_min_score.unwrap_or(uniform.deployment),
            daemonset: self.daemonset_min_score.unwrap_or(uniform.daemonset),
            statefulset: self.statefulset_min_score.unwrap_or(uniform.statefulset),
        }
    }
}
