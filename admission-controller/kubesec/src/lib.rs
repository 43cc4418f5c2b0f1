#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

//! A client for the kubesec v2 scanning API.
//!
//! Manifests are posted to the `/scan` endpoint, which replies with a JSON
//! list holding one result per document in the submitted manifest.

use anyhow::{bail, Context, Result};
use kubesec_admission_controller_core::{Scan, ScoreRequest, ScoreResult};
use std::time::Duration;
use tracing::{debug, trace};

pub const DEFAULT_URL: &str = "https://v2.kubesec.io/scan";

/// Scans manifests over HTTP.
///
/// Clones share a single connection pool, so one client serves all in-flight
/// admission reviews.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    url: reqwest::Url,
}

// === impl Client ===

impl Client {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url =
            reqwest::Url::parse(url).with_context(|| format!("invalid kubesec url: {url}"))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build kubesec http client")?;
        Ok(Self { http, url })
    }
}

#[async_trait::async_trait]
impl Scan for Client {
    async fn scan(&self, req: &ScoreRequest) -> Result<Vec<ScoreResult>> {
        debug!(url = %self.url, kind = %req.kind, name = %req.name, "Scanning");
        let rsp = self
            .http
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/x-yaml")
            .body(req.manifest.clone())
            .send()
            .await
            .context("failed to send scan request")?;

        let status = rsp.status();
        if !status.is_success() {
            let body = rsp.text().await.unwrap_or_default();
            bail!("kubesec responded with {status}: {}", body.trim());
        }

        let results = rsp
            .json::<Vec<ScoreResult>>()
            .await
            .context("failed to decode scan results")?;
        trace!(?results);
        Ok(results)
    }
}
