use crate::WorkloadKind;
use anyhow::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A normalized workload manifest, ready to be submitted to a scanner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRequest {
    pub kind: WorkloadKind,
    pub api_version: &'static str,
    pub namespace: Option<String>,
    pub name: String,
    pub manifest: Bytes,
}

/// A single scan result as reported by kubesec.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub valid: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub scoring: Scoring,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Scoring {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critical: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub passed: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advise: Vec<Finding>,
}

/// A rule that matched (or was advised against) the scanned manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Finding {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub points: i64,
}

/// Submits manifests to a remote scanner.
///
/// Implementations report only transport-level failures; the contents of the
/// returned list are validated by [`score`].
#[async_trait::async_trait]
pub trait Scan {
    async fn scan(&self, req: &ScoreRequest) -> Result<Vec<ScoreResult>>;
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("scan failed: {0}")]
    Transport(#[source] anyhow::Error),

    #[error("scan returned {0} results, expected exactly one")]
    ResultCount(usize),

    #[error("scan failed: {0}")]
    Scan(String),
}

/// Scans a single manifest, requiring exactly one error-free result.
pub async fn score<S>(scanner: &S, req: &ScoreRequest) -> Result<ScoreResult, ScoreError>
where
    S: Scan + ?Sized + Sync,
{
    let results = scanner.scan(req).await.map_err(ScoreError::Transport)?;
    single(results)
}

fn single(mut results: Vec<ScoreResult>) -> Result<ScoreResult, ScoreError> {
    if results.len() != 1 {
        return Err(ScoreError::ResultCount(results.len()));
    }
    let result = results.remove(0);
    match result.error.as_deref() {
        Some(error) if !error.is_empty() => Err(ScoreError::Scan(error.to_string())),
        _ => Ok(result),
    }
}
