use crate::{DaemonSet, Deployment, DynamicObject, ObjectMeta, Pod, StatefulSet};
use kubesec_admission_controller_core::WorkloadKind;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A workload submitted to the cluster for admission.
#[derive(Clone, Debug, PartialEq)]
pub enum WorkloadResource {
    Pod(Pod),
    Deployment(Deployment),
    DaemonSet(DaemonSet),
    StatefulSet(StatefulSet),
}

#[derive(Debug, Error)]
#[error("failed to decode {kind} object: {source}")]
pub struct DecodeError {
    kind: WorkloadKind,
    #[source]
    source: serde_json::Error,
}

// === impl WorkloadResource ===

impl WorkloadResource {
    /// Decodes an admission request's object as the typed resource for `kind`.
    pub fn from_object(kind: WorkloadKind, obj: DynamicObject) -> Result<Self, DecodeError> {
        let value = serde_json::to_value(obj).map_err(|source| DecodeError { kind, source })?;
        let workload = match kind {
            WorkloadKind::Pod => Self::Pod(decode(kind, value)?),
            WorkloadKind::Deployment => Self::Deployment(decode(kind, value)?),
            WorkloadKind::DaemonSet => Self::DaemonSet(decode(kind, value)?),
            WorkloadKind::StatefulSet => Self::StatefulSet(decode(kind, value)?),
        };
        Ok(workload)
    }

    pub fn kind(&self) -> WorkloadKind {
        match self {
            Self::Pod(_) => WorkloadKind::Pod,
            Self::Deployment(_) => WorkloadKind::Deployment,
            Self::DaemonSet(_) => WorkloadKind::DaemonSet,
            Self::StatefulSet(_) => WorkloadKind::StatefulSet,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::Pod(pod) => &pod.metadata,
            Self::Deployment(deploy) => &deploy.metadata,
            Self::DaemonSet(ds) => &ds.metadata,
            Self::StatefulSet(sts) => &sts.metadata,
        }
    }

    /// The resource's name.
    ///
    /// Pods created by controllers are admitted before the API server assigns
    /// them a name, so the `generateName` prefix is used in that case.
    pub fn name(&self) -> String {
        let meta = self.metadata();
        meta.name
            .clone()
            .or_else(|| meta.generate_name.clone())
            .unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<String> {
        self.metadata().namespace.clone()
    }
}

impl From<Pod> for WorkloadResource {
    fn from(pod: Pod) -> Self {
        Self::Pod(pod)
    }
}

impl From<Deployment> for WorkloadResource {
    fn from(deploy: Deployment) -> Self {
        Self::Deployment(deploy)
    }
}

impl From<DaemonSet> for WorkloadResource {
    fn from(ds: DaemonSet) -> Self {
        Self::DaemonSet(ds)
    }
}

impl From<StatefulSet> for WorkloadResource {
    fn from(sts: StatefulSet) -> Self {
        Self::StatefulSet(sts)
    }
}

fn decode<T>(kind: WorkloadKind, value: serde_json::Value) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value).map_err(|source| DecodeError { kind, source })
}
