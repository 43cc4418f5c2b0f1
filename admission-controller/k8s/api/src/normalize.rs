use crate::WorkloadResource;
use bytes::Bytes;
use kubesec_admission_controller_core::ScoreRequest;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("failed to encode {0} as json: {1}")]
    Json(&'static str, #[source] serde_json::Error),

    #[error("{0} did not encode as an object")]
    NotAnObject(&'static str),

    #[error("failed to encode {0} as yaml: {1}")]
    Yaml(&'static str, #[source] serde_yaml::Error),
}

/// Serializes a workload into the YAML manifest submitted for scanning.
///
/// The object's `apiVersion` and `kind` are always set explicitly, since
/// objects embedded in admission requests may omit them. Server-managed field
/// bookkeeping is stripped so that the same workload always encodes to the
/// same bytes.
pub fn normalize(workload: &WorkloadResource) -> Result<ScoreRequest, NormalizeError> {
    let kind = workload.kind();
    let encoded = match workload {
        WorkloadResource::Pod(pod) => serde_json::to_value(pod),
        WorkloadResource::Deployment(deploy) => serde_json::to_value(deploy),
        WorkloadResource::DaemonSet(ds) => serde_json::to_value(ds),
        WorkloadResource::StatefulSet(sts) => serde_json::to_value(sts),
    };
    let mut value = encoded.map_err(|e| NormalizeError::Json(kind.kind(), e))?;

    let obj = value
        .as_object_mut()
        .ok_or(NormalizeError::NotAnObject(kind.kind()))?;
    obj.insert("apiVersion".to_string(), Value::from(kind.api_version()));
    obj.insert("kind".to_string(), Value::from(kind.kind()));
    if let Some(meta) = obj.get_mut("metadata").and_then(Value::as_object_mut) {
        meta.remove("managedFields");
    }

    let manifest =
        serde_yaml::to_string(&value).map_err(|e| NormalizeError::Yaml(kind.kind(), e))?;

    Ok(ScoreRequest {
        kind,
        api_version: kind.api_version(),
        namespace: workload.namespace(),
        name: workload.name(),
        manifest: Bytes::from(manifest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api, DaemonSet, Deployment, ObjectMeta, Pod};
    use api::core::v1::{Container, HostPathVolumeSource, PodSpec, Volume};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ManagedFieldsEntry;
    use kubesec_admission_controller_core::WorkloadKind;
    use maplit::btreemap;

    fn mk_pod(name: &str) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("default".to_string()),
                labels: Some(btreemap! {
                    "tier".to_string() => "frontend".to_string(),
                    "app".to_string() => "web".to_string(),
                }),
                ..Default::default()
            },
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: "nginx".to_string(),
                    image: Some("nginx:1.27".to_string()),
                    ..Default::default()
                }],
                volumes: Some(vec![Volume {
                    name: "host".to_string(),
                    host_path: Some(HostPathVolumeSource {
                        path: "/var/run".to_string(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn parse(req: &ScoreRequest) -> serde_yaml::Value {
        serde_yaml::from_slice(&req.manifest).expect("manifest must be valid yaml")
    }

    #[test]
    fn stamps_type_meta() {
        let req = normalize(&mk_pod("web").into()).expect("must normalize");
        assert_eq!(req.kind, WorkloadKind::Pod);
        assert_eq!(req.api_version, "v1");
        assert_eq!(req.name, "web");
        assert_eq!(req.namespace.as_deref(), Some("default"));

        let manifest = parse(&req);
        assert_eq!(manifest["apiVersion"].as_str(), Some("v1"));
        assert_eq!(manifest["kind"].as_str(), Some("Pod"));
        assert_eq!(
            manifest["spec"]["volumes"][0]["hostPath"]["path"].as_str(),
            Some("/var/run")
        );

        let deploy = Deployment {
            metadata: ObjectMeta {
                name: Some("api".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let req = normalize(&deploy.into()).expect("must normalize");
        let manifest = parse(&req);
        assert_eq!(manifest["apiVersion"].as_str(), Some("apps/v1"));
        assert_eq!(manifest["kind"].as_str(), Some("Deployment"));

        let req = normalize(&DaemonSet::default().into()).expect("must normalize");
        assert_eq!(req.api_version, "apps/v1");
        assert_eq!(parse(&req)["kind"].as_str(), Some("DaemonSet"));
    }

    #[test]
    fn deterministic() {
        let a = normalize(&mk_pod("web").into()).expect("must normalize");
        let b = normalize(&mk_pod("web").into()).expect("must normalize");
        assert_eq!(a.manifest, b.manifest);

        let c = normalize(&mk_pod("api").into()).expect("must normalize");
        assert_ne!(a.manifest, c.manifest);
    }

    #[test]
    fn strips_managed_fields() {
        let mut pod = mk_pod("web");
        pod.metadata.managed_fields = Some(vec![ManagedFieldsEntry {
            manager: Some("kubectl-client-side-apply".to_string()),
            operation: Some("Update".to_string()),
            ..Default::default()
        }]);

        let req = normalize(&pod.into()).expect("must normalize");
        let expected = normalize(&mk_pod("web").into()).expect("must normalize");
        assert_eq!(req.manifest, expected.manifest);
        assert!(parse(&req)["metadata"].get("managedFields").is_none());
    }
}
