#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod normalize;
mod workload;

pub use self::{
    normalize::{normalize, NormalizeError},
    workload::{DecodeError, WorkloadResource},
};
pub use k8s_openapi::api::{
    self,
    apps::v1::{DaemonSet, Deployment, StatefulSet},
    core::v1::Pod,
};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
pub use kube::core::DynamicObject;
