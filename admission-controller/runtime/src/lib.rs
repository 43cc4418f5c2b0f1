#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use kubesec_admission_controller_core as core;
pub use kubesec_admission_controller_k8s_api as k8s;
pub use kubesec_admission_controller_kubesec as kubesec;

mod admission;
mod args;
mod engine;
mod metrics;
mod router;

pub use self::{
    admission::Admission,
    args::Args,
    engine::Engine,
    metrics::Metrics,
    router::{Router, Thresholds},
};
