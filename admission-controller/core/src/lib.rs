#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod kind;
pub mod score;
mod verdict;

pub use self::{
    kind::WorkloadKind,
    score::{Finding, Scan, ScoreError, ScoreRequest, ScoreResult, Scoring},
    verdict::{EngineConfig, Verdict},
};
