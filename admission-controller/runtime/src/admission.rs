use crate::{
    core::{Scan, WorkloadKind},
    k8s::{DynamicObject, WorkloadResource},
    Router,
};
use bytes::Bytes;
use futures::future;
use http_body_util::BodyExt;
use hyper::{http, Request, Response};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info_span, trace, warn, Instrument};

/// Serves workload admission reviews, one path per workload kind.
pub struct Admission<S> {
    router: Arc<Router<S>>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read request body: {0}")]
    Request(#[from] hyper::Error),

    #[error("failed to encode json response: {0}")]
    Json(#[from] serde_json::Error),
}

type Review = kube::core::admission::AdmissionReview<DynamicObject>;
type AdmissionRequest = kube::core::admission::AdmissionRequest<DynamicObject>;
type AdmissionResponse = kube::core::admission::AdmissionResponse;
type AdmissionReview = kube::core::admission::AdmissionReview<DynamicObject>;

type Body = http_body_util::Full<Bytes>;

// === impl Admission ===

impl<S> Clone for Admission<S> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
        }
    }
}

impl<S> tower::Service<Request<hyper::body::Incoming>> for Admission<S>
where
    S: Scan + Send + Sync + 'static,
{
    type Response = Response<Body>;
    type Error = Error;
    type Future = future::BoxFuture<'static, Result<Response<Body>, Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<hyper::body::Incoming>) -> Self::Future {
        trace!(?req);
        let Some(kind) = route(req.method(), req.uri().path()) else {
            return Box::pin(future::ok(
                Response::builder()
                    .status(http::StatusCode::NOT_FOUND)
                    .body(Body::default())
                    .expect("not found response must be valid"),
            ));
        };

        let admission = self.clone();
        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            let rsp = admission.review(kind, bytes).await;
            debug!(?rsp);
            json_response(rsp.into_review())
        })
    }
}

impl<S> Admission<S>
where
    S: Scan + Send + Sync,
{
    pub fn new(router: Arc<Router<S>>) -> Self {
        Self { router }
    }

    /// Reviews a serialized `AdmissionReview` submitted on `kind`'s path.
    ///
    /// A body that is not a valid review produces an invalid response. A valid
    /// review always produces a decision for its request.
    pub async fn review(&self, kind: WorkloadKind, body: Bytes) -> AdmissionResponse {
        let review: Review = match serde_json::from_slice(&body) {
            Ok(review) => review,
            Err(error) => {
                warn!(%error, "Failed to parse request body");
                return AdmissionResponse::invalid(error);
            }
        };
        trace!(?review);

        match review.try_into() {
            Ok(req) => {
                debug!(?req);
                self.admit(kind, req).await
            }
            Err(error) => {
                warn!(%error, "Invalid admission request");
                AdmissionResponse::invalid(error)
            }
        }
    }

    async fn admit(&self, kind: WorkloadKind, req: AdmissionRequest) -> AdmissionResponse {
        let rsp = AdmissionResponse::from(&req);

        let Some(obj_kind) = WorkloadKind::from_group_kind(&req.kind.group, &req.kind.kind) else {
            debug!(
                group = %req.kind.group,
                kind = %req.kind.kind,
                "Admitting unsupported resource kind"
            );
            return rsp;
        };

        // Objects submitted on another kind's path are not decoded at all.
        if obj_kind != kind {
            debug!(kind = %obj_kind, path = kind.path(), "Admitting workload of another kind");
            return rsp;
        }

        let Some(obj) = req.object else {
            debug!(operation = ?req.operation, "Admitting request without an object");
            return rsp;
        };

        let workload = match WorkloadResource::from_object(obj_kind, obj) {
            Ok(workload) => workload,
            Err(error) => {
                warn!(%error, "Invalid workload object");
                return AdmissionResponse::invalid(error);
            }
        };

        let span = info_span!(
            "admit",
            kind = %obj_kind,
            ns = %req.namespace.as_deref().unwrap_or_default(),
            name = %workload.name(),
        );
        let verdict = self
            .router
            .engine(kind)
            .admit(&workload)
            .instrument(span)
            .await;

        if verdict.allowed {
            rsp
        } else {
            rsp.deny(verdict.message)
        }
    }
}

fn route(method: &http::Method, path: &str) -> Option<WorkloadKind> {
    if method != http::Method::POST {
        return None;
    }
    WorkloadKind::from_path(path)
}

fn json_response(rsp: AdmissionReview) -> Result<Response<Body>, Error> {
    let bytes = serde_json::to_vec(&rsp)?;
    Ok(Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .expect("admission review response must be valid"))
}
