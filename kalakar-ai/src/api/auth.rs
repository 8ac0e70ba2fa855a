//! Bearer-token authentication layer
//!
//! Compares the SHA-256 digest of the presented `Authorization: Bearer`
//! token with the configured digest (see `kalakar_common::auth`).
//! `/health` and `/voice/languages` are public. CORS preflight requests pass
//! through so the CORS layer can answer them.

use crate::error::ApiError;
use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, Method},
    response::{IntoResponse, Response},
};
use kalakar_common::auth::{validate_bearer, TokenDigest};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Paths reachable without a token
pub const PUBLIC_PATHS: &[&str] = &["/health", "/voice/languages"];

/// Tower layer for API authentication
#[derive(Clone)]
pub struct AuthLayer {
    expected: TokenDigest,
}

impl AuthLayer {
    pub fn new(expected: TokenDigest) -> Self {
        Self { expected }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            expected: self.expected,
        }
    }
}

/// Tower service that rejects requests without a valid bearer token
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    expected: TokenDigest,
}

impl<S> Service<Request> for AuthMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // Take the service that was driven to readiness, leave a clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if is_public(&request) {
            return Box::pin(async move { inner.call(request).await });
        }

        let header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match validate_bearer(header, &self.expected) {
            Ok(()) => Box::pin(async move { inner.call(request).await }),
            Err(e) => {
                tracing::debug!(path = %request.uri().path(), error = %e, "Request rejected");
                let response = ApiError::Unauthorized(e.to_string()).into_response();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

fn is_public(request: &Request) -> bool {
    request.method() == Method::OPTIONS || PUBLIC_PATHS.contains(&request.uri().path())
}
