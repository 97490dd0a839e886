//! Request logging middleware
//!
//! Wraps every request in a `request` span tagged with a fresh UUID, echoes
//! the id back as `X-Request-ID`, and logs one line per response with the
//! method, path, status and duration. 4xx responses log at `warn`, 5xx at
//! `error`, everything else at `info`.

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    http::{
        StatusCode,
        header::{HeaderName, HeaderValue},
    },
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 请求 ID 类型，可从 request extensions 中提取
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Request logging middleware factory
#[derive(Clone, Default)]
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestLoggerService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let start = Instant::now();

        let request_id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(RequestId(request_id.clone()));

        let method = req.method().to_string();
        let path = req.path().to_string();

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            path = %path,
        );

        Box::pin(
            async move {
                let result = srv.call(req).await;
                let elapsed = start.elapsed();

                match result {
                    Ok(mut response) => {
                        log_response(&method, &path, response.status(), elapsed);
                        if let Ok(value) = HeaderValue::from_str(&request_id) {
                            response
                                .headers_mut()
                                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                        }
                        Ok(response)
                    }
                    Err(e) => {
                        let status = e.as_response_error().status_code();
                        log_response(&method, &path, status, elapsed);
                        Err(e)
                    }
                }
            }
            .instrument(span),
        )
    }
}

fn log_response(method: &str, path: &str, status: StatusCode, elapsed: Duration) {
    let status = status.as_u16();
    if (400..500).contains(&status) {
        warn!(method, path, status, ?elapsed, "Client error");
    } else if status >= 500 {
        error!(method, path, status, ?elapsed, "Internal error");
    } else {
        info!(method, path, status, ?elapsed, "Request received");
    }
}
