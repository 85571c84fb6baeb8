//! Middleware turning handler outcomes into uniform HTTP responses.
//!
//! Every request runs inside a fresh [`TraceId`] scope. Once the inner
//! service has produced a response:
//!
//! - an error response is rebuilt from the error it carries, using
//!   [`map_actix_error`] and the configured [`ErrorBodyPolicy`];
//! - a `trace-id` header is added;
//! - `Content-Type: application/json` is inserted when no content type was
//!   set;
//! - one INFO line records the outcome.

use std::task::{Context, Poll};

use actix_service::{Service, Transform};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::error::InternalError;
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info};

use crate::domain::TraceId;
use crate::inbound::http::error::{ErrorBodyPolicy, map_actix_error};

/// Response header carrying the request's trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Wraps every route so failures reach clients as an
/// [`ErrorEnvelope`](crate::inbound::http::error::ErrorEnvelope).
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::inbound::http::error::ErrorBodyPolicy;
/// use user_service::middleware::ResponseMapper;
///
/// let app = App::new().wrap(ResponseMapper::new(ErrorBodyPolicy::Own));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseMapper {
    policy: ErrorBodyPolicy,
}

impl ResponseMapper {
    /// Wrap routes, writing domain failures per `policy`.
    #[must_use]
    pub fn new(policy: ErrorBodyPolicy) -> Self {
        Self { policy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ResponseMapper
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ResponseMapperMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResponseMapperMiddleware {
            service,
            policy: self.policy,
        }))
    }
}

/// Service wrapper produced by [`ResponseMapper`].
pub struct ResponseMapperMiddleware<S> {
    service: S,
    policy: ErrorBodyPolicy,
}

impl<S, B> Service<ServiceRequest> for ResponseMapperMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let policy = self.policy;
        let method = req.method().clone();
        let path = req.path().to_owned();
        let fut = self.service.call(req);

        Box::pin(TraceId::scope(trace_id, async move {
            let res = match fut.await {
                Ok(res) => res,
                Err(err) => {
                    // No request left to attach a response to; the rebuilt
                    // response travels inside the error instead.
                    let (status, body) = map_actix_error(&err, policy);
                    info!(%method, %path, status = status.as_u16(), error = %err, "request handled");
                    let mut response = HttpResponse::build(status).json(body);
                    insert_trace_header(&mut response, trace_id);
                    return Err(InternalError::from_response(err.to_string(), response).into());
                }
            };

            let error_text = res.response().error().map(ToString::to_string);
            let remapped = res
                .response()
                .error()
                .map(|err| map_actix_error(err, policy));

            let mut res = match remapped {
                Some((status, body)) => {
                    let (request, _) = res.into_parts();
                    ServiceResponse::new(request, HttpResponse::build(status).json(body))
                }
                None => res.map_into_boxed_body(),
            };

            insert_trace_header(res.response_mut(), trace_id);
            let headers = res.response_mut().headers_mut();
            if !headers.contains_key(header::CONTENT_TYPE) {
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
            }

            let status = res.status().as_u16();
            let error = error_text.as_deref().unwrap_or("none");
            info!(%method, %path, status, error, "request handled");
            Ok(res)
        }))
    }
}

fn insert_trace_header<B>(response: &mut HttpResponse<B>, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => {
            error!(%error, %trace_id, "failed to encode trace identifier header");
        }
    }
}
