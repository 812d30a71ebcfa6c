use http::{Method, Request, Response, StatusCode};

use crate::error::{MAX_BODY_BYTES, ProxyError};
use crate::record::Submission;
use crate::route::{ResourceRoute, route_for};
use crate::service::ProxyService;
use crate::upstream::Upstream;

pub const HEALTH_TEXT: &str = "👻 GhostDrop is live";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

pub struct ProxyHttp<U: Upstream> {
    service: ProxyService<U>,
}

impl<U: Upstream> ProxyHttp<U> {
    pub fn new(service: ProxyService<U>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ProxyService<U> {
        &self.service
    }

    pub fn handle(&self, req: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let path = req.uri().path();
        let method = req.method();

        if path.trim_end_matches('/').is_empty() {
            return if *method == Method::GET {
                text_response(StatusCode::OK, HEALTH_TEXT)
            } else if *method == Method::HEAD {
                build(StatusCode::OK, TEXT_PLAIN, Vec::new())
            } else {
                not_found()
            };
        }

        match (method, route_for(path)) {
            (&Method::POST, Some(route)) => self.submit(route, req.body()),
            _ => not_found(),
        }
    }

    fn submit(&self, route: &ResourceRoute, body: &[u8]) -> Response<Vec<u8>> {
        if body.len() > MAX_BODY_BYTES {
            let err = ProxyError::PayloadTooLarge {
                limit: MAX_BODY_BYTES,
            };
            return json_response(err.status_code(), err.to_body().to_string());
        }

        let result = Submission::from_slice(body)
            .map_err(|e| ProxyError::InvalidBody(e.to_string()))
            .and_then(|submission| self.service.submit(route, submission));

        match result {
            Ok(upstream_body) => match serde_json::to_vec(&upstream_body) {
                Ok(body) => json_response(StatusCode::OK, body),
                Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
            },
            Err(e) => {
                let status = e.status_code();
                if status.is_server_error() {
                    tracing::error!(resource = route.path, error = %e, "request failed");
                }
                json_response(status, e.to_body().to_string())
            }
        }
    }
}

fn not_found() -> Response<Vec<u8>> {
    json_response(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#)
}

fn text_response(status: StatusCode, body: &str) -> Response<Vec<u8>> {
    build(status, TEXT_PLAIN, body.as_bytes().to_vec())
}

fn json_response(status: StatusCode, body: impl Into<Vec<u8>>) -> Response<Vec<u8>> {
    build(status, "application/json", body.into())
}

fn error_response(status: StatusCode, message: &str) -> Response<Vec<u8>> {
    let body = serde_json::json!({ "error": message });
    json_response(status, body.to_string().into_bytes())
}

fn build(status: StatusCode, content_type: &str, body: Vec<u8>) -> Response<Vec<u8>> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    if let Ok(value) = http::HeaderValue::from_str(content_type) {
        response
            .headers_mut()
            .insert(http::header::CONTENT_TYPE, value);
    }
    response
}
