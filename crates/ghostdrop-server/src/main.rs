use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use ghostdrop_airtable::{AirtableClient, AirtableConfig, DEFAULT_API_URL, DEFAULT_BASE_ID};
use ghostdrop_proxy::{MAX_BODY_BYTES, ProxyError, ProxyHttp, ProxyService, Upstream};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::{TcpListener, TcpStream};
use tokio::signal::unix::{SignalKind, signal};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn load_config() -> AirtableConfig {
    let api_token = std::env::var("AIRTABLE_API_TOKEN").unwrap_or_else(|_| {
        eprintln!("AIRTABLE_API_TOKEN is required");
        std::process::exit(1);
    });
    let base_id = std::env::var("AIRTABLE_BASE_ID").unwrap_or_else(|_| DEFAULT_BASE_ID.into());
    let api_url = std::env::var("AIRTABLE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
    let timeout = std::env::var("UPSTREAM_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs);

    AirtableConfig::new(base_id, api_token)
        .with_api_url(api_url)
        .with_timeout(timeout)
}

fn json_reply(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::from(body.to_string())));
    *resp.status_mut() = status;
    resp.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    resp
}

/// Buffers at most `MAX_BODY_BYTES` of the request body.
async fn read_body<B>(body: B) -> Result<Vec<u8>, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes().to_vec()),
        Err(e) if e.is::<LengthLimitError>() => {
            let err = ProxyError::PayloadTooLarge {
                limit: MAX_BODY_BYTES,
            };
            Err(json_reply(err.status_code(), err.to_body()))
        }
        Err(e) => {
            let err = ProxyError::InvalidBody(e.to_string());
            Err(json_reply(err.status_code(), err.to_body()))
        }
    }
}

async fn handle<U, B>(
    req: Request<B>,
    handler: Arc<ProxyHttp<U>>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    U: Upstream + 'static,
    B: Body,
    B::Error: Into<BoxError>,
{
    let (parts, body) = req.into_parts();
    let body = match read_body(body).await {
        Ok(body) => body,
        Err(rejection) => return Ok(rejection),
    };
    let http_req = Request::from_parts(parts, body);

    // The upstream client blocks; keep it off the runtime threads.
    match tokio::task::spawn_blocking(move || handler.handle(http_req)).await {
        Ok(http_resp) => Ok(http_resp.map(|body| Full::new(Bytes::from(body)))),
        Err(e) => {
            tracing::error!(error = %e, "request handler panicked");
            Ok(json_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": e.to_string() }),
            ))
        }
    }
}

fn spawn_connection<U: Upstream + 'static>(
    graceful: &GracefulShutdown,
    stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<ProxyHttp<U>>,
) {
    let service = service_fn(move |req: Request<Incoming>| handle(req, Arc::clone(&handler)));
    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    let conn = graceful.watch(conn);
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!(%peer, error = %e, "connection closed with error");
        }
    });
}

/// Accepts connections until `shutdown` resolves, then drains in-flight
/// requests for up to `SHUTDOWN_GRACE`.
async fn serve<U: Upstream + 'static>(
    listener: TcpListener,
    handler: Arc<ProxyHttp<U>>,
    shutdown: impl Future<Output = ()>,
) {
    let graceful = GracefulShutdown::new();
    let mut shutdown = pin!(shutdown);

    loop {
        let accepted = tokio::select! {
            accepted = listener.accept() => accepted,
            _ = &mut shutdown => break,
        };
        match accepted {
            Ok((stream, peer)) => spawn_connection(&graceful, stream, peer, Arc::clone(&handler)),
            Err(e) => tracing::warn!(error = %e, "accept failed"),
        }
    }
    drop(listener);

    tracing::info!("draining connections");
    match tokio::time::timeout(SHUTDOWN_GRACE, graceful.shutdown()).await {
        Ok(()) => tracing::info!("shutdown complete"),
        Err(_) => tracing::warn!(grace = ?SHUTDOWN_GRACE, "shutdown timed out"),
    }
}

async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "failed to register SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = sigterm.recv() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = load_config();
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());

    tracing::info!(base = %config.base_id, api = %config.api_url, "using airtable base");

    let client = AirtableClient::new(config);
    let handler = Arc::new(ProxyHttp::new(ProxyService::new(client)));

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&bind_addr).await.unwrap_or_else(|e| {
        eprintln!("failed to bind {bind_addr}: {e}");
        std::process::exit(1);
    });

    tracing::info!("ghostdrop listening on {bind_addr}");
    serve(listener, handler, shutdown_signal()).await;
}
