//! HTTP/1.1 front end.
//!
//! Each accepted connection is served on its own task. Request bodies are
//! read up to a size limit, turned into an [`InboundRequest`] and dispatched
//! through the [`Registry`]; the [`Reply`] comes back as `text/plain`.

use crate::orchestrator::Registry;
use bytes::Bytes;
use http::{HeaderValue, Request, Response, StatusCode, header::CONTENT_TYPE};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{body::Body, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use relay_core::{BoxError, InboundRequest, Reply, RequestContext};
use std::{convert::Infallible, future::Future, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Header carrying the request id, echoed on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Pause after a failed accept, e.g. when the process is out of descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Per-request limits.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Time budget of one request, sinks included.
    pub request_timeout: Option<Duration>,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Serve `registry` on `listener` until `shutdown` resolves.
///
/// After `shutdown` resolves no new connection is accepted; in-flight
/// requests are allowed to finish before this returns.
pub async fn serve<F>(
    listener: TcpListener,
    registry: Arc<Registry>,
    options: ServerOptions,
    shutdown: F,
) where
    F: Future<Output = ()> + Send,
{
    let options = Arc::new(options);
    let (stop_tx, stop_rx) = watch::channel(());
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(err) => {
                    accept_failed(&err).await;
                    continue;
                }
            },
            () = &mut shutdown => break,
        };

        let io = TokioIo::new(stream);
        let registry = registry.clone();
        let options = options.clone();
        let mut stop_rx = stop_rx.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let registry = registry.clone();
                let options = options.clone();
                async move { Ok::<_, Infallible>(handle(&registry, &options, req).await) }
            });

            let conn = http1::Builder::new().serve_connection(io, service);
            tokio::pin!(conn);
            let result = tokio::select! {
                result = conn.as_mut() => result,
                _ = stop_rx.changed() => {
                    conn.as_mut().graceful_shutdown();
                    conn.await
                }
            };
            if let Err(err) = result {
                debug!(%peer, error = %err, "error serving connection");
            }
        });
    }

    drop(listener);
    drop(stop_rx);
    info!("shutting down, waiting for in-flight requests");
    stop_tx.send_replace(());
    stop_tx.closed().await;
}

async fn accept_failed(err: &std::io::Error) {
    warn!(error = %err, "failed to accept connection");
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}

/// Handle one HTTP request.
pub async fn handle<B>(registry: &Registry, options: &ServerOptions, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let (parts, body) = req.into_parts();
    let request_id = parts
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let reply = match Limited::new(body, options.max_body_bytes).collect().await {
        Ok(collected) => {
            let mut ctx = RequestContext::new(request_id.clone());
            if let Some(timeout) = options.request_timeout {
                ctx = ctx.with_timeout(timeout);
            }
            let request = InboundRequest::new(parts.method, parts.uri.path(), collected.to_bytes())
                .with_headers(parts.headers);
            registry.dispatch(&ctx, &request).await
        }
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            info!(request_id = %request_id, limit = options.max_body_bytes, "request body too large");
            Reply::new(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
        }
        Err(err) => {
            debug!(request_id = %request_id, error = %err, "failed to read request body");
            Reply::new(StatusCode::BAD_REQUEST, format!("Failed to read request body: {err}"))
        }
    };

    into_response(reply, &request_id)
}

fn into_response(reply: Reply, request_id: &str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(reply.detail)));
    *response.status_mut() = reply.status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    if let Ok(value) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    response
}
