//! HTTP server, request dispatch, and graceful shutdown.
//!
//! # Shutdown
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. stops accepting new connections immediately,
//! 2. lets every in-flight connection task run to completion,
//! 3. returns from [`Server::serve`], so `main` exits cleanly.
//!
//! Under an orchestrator, set the termination grace period longer than your
//! slowest request.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::Error;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind `addr` when [`serve`](Server::serve) is
    /// called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    ///
    /// ```rust,no_run
    /// use vereda::Server;
    /// let server = Server::bind("0.0.0.0:3000");
    /// ```
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr }
    }

    /// Accepts connections and dispatches requests through the routing table.
    ///
    /// Takes anything convertible into a [`Router`] — including a chained
    /// [`Route`](crate::Route) — finalizing the table: it is shared read-only
    /// across connections from here on. Returns only after a full graceful
    /// shutdown.
    pub async fn serve(self, router: impl Into<Router>) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let router = Arc::new(router.into());

        info!(addr = %self.addr, "listening");

        // Every connection task lands in the JoinSet so shutdown can drain
        // them; the select loop also reaps finished ones as it goes.
        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Top-to-bottom polling: a pending shutdown wins over queued
                // accepts.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(router, req).await }
                        });

                        // Auto builder speaks HTTP/1.1 or HTTP/2, whichever
                        // the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request to one response.
///
/// Infallible by contract: every failure becomes an HTTP answer here, hyper
/// never sees an error. Unknown method tokens and known paths under the
/// wrong method get 405, unknown paths 404, unreadable bodies 400.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let method_token = parts.method.as_str().to_owned();
    let path = parts.uri.path().to_owned();
    let query = parts.uri.query().map(str::to_owned);

    let response = match method_token.parse::<Method>() {
        Err(()) => Response::send_status(Status::MethodNotAllowed),
        Ok(method) => match router.lookup(method, &path) {
            Some((handler, params)) => match body.collect().await {
                Ok(collected) => {
                    let request = Request::new(
                        method,
                        path.clone(),
                        query,
                        parts.headers,
                        collected.to_bytes(),
                        params,
                    );
                    handler.call(request).await
                }
                Err(e) => {
                    error!("failed to read request body: {e}");
                    Response::send_status(Status::BadRequest)
                }
            },
            None => unmatched(&router, &path),
        },
    };

    info!(
        method = %method_token,
        path = %path,
        status = response.status_code().code(),
        "request"
    );
    Ok(response.into_http())
}

/// The answer when no handler matches: 405 with an `allow` header if the
/// path exists under other methods, plain 404 otherwise.
fn unmatched(router: &Router, path: &str) -> Response {
    let allowed = router.allowed(path);
    if allowed.is_empty() {
        return Response::send_status(Status::NotFound);
    }
    let allow = allowed
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Response::builder()
        .status(Status::MethodNotAllowed)
        .header("allow", &allow)
        .text(Status::MethodNotAllowed.reason())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal: SIGTERM or SIGINT on Unix, Ctrl-C
/// elsewhere.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
