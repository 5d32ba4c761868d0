//! HTTP server: accept loop, optional TLS, graceful shutdown.
//!
//! # Graceful shutdown
//!
//! On the first **SIGTERM** or **Ctrl-C** the server:
//! 1. Immediately stops `listener.accept()` — no new connections are made.
//! 2. Lets every in-flight connection task run to completion.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.
//!
//! Kubernetes sends SIGTERM and waits `terminationGracePeriodSeconds`
//! (default 30 s) before SIGKILL; set it to a value longer than your slowest
//! request.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::{error, info};

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::tls;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when served.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use remux::Server;
    /// let server = Server::bind("0.0.0.0:3000");
    /// ```
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr }
    }

    /// Starts accepting plain-HTTP connections and dispatching each parsed
    /// request through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.run(router, None).await
    }

    /// Like [`serve`](Server::serve), with a TLS handshake in front of every
    /// accepted connection.
    ///
    /// `cert_file` must hold a PEM certificate chain and `key_file` a PEM
    /// private key. Loading or parsing failures surface here, before the
    /// listener binds.
    pub async fn serve_tls(
        self,
        router: Router,
        cert_file: impl AsRef<Path>,
        key_file: impl AsRef<Path>,
    ) -> Result<(), Error> {
        let config = tls::server_config(cert_file.as_ref(), key_file.as_ref())?;
        let acceptor = TlsAcceptor::from(Arc::new(config));
        self.run(router, Some(acceptor)).await
    }

    async fn run(self, router: Router, tls: Option<TlsAcceptor>) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;

        // Arc so the rule table is shared across concurrent connection
        // tasks without copying it.
        let router = Arc::new(router);

        info!(addr = %self.addr, tls = tls.is_some(), "remux listening");

        // JoinSet tracks every spawned connection task so we can wait for
        // them all to finish during graceful shutdown.
        let mut tasks = tokio::task::JoinSet::new();

        // Pin the shutdown future so we can poll it in a loop.
        // Futures in Rust must not move in memory after the first poll — that
        // is what `Pin` enforces. `tokio::pin!` pins the future on the stack.
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // `biased` makes select! check arms top-to-bottom instead of
                // randomly. We check shutdown first so a SIGTERM immediately
                // stops accepting new connections, even if more are queued.
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
                    let tls = tls.clone();

                    tasks.spawn(async move {
                        // `service_fn` turns a plain async function into a
                        // hyper `Service`. The closure is called once per
                        // request on the connection, not once per connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { respond(router, req).await }
                        });

                        match tls {
                            // `auto::Builder` transparently handles both
                            // HTTP/1.1 and HTTP/2 — whatever the client
                            // negotiates.
                            None => {
                                let io = TokioIo::new(stream);
                                if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                                    .serve_connection(io, svc)
                                    .await
                                {
                                    error!(peer = %remote_addr, "connection error: {e}");
                                }
                            }
                            Some(acceptor) => match acceptor.accept(stream).await {
                                Ok(stream) => {
                                    let io = TokioIo::new(stream);
                                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                                        .serve_connection(io, svc)
                                        .await
                                    {
                                        error!(peer = %remote_addr, "connection error: {e}");
                                    }
                                }
                                Err(e) => {
                                    error!(peer = %remote_addr, "tls handshake failed: {e}");
                                }
                            },
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        // Drain: wait for every in-flight connection to finish before we return.
        while tasks.join_next().await.is_some() {}

        info!("remux stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Bridges one hyper request into [`Router::dispatch`].
///
/// The error type is [`Infallible`](std::convert::Infallible) — every failure
/// becomes an HTTP response (404, 400, etc.) so hyper never sees an error.
async fn respond(
    router: Arc<Router>,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible> {
    let request = match Request::from_hyper(req).await {
        Ok(request) => request,
        // The client broke the connection or sent a body hyper cannot read.
        Err(e) => {
            error!("failed to read request: {e}");
            return Ok(Response::status(StatusCode::BAD_REQUEST).into_http());
        }
    };

    Ok(router.dispatch(request).await.into_http())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** (sent by `kubectl` and the
/// Kubernetes control plane) and **SIGINT** (Ctrl-C, for local dev).
/// On Windows only Ctrl-C is available.
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

    // `pending()` is a future that never resolves — on non-Unix platforms
    // the SIGTERM arm is effectively disabled.
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
