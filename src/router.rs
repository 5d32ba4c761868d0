//! Ordered-rule request router.
//!
//! One flat rule table, scanned front to back. First match wins, by
//! registration order, regardless of how specific a later pattern is. No
//! trie, no per-method table: rule counts are expected to stay small, so a
//! linear scan is the entire algorithm.

use http::StatusCode;

use crate::error::Error;
use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;
use crate::rule::Rule;
use crate::server::Server;

/// The application router: an ordered rule table plus dispatch.
///
/// Registration order is match-priority order. Build the table during
/// startup, then hand it to [`Router::serve`] (or [`Server::serve`]); while
/// serving it is shared read-only across concurrent dispatch calls.
#[derive(Clone)]
pub struct Router {
    rules: Vec<Rule>,
}

impl Router {
    /// Returns an empty router.
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Compiles `pattern` and appends the resulting rule to the table.
    ///
    /// Patterns use [`regex`] syntax; capture groups become the handler's
    /// [`Args`](crate::Args) and `(?P<name>...)` groups additionally its
    /// [`Kwargs`](crate::Kwargs). On an invalid pattern this returns
    /// [`Error::Pattern`] and the table is left unchanged.
    ///
    /// ```rust
    /// use remux::{Args, Kwargs, Request, Response, Router};
    ///
    /// # async fn show_user(_: Request, _: Args, _: Kwargs) -> Response { Response::text("") }
    /// # fn main() -> Result<(), remux::Error> {
    /// let mut router = Router::new();
    /// router.handle(r"^/users/(?P<id>[0-9]+)$", show_user)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn handle(&mut self, pattern: &str, handler: impl Handler) -> Result<(), Error> {
        let rule = Rule::compile(pattern, handler)?;
        self.rules.push(rule);
        Ok(())
    }

    /// Routes one request: scans the rule table from the front and runs the
    /// first matching rule's handler. Exactly one handler runs per request —
    /// or the fixed `404 Not Found` fallback when the table is exhausted.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        for rule in &self.rules {
            match rule.try_handle(req) {
                Ok(handling) => return handling.await,
                Err(unmatched) => req = unmatched,
            }
        }
        Response::status(StatusCode::NOT_FOUND)
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Serves this router over plain HTTP on `addr`. Blocks until shutdown.
    pub async fn serve(self, addr: &str) -> Result<(), Error> {
        Server::bind(addr).serve(self).await
    }

    /// Serves this router over TLS on `addr`, with a PEM certificate chain
    /// and private key loaded from the given files. Blocks until shutdown.
    pub async fn serve_tls(
        self,
        addr: &str,
        cert_file: &str,
        key_file: &str,
    ) -> Result<(), Error> {
        Server::bind(addr).serve_tls(self, cert_file, key_file).await
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::rule::{Args, Kwargs};

    /// A handler that counts its invocations and answers with `body`.
    fn counted(hits: Arc<AtomicUsize>, body: &'static str) -> impl Handler {
        move |_req: Request, _args: Args, _kwargs: Kwargs| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Response::text(body)
            }
        }
    }

    #[tokio::test]
    async fn dispatch_invokes_the_matching_handler_with_captures() {
        let seen: Arc<Mutex<Vec<(Args, Kwargs)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut router = Router::new();
        router
            .handle(r"^/users/(?P<id>[0-9]+)$", move |_req: Request, args: Args, kwargs: Kwargs| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().push((args, kwargs));
                    Response::text("user")
                }
            })
            .unwrap();

        let resp = router.dispatch(Request::get("/users/42")).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, b"user".to_vec());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (args, kwargs) = &seen[0];
        assert_eq!(*args, ["/users/42", "42"]);
        assert_eq!(kwargs.len(), 1);
        assert_eq!(kwargs["id"], "42");
    }

    #[tokio::test]
    async fn registration_order_beats_specificity() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut router = Router::new();
        router.handle("^/users/", counted(Arc::clone(&first), "broad")).unwrap();
        router
            .handle(r"^/users/(?P<id>[0-9]+)$", counted(Arc::clone(&second), "specific"))
            .unwrap();

        let resp = router.dispatch(Request::get("/users/42")).await;
        assert_eq!(resp.body, b"broad".to_vec());
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exactly_one_handler_runs_even_when_several_match() {
        let hits = Arc::new(AtomicUsize::new(0));

        let mut router = Router::new();
        for _ in 0..3 {
            router.handle("^/ping$", counted(Arc::clone(&hits), "pong")).unwrap();
        }

        router.dispatch(Request::get("/ping")).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unmatched_path_falls_back_to_404() {
        let hits = Arc::new(AtomicUsize::new(0));

        let mut router = Router::new();
        router
            .handle(r"^/users/(?P<id>[0-9]+)$", counted(Arc::clone(&hits), "user"))
            .unwrap();

        let resp = router.dispatch(Request::get("/nope")).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert!(resp.body.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_router_returns_404() {
        let router = Router::new();
        let resp = router.dispatch(Request::get("/")).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_pattern_leaves_the_table_unchanged() {
        let hits = Arc::new(AtomicUsize::new(0));

        let mut router = Router::new();
        router.handle("^/ok$", counted(Arc::clone(&hits), "ok")).unwrap();

        let err = router.handle("(", counted(Arc::clone(&hits), "bad")).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
        assert_eq!(router.len(), 1);

        // The surviving table still routes as before.
        let resp = router.dispatch(Request::get("/ok")).await;
        assert_eq!(resp.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn dispatch_is_idempotent_per_path() {
        let hits = Arc::new(AtomicUsize::new(0));

        let mut router = Router::new();
        router
            .handle(r"^/users/(?P<id>[0-9]+)$", counted(Arc::clone(&hits), "user"))
            .unwrap();

        let first = router.dispatch(Request::get("/users/42")).await;
        let second = router.dispatch(Request::get("/users/42")).await;
        assert_eq!(first.status, second.status);
        assert_eq!(first.body, second.body);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn health_probes_route_like_any_handler() {
        let mut router = Router::new();
        router.handle("^/healthz$", crate::health::liveness).unwrap();
        router.handle("^/readyz$", crate::health::readiness).unwrap();

        let resp = router.dispatch(Request::get("/healthz")).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, b"ok".to_vec());

        let resp = router.dispatch(Request::get("/readyz")).await;
        assert_eq!(resp.body, b"ready".to_vec());
    }
}
