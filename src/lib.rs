//! # remux
//!
//! A minimal regex-routed HTTP framework. One ordered pattern table, first
//! match wins. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Routes are plain regular expressions, tried in registration order. A
//! pattern's capture groups become the handler's arguments: every group by
//! position (the full match at index 0), the `(?P<name>...)` groups by name.
//! There is no middleware stack, no per-method table, no priority scheme
//! beyond "you registered it first". The first rule that matches handles the
//! request; if none does, the client gets a `404 Not Found`.
//!
//! Patterns are tried *unanchored*, exactly like the regex engine itself:
//! `"/users/"` also matches `/api/users/42`. Anchor with `^` and `$` when
//! you mean the whole path — most routes should.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use remux::{Args, Kwargs, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut app = Router::new();
//!     app.handle(r"^/users/(?P<id>[0-9]+)$", get_user).unwrap();
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_user(_req: Request, _args: Args, kwargs: Kwargs) -> Response {
//!     let id = &kwargs["id"];
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//! ```
//!
//! ## The default router
//!
//! For small binaries a process-wide router avoids threading a value through
//! `main`. [`handle`], [`serve`] and [`serve_tls`] at the crate root forward
//! to one shared table:
//!
//! ```rust,no_run
//! # use remux::{Args, Kwargs, Request, Response};
//! # async fn get_user(_req: Request, _args: Args, _kwargs: Kwargs) -> Response { Response::text("") }
//! #[tokio::main]
//! async fn main() {
//!     remux::handle(r"^/users/(?P<id>[0-9]+)$", get_user).unwrap();
//!     remux::serve("0.0.0.0:3000").await.unwrap();
//! }
//! ```
//!
//! The shared table is a single mutable, process-wide value: every [`handle`]
//! call mutates the same router, wherever it is called from. Register
//! everything before calling [`serve`]. [`Router`] itself stays a plain
//! value type — tests and larger applications should build their own rather
//! than go through the shared instance.

mod error;
mod handler;
mod request;
mod response;
mod router;
mod rule;
mod server;
mod tls;

pub mod health;

pub use error::Error;
pub use handler::Handler;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response};
pub use router::Router;
pub use rule::{Args, Kwargs, Rule};
pub use server::Server;

use std::sync::RwLock;

/// The process-wide default router behind [`handle`], [`serve`] and
/// [`serve_tls`]: one shared mutable rule table for the life of the process.
static DEFAULT: RwLock<Router> = RwLock::new(Router::new());

/// Registers `pattern` → `handler` on the process-wide default router.
///
/// See [`Router::handle`]. All callers share one table, so registration
/// order across the whole process is match-priority order. A pattern that
/// fails to compile is reported here and registers nothing — treat that as a
/// startup configuration error, not something to mask.
pub fn handle(pattern: &str, handler: impl Handler) -> Result<(), Error> {
    DEFAULT.write().expect("default router lock poisoned").handle(pattern, handler)
}

/// Serves the process-wide default router on `addr`.
///
/// Snapshots the shared table at call time: complete every [`handle`]
/// registration first. Blocks until shutdown; see [`Server::serve`].
pub async fn serve(addr: &str) -> Result<(), Error> {
    let router = DEFAULT.read().expect("default router lock poisoned").clone();
    Server::bind(addr).serve(router).await
}

/// Serves the process-wide default router on `addr` with TLS.
///
/// See [`serve`] for the snapshot semantics and [`Server::serve_tls`] for
/// the certificate requirements.
pub async fn serve_tls(addr: &str, cert_file: &str, key_file: &str) -> Result<(), Error> {
    let router = DEFAULT.read().expect("default router lock poisoned").clone();
    Server::bind(addr).serve_tls(router, cert_file, key_file).await
}
