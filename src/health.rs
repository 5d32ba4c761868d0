//! Built-in health-check handlers.
//!
//! | Probe | Typical route | Question |
//! |---|---|---|
//! | **Liveness** | `^/healthz$` | Is the process alive? Failure → restart. |
//! | **Readiness** | `^/readyz$` | Can it serve traffic? Failure → pulled from the load-balancer. |
//!
//! Nothing registers these for you — routes are entirely caller-configured:
//!
//! ```rust,no_run
//! use remux::{Router, health};
//!
//! # fn main() -> Result<(), remux::Error> {
//! let mut app = Router::new();
//! app.handle("^/healthz$", health::liveness)?;
//! app.handle("^/readyz$", health::readiness)?;
//! # Ok(())
//! # }
//! ```
//!
//! Override `readiness` with a custom handler if you need to gate on
//! dependency availability (database connections, downstream services, etc.).

use crate::request::Request;
use crate::response::Response;
use crate::rule::{Args, Kwargs};

/// Liveness probe handler.
///
/// Always returns `200 OK` with body `"ok"`. If the process can respond to
/// HTTP at all, it is alive — this handler intentionally has no dependencies.
pub async fn liveness(_req: Request, _args: Args, _kwargs: Kwargs) -> Response {
    Response::text("ok")
}

/// Readiness probe handler (default implementation).
///
/// Returns `200 OK` with body `"ready"`. Replace this with your own handler
/// if your application needs a warm-up period or must verify dependency
/// health before accepting traffic.
pub async fn readiness(_req: Request, _args: Args, _kwargs: Kwargs) -> Response {
    Response::text("ready")
}
