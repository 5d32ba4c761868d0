//! Minimal remux example — regex routes, captures, health checks.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl http://localhost:3000/posts/7/hello-world
//!   curl http://localhost:3000/healthz
//!   curl http://localhost:3000/nope          # → 404

use remux::{Args, Kwargs, Request, Response, Router, Server, health};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut app = Router::new();
    app.handle(r"^/users/(?P<id>[0-9]+)$", get_user).expect("route");
    app.handle(r"^/posts/([0-9]+)/(?P<slug>[a-z0-9-]+)$", get_post).expect("route");
    app.handle("^/healthz$", health::liveness).expect("route");
    app.handle("^/readyz$", health::readiness).expect("route");

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// GET /users/42 — the named group lands in kwargs.
async fn get_user(_req: Request, _args: Args, kwargs: Kwargs) -> Response {
    let id = &kwargs["id"];
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes())
}

// GET /posts/7/hello-world — unnamed groups are positional only:
// args[0] is the whole match, args[1] the post id; the slug is named.
async fn get_post(_req: Request, args: Args, kwargs: Kwargs) -> Response {
    let id = &args[1];
    let slug = &kwargs["slug"];
    Response::json(format!(r#"{{"id":"{id}","slug":"{slug}"}}"#).into_bytes())
}
