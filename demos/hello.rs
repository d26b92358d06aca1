//! Hello-world with trailing-slash handling.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example hello
//!
//! Try:
//!   curl -i http://localhost:3333/
//!   curl -i http://localhost:3333/accounts/admin/
//!   curl -i 'http://localhost:3333/docs/intro/?lang=en'
//!   curl -i http://localhost:3333/nothing-here

use trailhead::middleware::{RedirectSlashes, RequestId, StripSlashes, Trace};
use trailhead::{Request, Response, Router, Server, Status};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .with(RequestId::new())
        .with(Trace)
        .not_found(nothing_here)
        .get("/", hello)
        // `/accounts/admin/settings/` is served as `/accounts/admin/settings`.
        .route("/accounts/{id}", |r| {
            r.with(StripSlashes)
                .get("/", account)
                .get("/settings", settings)
        })
        // `/docs/intro/?lang=en` is answered `301 Location: /docs/intro?lang=en`.
        .route("/docs", |r| r.with(RedirectSlashes).get("/{page}", doc_page));

    Server::bind("0.0.0.0:3333")
        .serve(app)
        .await
        .expect("server error");
}

async fn hello(_req: Request) -> &'static str {
    "hello world"
}

// GET /accounts/{id}
async fn account(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
}

// GET /accounts/{id}/settings
async fn settings(req: Request) -> String {
    format!("settings for {}", req.param("id").unwrap_or("unknown"))
}

// GET /docs/{page}
async fn doc_page(req: Request) -> String {
    format!("page {}", req.param("page").unwrap_or(""))
}

async fn nothing_here(_req: Request) -> Response {
    Response::builder().status(Status::NotFound).text("nothing here")
}
