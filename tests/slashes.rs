use trailhead::middleware::{RedirectSlashes, StripSlashes};
use trailhead::{Method, Request, Response, Router, Service, Status};

async fn nothing_here(_req: Request) -> Response {
    Response::builder().status(Status::NotFound).text("nothing here")
}

async fn root(_req: Request) -> &'static str {
    "root"
}

async fn account_id(req: Request) -> String {
    req.param("accountID").unwrap_or("missing").to_owned()
}

async fn get(app: &Service, target: &str) -> (u16, String) {
    let res = app.call(Request::new(Method::Get, target)).await;
    (res.status_code(), String::from_utf8_lossy(res.body()).into_owned())
}

fn stripping() -> Service {
    Router::new()
        .with(StripSlashes)
        .not_found(nothing_here)
        .get("/", root)
        .route("/accounts/{accountID}", |r| r.get("/", account_id))
        .into_service()
}

#[tokio::test]
async fn strip_slashes_at_root() {
    let app = stripping();

    assert_eq!(get(&app, "/").await, (200, "root".into()));
    assert_eq!(get(&app, "//").await, (200, "root".into()));
    assert_eq!(get(&app, "/accounts/admin").await, (200, "admin".into()));
    assert_eq!(get(&app, "/accounts/admin/").await, (200, "admin".into()));
    assert_eq!(get(&app, "/nothing-here").await, (404, "nothing here".into()));
}

#[tokio::test]
async fn strip_slashes_on_a_flat_route() {
    let app = Router::new()
        .with(StripSlashes)
        .not_found(nothing_here)
        .get("/accounts/{id}", |req: Request| async move {
            req.param("id").unwrap_or("").to_owned()
        })
        .into_service();

    assert_eq!(get(&app, "/accounts/admin/").await, (200, "admin".into()));
    assert_eq!(get(&app, "/accounts/admin").await, (200, "admin".into()));
}

#[tokio::test]
async fn strip_slashes_matches_canonical_response() {
    let app = Router::new()
        .with(StripSlashes)
        .not_found(nothing_here)
        .get("/a", |_req: Request| async { "a" })
        .post("/b", |_req: Request| async { Status::Created })
        .into_service();

    for path in ["/a", "/b", "/c", "/a/b"] {
        let canonical = get(&app, path).await;
        let slashed = get(&app, &format!("{path}/")).await;
        assert_eq!(slashed, canonical, "{path}/");
    }
}

#[tokio::test]
async fn strip_slashes_leaves_query_untouched() {
    let app = Router::new()
        .with(StripSlashes)
        .get("/search", |req: Request| async move {
            format!("{} {}", req.path(), req.query())
        })
        .into_service();

    assert_eq!(
        get(&app, "/search/?q=a%2Fb&q=c").await,
        (200, "/search q=a%2Fb&q=c".into())
    );
}

#[tokio::test]
async fn strip_slashes_only_removes_one_slash() {
    let app = stripping();

    // `/accounts/admin//` becomes `/accounts/admin/`, which the mount routes
    // to the sub-router's index.
    assert_eq!(get(&app, "/accounts/admin//").await, (200, "admin".into()));
    // `///` becomes `//`, which has no route.
    assert_eq!(get(&app, "///").await, (404, "nothing here".into()));
}

#[tokio::test]
async fn strip_slashes_inside_a_route() {
    let app = Router::new()
        .not_found(nothing_here)
        .get("/hi", |_req: Request| async { "hi" })
        .route("/accounts/{accountID}", |r| {
            r.with(StripSlashes)
                .get("/", |_req: Request| async { "accounts index" })
                .get("/query", account_id)
        })
        .into_service();

    assert_eq!(get(&app, "/hi").await, (200, "hi".into()));
    assert_eq!(get(&app, "/hi/").await, (404, "nothing here".into()));
    assert_eq!(get(&app, "/accounts/admin").await, (200, "accounts index".into()));
    assert_eq!(get(&app, "/accounts/admin/").await, (200, "accounts index".into()));
    assert_eq!(get(&app, "/accounts/admin/query").await, (200, "admin".into()));
    assert_eq!(get(&app, "/accounts/admin/query/").await, (200, "admin".into()));
}

#[tokio::test]
async fn strip_slashes_rewrites_full_path_inside_a_route() {
    let app = Router::new()
        .route("/accounts/{id}", |r| {
            r.with(StripSlashes).get("/query", |req: Request| async move {
                format!("{} {}", req.path(), req.route_path())
            })
        })
        .into_service();

    assert_eq!(
        get(&app, "/accounts/admin/query/").await,
        (200, "/accounts/admin/query /query".into())
    );
}

fn redirecting() -> Service {
    Router::new()
        .with(RedirectSlashes)
        .not_found(nothing_here)
        .get("/", root)
        .route("/accounts/{accountID}", |r| r.get("/", account_id))
        .into_service()
}

#[tokio::test]
async fn redirect_slashes_passes_canonical_paths() {
    let app = redirecting();

    assert_eq!(get(&app, "/").await, (200, "root".into()));
    assert_eq!(get(&app, "/accounts/admin").await, (200, "admin".into()));
    assert_eq!(get(&app, "/nothing-here").await, (404, "nothing here".into()));
}

#[tokio::test]
async fn redirect_slashes_location() {
    let app = redirecting();

    let res = app.call(Request::new(Method::Get, "/accounts/someuser/")).await;
    assert_eq!(res.status_code(), 301);
    assert_eq!(res.header("location"), Some("/accounts/someuser"));

    let res = app.call(Request::new(Method::Get, "//")).await;
    assert_eq!(res.status_code(), 301);
    assert_eq!(res.header("location"), Some("/"));
}

#[tokio::test]
async fn redirect_slashes_keeps_query() {
    let app = redirecting();

    let res = app.call(Request::new(Method::Get, "/accounts/someuser/?a=1&b=2")).await;
    assert_eq!(res.status_code(), 301);
    assert_eq!(res.header("location"), Some("/accounts/someuser?a=1&b=2"));

    let res = app.call(Request::new(Method::Get, "/x/?b=2&a=%201")).await;
    assert_eq!(res.header("location"), Some("/x?b=2&a=%201"));
}

#[tokio::test]
async fn redirect_slashes_skips_not_found() {
    // No route for `/missing` either; the redirect still happens.
    let app = redirecting();

    let res = app.call(Request::new(Method::Delete, "/missing/")).await;
    assert_eq!(res.status_code(), 301);
    assert!(res.body().is_empty());
}

#[tokio::test]
async fn redirect_slashes_inside_a_route() {
    let app = Router::new()
        .not_found(nothing_here)
        .get("/hi", |_req: Request| async { "hi" })
        .route("/accounts/{accountID}", |r| {
            r.with(RedirectSlashes).get("/query", account_id)
        })
        .into_service();

    let res = app.call(Request::new(Method::Get, "/accounts/admin/query/?x=1")).await;
    assert_eq!(res.status_code(), 301);
    assert_eq!(res.header("location"), Some("/accounts/admin/query?x=1"));

    assert_eq!(get(&app, "/hi/").await, (404, "nothing here".into()));
}
