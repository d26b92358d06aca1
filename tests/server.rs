use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use trailhead::middleware::{RedirectSlashes, StripSlashes};
use trailhead::{Request, Router, Server};

async fn exchange(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    String::from_utf8(raw).unwrap()
}

#[tokio::test]
async fn serves_over_a_socket_and_shuts_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/accounts/{id}", |r| {
            r.with(StripSlashes).get("/", |req: Request| async move {
                req.param("id").unwrap_or("").to_owned()
            })
        })
        .route("/old", |r| r.with(RedirectSlashes));

    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(
        Server::from_listener(listener).serve_with_shutdown(app, async {
            let _ = stopped.await;
        }),
    );

    let res = exchange(
        addr,
        "GET /accounts/admin/ HTTP/1.1\r\nhost: test\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 200 OK"), "{res}");
    assert!(res.ends_with("admin"), "{res}");

    let res = exchange(
        addr,
        "GET /old/page/?a=1&b=2 HTTP/1.1\r\nhost: test\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 301 Moved Permanently"), "{res}");
    assert!(res.contains("location: /old/page?a=1&b=2\r\n"), "{res}");

    let res = exchange(
        addr,
        "BREW /pot HTTP/1.1\r\nhost: test\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 405"), "{res}");

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
