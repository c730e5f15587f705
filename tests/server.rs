use std::sync::Arc;

use snippetbox::app::App;
use snippetbox::models::{MemorySnippets, MemoryUsers};
use snippetbox::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

async fn roundtrip(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn serves_over_tcp_and_shuts_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let static_dir = tempfile::tempdir().unwrap();
    let app = App::new(
        Arc::new(MemorySnippets::new()),
        Arc::new(MemoryUsers::new(4)),
        static_dir.path(),
    )
    .routes();

    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(Server::bind(addr).serve_on(listener, app, async {
        let _ = stopped.await;
    }));

    let body = "title=hello&content=world&expires=1";
    let created = roundtrip(
        addr,
        &format!(
            "POST /snippet/create HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\
             content-type: application/x-www-form-urlencoded\r\ncontent-length: {}\r\n\r\n{body}",
            body.len()
        ),
    )
    .await;
    assert!(created.starts_with("HTTP/1.1 303"), "{created}");
    assert!(created.to_ascii_lowercase().contains("location: /snippet/view/1"), "{created}");

    let viewed = roundtrip(
        addr,
        "GET /snippet/view/1 HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert!(viewed.starts_with("HTTP/1.1 200 OK"), "{viewed}");
    assert!(viewed.contains(r#""title":"hello""#), "{viewed}");

    let missing = roundtrip(addr, "GET /nope HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n").await;
    assert!(missing.starts_with("HTTP/1.1 404"), "{missing}");

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
