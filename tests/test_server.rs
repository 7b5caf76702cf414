use std::time::Duration;

use pennant::config::Config;
use pennant::proxy::Upstream;
use pennant::routes::DemoHandler;
use pennant::server::{Server, ServerError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn start() -> Server {
    let cfg = Config {
        listen_addr: "127.0.0.1:0".to_string(),
        max_head_bytes: 256,
        ..Config::default()
    };
    let upstream = Upstream::new("http://127.0.0.1:1/", Duration::from_millis(100)).unwrap();

    Server::bind(&cfg, DemoHandler::new(upstream)).await.unwrap()
}

async fn roundtrip(server: &Server, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn test_server_serves_request() {
    let server = start().await;

    let response = roundtrip(&server, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("connection: close\r\n"));
    assert!(response.contains("<h1>Success!</h1>"));

    server.close().unwrap();
    server.stopped().await;
}

#[tokio::test]
async fn test_server_serves_request_sent_in_pieces() {
    let server = start().await;

    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
    let pieces: [&[u8]; 4] = [b"GET /yourpro", b"blem HTTP/1.1\r\nHo", b"st: x\r\n", b"\r\n"];
    for piece in pieces {
        stream.write_all(piece).await.unwrap();
        stream.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(response.contains("<h1>Bad Request</h1>"));

    server.close().unwrap();
}

#[tokio::test]
async fn test_server_rejects_malformed_request() {
    let server = start().await;

    let response = roundtrip(&server, b"get / HTTP/1.1\r\n\r\n").await;

    assert_eq!(
        response,
        "HTTP/1.1 400 Bad Request\r\ncontent-length: 0\r\nconnection: close\r\ncontent-type: text/plain\r\n\r\n"
    );

    server.close().unwrap();
}

#[tokio::test]
async fn test_server_rejects_oversized_head() {
    let server = start().await;

    // Exactly what the server reads before its 256-byte buffer is full: the
    // 16-byte request line is consumed, the unfinished header line is not.
    let mut request = b"GET / HTTP/1.1\r\nX-Filler: ".to_vec();
    request.resize(16 + 256, b'a');

    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
    stream.write_all(&request).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8_lossy(&response);
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    server.close().unwrap();
}

#[tokio::test]
async fn test_server_close_is_idempotent() {
    let server = start().await;
    assert!(server.is_running());

    server.close().unwrap();
    assert!(!server.is_running());
    assert!(matches!(server.close(), Err(ServerError::AlreadyClosed)));

    let addr = server.local_addr();
    server.stopped().await;

    // The listening socket is gone once the accept loop has exited.
    assert!(TcpStream::connect(addr).await.is_err());
}
