// Integration tests for the Ollama client against a local fake server

use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine as _;
use image_rename::{InferenceClient, InferenceConfig, InferenceError, OllamaClient};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: String,
}

impl Reply {
    fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }
}

/// Answers every request with `reply` and keeps the request bodies it saw.
async fn spawn_server(reply: Reply) -> (String, Arc<Mutex<Vec<(String, String)>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let (path, body) = read_request(&mut stream).await;
            log.lock().unwrap().push((path, body));

            let response = format!(
                "HTTP/1.1 {} Fake\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                reply.body.len(),
                reply.body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://{}", addr), seen)
}

async fn read_request(stream: &mut TcpStream) -> (String, String) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return (String::new(), String::new());
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_string();
        let length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < end + 4 + length {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
        let body = String::from_utf8_lossy(&buf[end + 4..]).to_string();
        return (path, body);
    }
}

fn client_for(endpoint: &str, model: &str, timeout: Duration) -> OllamaClient {
    OllamaClient::new(&InferenceConfig {
        endpoint: endpoint.to_string(),
        model: model.to_string(),
        timeout,
    })
    .unwrap()
}

#[tokio::test]
async fn test_description_request_and_response() {
    let (endpoint, seen) = spawn_server(Reply::ok(r#"{"model":"llava","response":"red car","done":true}"#)).await;
    let client = client_for(&endpoint, "llava", Duration::from_secs(5));

    let image = [0xffu8, 0xd8, 0xff, 0xe0, 1, 2, 3];
    let label = client.request_description(&image, "describe it").await.unwrap();
    assert_eq!(label, "red car");

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let (path, body) = &requests[0];
    assert_eq!(path, "/api/generate");

    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["model"], "llava");
    assert_eq!(json["prompt"], "describe it");
    assert_eq!(json["stream"], false);
    assert_eq!(
        json["images"][0],
        base64::engine::general_purpose::STANDARD.encode(image)
    );
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (endpoint, _) = spawn_server(Reply {
        status: 500,
        body: r#"{"error":"boom"}"#.to_string(),
    })
    .await;
    let client = client_for(&endpoint, "llava", Duration::from_secs(5));

    match client.request_description(b"img", "p").await {
        Err(InferenceError::Status { code, body }) => {
            assert_eq!(code, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let (endpoint, _) = spawn_server(Reply::ok("this is not json")).await;
    let client = client_for(&endpoint, "llava", Duration::from_secs(5));

    let result = client.request_description(b"img", "p").await;
    assert!(matches!(result, Err(InferenceError::Malformed(_))), "{:?}", result);
}

#[tokio::test]
async fn test_error_field_in_success_body() {
    let (endpoint, _) = spawn_server(Reply::ok(r#"{"error":"model 'llava' not found"}"#)).await;
    let client = client_for(&endpoint, "llava", Duration::from_secs(5));

    match client.request_description(b"img", "p").await {
        Err(InferenceError::Malformed(message)) => assert!(message.contains("not found")),
        other => panic!("expected malformed error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = client_for(&endpoint, "llava", Duration::from_secs(5));

    let result = client.request_description(b"img", "p").await;
    assert!(matches!(result, Err(InferenceError::Unreachable(_))), "{:?}", result);

    let availability = client.check_availability().await;
    assert!(!availability.available);
    assert!(availability.detail.starts_with("cannot reach"));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let client = client_for(&endpoint, "llava", Duration::from_millis(200));

    let result = client.request_description(b"img", "p").await;
    assert!(matches!(result, Err(InferenceError::Timeout)), "{:?}", result);
}

#[tokio::test]
async fn test_model_available() {
    let (endpoint, seen) = spawn_server(Reply::ok(
        r#"{"models":[{"name":"moondream:latest"},{"name":"llava:13b"}]}"#,
    ))
    .await;
    let client = client_for(&endpoint, "llava", Duration::from_secs(5));

    let availability = client.check_availability().await;
    assert!(availability.available);
    assert_eq!(availability.detail, "llava ready");
    assert_eq!(seen.lock().unwrap()[0].0, "/api/tags");
}

#[tokio::test]
async fn test_model_not_installed() {
    let (endpoint, _) = spawn_server(Reply::ok(r#"{"models":[{"name":"moondream:latest"}]}"#)).await;
    let client = client_for(&endpoint, "llava", Duration::from_secs(5));

    let availability = client.check_availability().await;
    assert!(!availability.available);
    assert_eq!(availability.detail, "llava not installed (found: moondream:latest)");
}

#[tokio::test]
async fn test_trailing_slash_in_endpoint() {
    let (endpoint, seen) = spawn_server(Reply::ok(r#"{"response":"x"}"#)).await;
    let client = client_for(&format!("{}/", endpoint), "llava", Duration::from_secs(5));

    client.request_description(b"img", "p").await.unwrap();
    assert_eq!(seen.lock().unwrap()[0].0, "/api/generate");
}
