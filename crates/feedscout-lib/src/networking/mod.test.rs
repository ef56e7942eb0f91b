// Tests for the reqwest-backed feed client: status pass-through, auth
// headers, and backoff on 429

use super::*;
use mockito::Server;
use std::time::Instant;

fn fast_manager(max_retries: u32) -> NetworkingManager {
    NetworkingManager::new(NetworkingConfig {
        timeout_seconds: 5,
        backoff: BackoffConfig {
            initial: Duration::from_millis(10),
            max: Duration::from_millis(40),
            multiplier: 2.0,
            max_retries,
        },
    })
    .unwrap()
}

#[test]
fn test_backoff_is_capped() {
    let backoff = BackoffConfig {
        initial: Duration::from_millis(100),
        max: Duration::from_millis(300),
        multiplier: 2.0,
        max_retries: 3,
    };

    let second = backoff.next_delay(backoff.initial);
    assert_eq!(second, Duration::from_millis(200));
    assert_eq!(backoff.next_delay(second), Duration::from_millis(300));
}

#[test]
fn test_response_success_range() {
    let ok = HttpResponse {
        status: 204,
        body: vec![],
    };
    let missing = HttpResponse {
        status: 404,
        body: vec![],
    };
    assert!(ok.is_success());
    assert!(!missing.is_success());
}

#[tokio::test]
async fn test_non_success_status_is_not_an_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body("gone")
        .create_async()
        .await;

    let manager = fast_manager(0);
    let response = manager
        .get(&format!("{}/missing", server.url()), None)
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.body, b"gone");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_auth_header_is_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/private")
        .match_header("authorization", "Bearer token-123")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let manager = fast_manager(0);
    let auth = AuthHeader::authorization("Bearer token-123");
    let response = manager
        .get(&format!("{}/private", server.url()), Some(&auth))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_retry_on_429_then_success() {
    let mut server = Server::new_async().await;

    // First two requests return 429, third succeeds
    let limited_1 = server
        .mock("GET", "/index")
        .with_status(429)
        .expect(1)
        .create_async()
        .await;
    let limited_2 = server
        .mock("GET", "/index")
        .with_status(429)
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("GET", "/index")
        .with_status(200)
        .with_body("payload")
        .expect(1)
        .create_async()
        .await;

    let manager = fast_manager(3);
    let start = Instant::now();
    let response = manager
        .get(&format!("{}/index", server.url()), None)
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"payload");
    // 10ms + 20ms of backoff
    assert!(start.elapsed() >= Duration::from_millis(30));

    limited_1.assert_async().await;
    limited_2.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_retry_limit_exhaustion() {
    let mut server = Server::new_async().await;
    let limited = server
        .mock("GET", "/index")
        .with_status(429)
        .expect(3)
        .create_async()
        .await;

    let manager = fast_manager(2);
    let result = manager
        .get(&format!("{}/index", server.url()), None)
        .await;

    assert!(matches!(
        result,
        Err(NetworkingError::RateLimited { retries: 2, .. })
    ));
    limited.assert_async().await;
}
