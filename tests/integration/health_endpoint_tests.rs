//! Integration tests for the HTTP health endpoint.
//!
//! The endpoint reflects the Socket Mode connection flag: `200 OK` when
//! the connection is live, `503` otherwise. Uses an ephemeral port to
//! avoid conflicts with running instances.

use tracker_intercom::health::{router, ConnectionStatus};

/// Mount the health router on an ephemeral port, returning the base URL.
async fn spawn_server(status: ConnectionStatus) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router(status)).await;
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn health_reports_down_before_any_connection() {
    let status = ConnectionStatus::default();
    let base = spawn_server(status).await;

    let response = reqwest::get(format!("{base}/health"))
        .await
        .expect("request succeeds");
    assert_eq!(response.status().as_u16(), 503);
}

#[tokio::test]
async fn health_reports_ok_while_connected() {
    let status = ConnectionStatus::default();
    let base = spawn_server(status.clone()).await;

    status.set_connected(true);

    let response = reqwest::get(format!("{base}/health"))
        .await
        .expect("request succeeds");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.expect("body"), "ok");
}

#[tokio::test]
async fn health_flips_back_to_down_after_disconnect() {
    let status = ConnectionStatus::default();
    let base = spawn_server(status.clone()).await;

    status.set_connected(true);
    let up = reqwest::get(format!("{base}/health"))
        .await
        .expect("request succeeds");
    assert_eq!(up.status().as_u16(), 200);

    status.set_connected(false);
    let down = reqwest::get(format!("{base}/health"))
        .await
        .expect("request succeeds");
    assert_eq!(down.status().as_u16(), 503);
}
