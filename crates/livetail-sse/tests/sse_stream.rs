//! Integration tests against a real SSE server on an ephemeral port.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::response::sse::{Event, Sse};
use axum::routing::get;
use futures_util::stream;
use tokio::time::timeout;

use livetail_core::{LogStreamConnector, LogStreamController, LogLevel};
use livetail_sse::{SseConfig, SseConnector};

/// Serve the given event payloads on `/session/consume`, then close the
/// stream. Returns the bound address.
async fn serve_events(payloads: Vec<&'static str>) -> SocketAddr {
    let app = Router::new().route(
        "/session/consume",
        get(move || {
            let payloads = payloads.clone();
            async move {
                let events = payloads
                    .into_iter()
                    .map(|payload| Ok::<_, Infallible>(Event::default().data(payload)));
                Sse::new(stream::iter(events))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn connector_for(addr: SocketAddr) -> SseConnector {
    SseConnector::new(&SseConfig::new(format!("http://{addr}/"))).unwrap()
}

#[tokio::test]
async fn malformed_payloads_do_not_end_the_stream() {
    let addr = serve_events(vec![
        "not json",
        r#"{"message":"not an array"}"#,
        r#"[{"message":"survivor","timestamp":"2026-01-01T00:00:00Z","log_level":"INFO"}]"#,
    ])
    .await;

    let connector = connector_for(addr);
    let mut transport = connector.connect("session-1").await.unwrap();

    // The two malformed payloads are dropped; the valid batch arrives
    let batch = timeout(Duration::from_secs(5), transport.next_batch())
        .await
        .expect("batch in time")
        .expect("stream still open");
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].message, "survivor");
    assert_eq!(batch[0].level, LogLevel::Info);

    // Server closes after its events: the sequence is over
    let end = timeout(Duration::from_secs(5), transport.next_batch())
        .await
        .expect("stream end in time");
    assert!(end.is_none());
}

#[tokio::test]
async fn batches_arrive_in_order() {
    let addr = serve_events(vec![
        r#"[{"message":"one","timestamp":"t1","log_level":"DEBUG"},{"message":"two","timestamp":"t2","log_level":"WARN"}]"#,
        r#"[{"message":"three","timestamp":"t3","log_level":"ERROR"}]"#,
    ])
    .await;

    let connector = connector_for(addr);
    let mut transport = connector.connect("session-1").await.unwrap();

    let first = timeout(Duration::from_secs(5), transport.next_batch())
        .await
        .unwrap()
        .unwrap();
    let messages: Vec<&str> = first.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, ["one", "two"]);

    let second = timeout(Duration::from_secs(5), transport.next_batch())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second[0].message, "three");
    assert_eq!(second[0].level, LogLevel::Error);
}

#[tokio::test]
async fn missing_route_rejects_the_subscription() {
    let app = Router::new();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let connector = connector_for(addr);
    let result = connector.connect("session-1").await;
    assert!(matches!(
        result,
        Err(livetail_core::TransportError::Rejected { status: 404 })
    ));
}

#[tokio::test]
async fn controller_consumes_an_sse_stream_end_to_end() {
    let addr = serve_events(vec![
        r#"[{"message":"boot","timestamp":"t1","log_level":"INFO"}]"#,
        "not json",
        r#"[{"message":"ready","timestamp":"t2","log_level":"INFO"},{"message":"warned","timestamp":"t3","log_level":"WARN"}]"#,
    ])
    .await;

    let connector = Arc::new(connector_for(addr));
    let controller = LogStreamController::new("session-1", connector);
    controller.start().await;

    // The stream ends after the served events; the controller returns
    // to idle with the full history retained
    timeout(Duration::from_secs(5), async {
        while controller.is_streaming() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("controller back to idle in time");

    let snapshot = controller.snapshot();
    let messages: Vec<&str> = snapshot.entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, ["boot", "ready", "warned"]);

    // Ids were assigned client-side and are distinct
    let mut ids: Vec<&str> = snapshot.entries.iter().map(|e| e.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}
