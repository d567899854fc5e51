//! End-to-end tests against a live gateway on an ephemeral port.

#![allow(clippy::panic, clippy::indexing_slicing, missing_docs)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use courier_gateway::config::GatewayConfig;
use courier_gateway::dispatch::HandlerRegistry;
use courier_gateway::domain::Connection;
use courier_gateway::error::GatewayError;
use courier_gateway::handlers::register_builtin;
use courier_gateway::server::{build_registry, build_state, serve};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_gateway() -> SocketAddr {
    let Ok(registry) = build_registry() else {
        panic!("registry build failed");
    };
    spawn_gateway_with(registry).await
}

async fn spawn_gateway_with(registry: HandlerRegistry) -> SocketAddr {
    let state = build_state(&GatewayConfig::default(), registry);
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = serve(listener, state).await;
    });
    addr
}

async fn connect(addr: SocketAddr) -> Ws {
    connect_url(&format!("ws://{addr}/ws")).await
}

async fn connect_url(url: &str) -> Ws {
    let Ok((ws, _)) = tokio_tungstenite::connect_async(url).await else {
        panic!("ws connect failed: {url}");
    };
    ws
}

async fn recv_json(ws: &mut Ws) -> Value {
    loop {
        let next = tokio::time::timeout(Duration::from_secs(5), ws.next()).await;
        let Ok(Some(Ok(msg))) = next else {
            panic!("no response frame");
        };
        match msg {
            Message::Text(text) => {
                let Ok(value) = serde_json::from_str(text.as_str()) else {
                    panic!("response is not JSON: {text}");
                };
                return value;
            }
            Message::Ping(_) | Message::Pong(_) => {}
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

async fn request(ws: &mut Ws, text: &str) -> Value {
    if ws.send(Message::text(text)).await.is_err() {
        panic!("ws send failed");
    }
    recv_json(ws).await
}

async fn assert_no_pending_frame(ws: &mut Ws) {
    let next = tokio::time::timeout(Duration::from_millis(100), ws.next()).await;
    assert!(next.is_err(), "unexpected extra frame: {next:?}");
}

#[tokio::test]
async fn send_message_round_trip() {
    let addr = spawn_gateway().await;
    let mut ws = connect(addr).await;

    let response = request(
        &mut ws,
        r#"{"type":"send_message","payload":{"content":"hi"}}"#,
    )
    .await;
    assert_eq!(
        response,
        json!({
            "type": "message_confirmation",
            "payload": { "status": "ok", "content": "Message \"hi\" received." }
        })
    );
}

#[tokio::test]
async fn test_probe_round_trip() {
    let addr = spawn_gateway().await;
    let mut ws = connect(addr).await;

    let response = request(&mut ws, r#"{"type":"test"}"#).await;
    assert_eq!(
        response,
        json!({ "type": "test_response", "payload": { "message": "Test successful!" } })
    );
}

#[tokio::test]
async fn errors_keep_connection_open() {
    let addr = spawn_gateway().await;
    let mut ws = connect(addr).await;

    let response = request(&mut ws, "this is not json").await;
    assert_eq!(
        response,
        json!({ "type": "error", "payload": { "message": "Invalid JSON format" } })
    );

    let response = request(&mut ws, r#"{"type":"launch_rockets","payload":{}}"#).await;
    assert_eq!(
        response,
        json!({ "type": "error", "payload": { "message": "Unknown message type: launch_rockets" } })
    );

    let response = request(
        &mut ws,
        r#"{"type":"send_message","payload":{"content":""}}"#,
    )
    .await;
    assert_eq!(response["type"], "error");
    assert_eq!(response["payload"]["message"], "Validation failed");
    assert!(response["payload"]["errors"]["content"].is_array());

    // Still usable after three failures.
    let response = request(&mut ws, r#"{"type":"test"}"#).await;
    assert_eq!(response["type"], "test_response");
}

#[tokio::test]
async fn binary_frames_are_dispatched() {
    let addr = spawn_gateway().await;
    let mut ws = connect(addr).await;

    let frame = br#"{"type":"send_message","payload":{"content":"bytes"}}"#.to_vec();
    if ws.send(Message::binary(frame)).await.is_err() {
        panic!("ws send failed");
    }
    let response = recv_json(&mut ws).await;
    assert_eq!(response["payload"]["content"], "Message \"bytes\" received.");

    if ws.send(Message::binary(vec![0xff, 0xfe])).await.is_err() {
        panic!("ws send failed");
    }
    let response = recv_json(&mut ws).await;
    assert_eq!(response["payload"]["message"], "Invalid JSON format");
}

#[tokio::test]
async fn same_envelope_twice_yields_identical_responses() {
    let addr = spawn_gateway().await;
    let mut ws = connect(addr).await;

    let frame = r#"{"type":"send_message","payload":{"content":"twice"}}"#;
    let first = request(&mut ws, frame).await;
    let second = request(&mut ws, frame).await;
    assert_eq!(first, second);
    assert_no_pending_frame(&mut ws).await;
}

#[tokio::test]
async fn concurrent_connections_receive_only_their_own_responses() {
    let addr = spawn_gateway().await;

    let mut tasks = Vec::new();
    for i in 0..16 {
        tasks.push(tokio::spawn(async move {
            let mut ws = connect(addr).await;

            let response = request(&mut ws, r#"{"type":"test"}"#).await;
            assert_eq!(response["type"], "test_response");

            let frame = json!({ "type": "send_message", "payload": { "content": format!("client-{i}") } });
            let response = request(&mut ws, &frame.to_string()).await;
            assert_eq!(
                response["payload"]["content"],
                format!("Message \"client-{i}\" received.")
            );

            assert_no_pending_frame(&mut ws).await;
        }));
    }

    for task in tasks {
        assert!(task.await.is_ok(), "client task failed");
    }
}

#[tokio::test]
async fn health_and_types_endpoints() {
    let addr = spawn_gateway().await;

    let Ok(response) = reqwest::get(format!("http://{addr}/health")).await else {
        panic!("health request failed");
    };
    assert!(response.status().is_success());
    let Ok(body) = response.json::<Value>().await else {
        panic!("health body is not JSON");
    };
    assert_eq!(body["status"], "healthy");

    let Ok(response) = reqwest::get(format!("http://{addr}/types")).await else {
        panic!("types request failed");
    };
    let Ok(body) = response.json::<Value>().await else {
        panic!("types body is not JSON");
    };
    assert_eq!(body, json!({ "types": ["send_message", "test"] }));
}

#[tokio::test]
async fn root_path_upgrades_like_reference_client() {
    let addr = spawn_gateway().await;
    let mut ws = connect_url(&format!("ws://{addr}")).await;

    let response = request(
        &mut ws,
        r#"{"type":"send_message","payload":{"content":"hi"}}"#,
    )
    .await;
    assert_eq!(response["type"], "message_confirmation");
    assert_eq!(response["payload"]["content"], "Message \"hi\" received.");
}

#[tokio::test]
async fn array_frames_are_not_envelopes() {
    let addr = spawn_gateway().await;
    let mut ws = connect(addr).await;

    for frame in [r#"["test"]"#, r#"["send_message",{"content":"X"}]"#] {
        let response = request(&mut ws, frame).await;
        assert_eq!(
            response,
            json!({ "type": "error", "payload": { "message": "Invalid JSON format" } })
        );
    }
}

async fn hold_connection(conn: Connection, _payload: Value) -> Result<(), GatewayError> {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(conn);
    });
    Ok(())
}

#[tokio::test]
async fn close_completes_while_handler_task_holds_connection() {
    let mut registry = HandlerRegistry::new();
    if register_builtin(&mut registry).is_err() || registry.register("hold", hold_connection).is_err() {
        panic!("registration failed");
    }
    let addr = spawn_gateway_with(registry).await;
    let mut ws = connect(addr).await;

    if ws.send(Message::text(r#"{"type":"hold"}"#)).await.is_err() {
        panic!("ws send failed");
    }
    let response = request(&mut ws, r#"{"type":"test"}"#).await;
    assert_eq!(response["type"], "test_response");

    if ws.close(None).await.is_err() {
        panic!("ws close failed");
    }

    // The server must release the socket well before the held clone expires.
    let drained = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(Ok(_)) = ws.next().await {}
    })
    .await;
    assert!(drained.is_ok(), "server kept the socket open after close");
}
