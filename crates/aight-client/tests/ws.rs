//! WsConnection against a scripted websocket host on 127.0.0.1:0.

use std::future::Future;
use std::time::Duration;

use aight_client::{ClientError, HostConnection, WsConnection};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

type HostWs = WebSocketStream<TcpStream>;

const TOKEN: &str = "secret-token";
const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

async fn spawn_host<F, Fut>(script: F) -> String
where
    F: FnOnce(HostWs) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        script(ws).await;
    });
    format!("ws://{addr}")
}

async fn send(ws: &mut HostWs, value: Value) {
    ws.send(Message::Text(value.to_string())).await.unwrap();
}

async fn recv(ws: &mut HostWs) -> Value {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(&text).unwrap(),
            Some(Ok(_)) => continue,
            other => panic!("host expected a text frame, got {other:?}"),
        }
    }
}

/// Run the auth exchange; returns whether the token was accepted.
async fn handshake(ws: &mut HostWs) -> bool {
    send(ws, json!({"type": "auth_required", "ha_version": "2024.6.0"})).await;
    let auth = recv(ws).await;
    assert_eq!(auth["type"], "auth");
    if auth["access_token"] == TOKEN {
        send(ws, json!({"type": "auth_ok", "ha_version": "2024.6.0"})).await;
        true
    } else {
        send(ws, json!({"type": "auth_invalid", "message": "Invalid access token or password"})).await;
        false
    }
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let url = spawn_host(|mut ws| async move {
        assert!(!handshake(&mut ws).await);
    })
    .await;

    let err = WsConnection::connect(&url, "nope", REPLY_TIMEOUT).await.err().unwrap();
    assert!(matches!(err, ClientError::Auth(ref m) if m.contains("Invalid access token")), "{err}");
}

#[tokio::test]
async fn connect_failure_names_the_url() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = WsConnection::connect(&url, TOKEN, REPLY_TIMEOUT).await.err().unwrap();
    assert!(matches!(err, ClientError::Connect { url: ref u, .. } if *u == url));
}

#[tokio::test]
async fn call_service_returns_response() {
    let url = spawn_host(|mut ws| async move {
        assert!(handshake(&mut ws).await);
        let call = recv(&mut ws).await;
        assert_eq!(call["type"], "call_service");
        assert_eq!(call["domain"], "ai_config_assistant");
        assert_eq!(call["service"], "generate_config");
        assert_eq!(call["return_response"], true);
        assert_eq!(call["service_data"]["prompt"], "hello");
        send(
            &mut ws,
            json!({
                "id": call["id"],
                "type": "result",
                "success": true,
                "result": {"context": {}, "response": {"success": true, "config": "alias: x"}},
            }),
        )
        .await;
        // Keep the socket open until the client goes away.
        while ws.next().await.is_some() {}
    })
    .await;

    let conn = WsConnection::connect(&url, TOKEN, REPLY_TIMEOUT).await.unwrap();
    let response = conn
        .call_service("ai_config_assistant", "generate_config", json!({"prompt": "hello"}), true)
        .await
        .unwrap();
    assert_eq!(response.unwrap()["config"], "alias: x");
}

#[tokio::test]
async fn host_error_is_reported_with_code() {
    let url = spawn_host(|mut ws| async move {
        assert!(handshake(&mut ws).await);
        let call = recv(&mut ws).await;
        send(
            &mut ws,
            json!({
                "id": call["id"],
                "type": "result",
                "success": false,
                "error": {"code": "not_found", "message": "Service not found."},
            }),
        )
        .await;
        while ws.next().await.is_some() {}
    })
    .await;

    let conn = WsConnection::connect(&url, TOKEN, REPLY_TIMEOUT).await.unwrap();
    let err = conn
        .call_service("ai_config_assistant", "deploy_config", json!({}), true)
        .await
        .unwrap_err();
    assert!(err.is_service_missing(), "{err}");
}

#[tokio::test]
async fn events_route_to_subscription_and_drop_unsubscribes() {
    let (unsubscribed_tx, unsubscribed_rx) = oneshot::channel();
    let url = spawn_host(move |mut ws| async move {
        assert!(handshake(&mut ws).await);
        let sub = recv(&mut ws).await;
        assert_eq!(sub["type"], "subscribe_events");
        assert_eq!(sub["event_type"], "ai_config_assistant_reloaded");
        let sub_id = sub["id"].as_u64().unwrap();
        send(&mut ws, json!({"id": sub_id, "type": "result", "success": true, "result": null})).await;
        // An event for an unknown subscription must be ignored.
        send(
            &mut ws,
            json!({"id": 999, "type": "event", "event": {"event_type": "other", "data": {}}}),
        )
        .await;
        send(
            &mut ws,
            json!({
                "id": sub_id,
                "type": "event",
                "event": {"event_type": "ai_config_assistant_reloaded", "data": {"success": true}},
            }),
        )
        .await;

        let unsub = recv(&mut ws).await;
        assert_eq!(unsub["type"], "unsubscribe_events");
        assert_eq!(unsub["subscription"], sub_id);
        assert!(unsub["id"].as_u64().unwrap() > sub_id);
        let _ = unsubscribed_tx.send(());
        while ws.next().await.is_some() {}
    })
    .await;

    let conn = WsConnection::connect(&url, TOKEN, REPLY_TIMEOUT).await.unwrap();
    let mut sub = conn.subscribe("ai_config_assistant_reloaded").await.unwrap();
    let data = sub.next_event(REPLY_TIMEOUT).await.unwrap();
    assert_eq!(data["success"], true);
    drop(sub);

    tokio::time::timeout(REPLY_TIMEOUT, unsubscribed_rx)
        .await
        .expect("host saw unsubscribe_events")
        .unwrap();
}

#[tokio::test]
async fn get_states_returns_result_array() {
    let url = spawn_host(|mut ws| async move {
        assert!(handshake(&mut ws).await);
        let req = recv(&mut ws).await;
        assert_eq!(req["type"], "get_states");
        send(
            &mut ws,
            json!({
                "id": req["id"],
                "type": "result",
                "success": true,
                "result": [{"entity_id": "light.kitchen", "state": "on", "attributes": {}}],
            }),
        )
        .await;
        while ws.next().await.is_some() {}
    })
    .await;

    let conn = WsConnection::connect(&url, TOKEN, REPLY_TIMEOUT).await.unwrap();
    let states = conn.get_states().await.unwrap();
    assert_eq!(states[0]["entity_id"], "light.kitchen");
}

#[tokio::test]
async fn host_closing_fails_pending_call() {
    let url = spawn_host(|mut ws| async move {
        assert!(handshake(&mut ws).await);
        let _call = recv(&mut ws).await;
        let _ = ws.close(None).await;
    })
    .await;

    let conn = WsConnection::connect(&url, TOKEN, REPLY_TIMEOUT).await.unwrap();
    let err = conn
        .call_service("automation", "reload", json!({}), false)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Closed), "{err}");
}

#[tokio::test]
async fn late_subscribe_ack_is_unsubscribed() {
    let (released_tx, released_rx) = oneshot::channel();
    let url = spawn_host(move |mut ws| async move {
        assert!(handshake(&mut ws).await);
        let sub = recv(&mut ws).await;
        assert_eq!(sub["type"], "subscribe_events");
        let sub_id = sub["id"].as_u64().unwrap();

        // Acknowledge only after the client has given up.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        send(&mut ws, json!({"id": sub_id, "type": "result", "success": true, "result": null})).await;
        send(
            &mut ws,
            json!({
                "id": sub_id,
                "type": "event",
                "event": {"event_type": "ai_config_assistant_config_generated", "data": {}},
            }),
        )
        .await;

        let unsub = recv(&mut ws).await;
        let _ = released_tx.send(unsub);
        while ws.next().await.is_some() {}
    })
    .await;

    let conn = WsConnection::connect(&url, TOKEN, Duration::from_secs(1)).await.unwrap();
    let err = conn
        .subscribe("ai_config_assistant_config_generated")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ClientError::Timeout { .. }), "{err}");

    let unsub = tokio::time::timeout(REPLY_TIMEOUT, released_rx)
        .await
        .expect("host saw unsubscribe_events")
        .unwrap();
    assert_eq!(unsub["type"], "unsubscribe_events");
    assert_eq!(unsub["subscription"], 1);
    drop(conn);
}
