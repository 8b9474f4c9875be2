//! Socket.IO 푸시 채널 통합 테스트.
//!
//! 로컬 tokio-tungstenite 서버로 Engine.IO 핸드셰이크, 핑/퐁, settings 이벤트 전달,
//! 재연결, 구독 종료를 검증한다.

use futures::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ticketdesk_core::models::push::PushEvent;
use ticketdesk_core::models::setting::Setting;
use ticketdesk_core::ports::push_channel::PushChannel;
use ticketdesk_network::auth::TokenManager;
use ticketdesk_network::ws_client::WsPushChannel;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

const OPEN_FRAME: &str = r#"0{"sid":"sid_1","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
/// ping 간격 100ms + 타임아웃 100ms
const SHORT_PING_OPEN_FRAME: &str = r#"0{"sid":"sid_2","upgrades":[],"pingInterval":100,"pingTimeout":100,"maxPayload":1000000}"#;
const CALL_DISABLED: &str =
    r#"42["settings",{"action":"update","setting":{"key":"call","value":"disabled"}}]"#;

type ServerWs = WebSocketStream<TcpStream>;

/// 핸드셰이크 요청 URI를 기록하며 연결 수락
async fn accept(listener: &TcpListener, seen_uri: Arc<Mutex<Vec<String>>>) -> ServerWs {
    let (stream, _) = listener.accept().await.unwrap();
    tokio_tungstenite::accept_hdr_async(stream, move |req: &Request, resp: Response| {
        seen_uri.lock().unwrap().push(req.uri().to_string());
        Ok::<Response, ErrorResponse>(resp)
    })
    .await
    .unwrap()
}

/// open 패킷 전송 후 클라이언트의 네임스페이스 연결(`40`)을 기다리고 승인
async fn complete_handshake(ws: &mut ServerWs) {
    complete_handshake_with(ws, OPEN_FRAME).await;
}

async fn complete_handshake_with(ws: &mut ServerWs, open_frame: &str) {
    ws.send(Message::Text(open_frame.into())).await.unwrap();
    let frame = next_text(ws).await;
    assert_eq!(frame, "40");
    ws.send(Message::Text(r#"40{"sid":"ns_1"}"#.into()))
        .await
        .unwrap();
}

async fn next_text(ws: &mut ServerWs) -> String {
    loop {
        match tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("클라이언트 프레임 대기 타임아웃")
        {
            Some(Ok(Message::Text(text))) => return text.to_string(),
            Some(Ok(_)) => continue,
            other => panic!("예상하지 못한 프레임: {other:?}"),
        }
    }
}

async fn recv(rx: &mut mpsc::Receiver<PushEvent>) -> PushEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("푸시 이벤트 대기 타임아웃")
        .expect("채널 닫힘")
}

#[tokio::test]
async fn delivers_settings_events_and_answers_pings() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen_uri = Arc::new(Mutex::new(Vec::new()));

    let server_uri = seen_uri.clone();
    let server = tokio::spawn(async move {
        let mut ws = accept(&listener, server_uri).await;
        complete_handshake(&mut ws).await;

        ws.send(Message::Text("2".into())).await.unwrap();
        assert_eq!(next_text(&mut ws).await, "3");

        ws.send(Message::Text(r#"42["ticket",{"action":"update"}]"#.into()))
            .await
            .unwrap();
        ws.send(Message::Text(CALL_DISABLED.into())).await.unwrap();

        // 클라이언트가 구독 종료 후 보내는 Close 프레임까지 읽는다
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                break;
            }
        }
    });

    let tm = Arc::new(TokenManager::with_token("secret"));
    let channel = WsPushChannel::new(&format!("http://{addr}"), tm, 2)
        .with_tenant(Some("tenant-1".to_string()));

    let (tx, mut rx) = mpsc::channel(16);
    let client = tokio::spawn(async move { channel.connect(tx).await });

    assert_eq!(recv(&mut rx).await, PushEvent::Connected);
    match recv(&mut rx).await {
        PushEvent::Settings(event) => {
            assert_eq!(
                event.updated_setting(),
                Some(&Setting::new("call", "disabled"))
            );
        }
        other => panic!("settings 이벤트가 아님: {other:?}"),
    }

    drop(rx);
    let result = tokio::time::timeout(Duration::from_secs(5), client)
        .await
        .expect("구독 종료 후 connect가 반환되지 않음")
        .unwrap();
    assert!(result.is_ok());
    server.await.unwrap();

    let uris = seen_uri.lock().unwrap();
    assert_eq!(uris.len(), 1);
    assert!(uris[0].starts_with("/socket.io/?EIO=4&transport=websocket"));
    assert!(uris[0].contains("token=secret"));
    assert!(uris[0].contains("tenantId=tenant-1"));
}

#[tokio::test]
async fn reconnects_after_server_disconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen_uri = Arc::new(Mutex::new(Vec::new()));

    let server_uri = seen_uri.clone();
    tokio::spawn(async move {
        // 첫 연결: 네임스페이스 연결 직후 끊음
        let mut ws = accept(&listener, server_uri.clone()).await;
        complete_handshake(&mut ws).await;
        ws.send(Message::Text("41".into())).await.unwrap();
        let _ = ws.close(None).await;

        // 두 번째 연결: 이벤트 전달
        let mut ws = accept(&listener, server_uri).await;
        complete_handshake(&mut ws).await;
        ws.send(Message::Text(CALL_DISABLED.into())).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                break;
            }
        }
    });

    let tm = Arc::new(TokenManager::new());
    let channel = WsPushChannel::new(&format!("http://{addr}"), tm, 2);
    let (tx, mut rx) = mpsc::channel(16);
    let client = tokio::spawn(async move { channel.connect(tx).await });

    assert_eq!(recv(&mut rx).await, PushEvent::Connected);
    assert!(matches!(
        recv(&mut rx).await,
        PushEvent::Disconnected { .. }
    ));
    assert_eq!(recv(&mut rx).await, PushEvent::Connected);
    assert!(matches!(recv(&mut rx).await, PushEvent::Settings(_)));

    drop(rx);
    let result = tokio::time::timeout(Duration::from_secs(5), client)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(seen_uri.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn connect_error_is_not_fatal_to_subscriber() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut ws = accept(&listener, Arc::new(Mutex::new(Vec::new()))).await;
        ws.send(Message::Text(OPEN_FRAME.into())).await.unwrap();
        let _ = next_text(&mut ws).await;
        ws.send(Message::Text(r#"44{"message":"Not authorized"}"#.into()))
            .await
            .unwrap();
        // 재연결 시도를 받아두기만 한다
        let _ = listener.accept().await;
    });

    let channel = WsPushChannel::new(&format!("http://{addr}"), Arc::new(TokenManager::new()), 2);
    let (tx, rx) = mpsc::channel(16);
    let client = tokio::spawn(async move { channel.connect(tx).await });

    // 연결 거부 후 재연결 대기 중에 구독을 끊으면 곧바로 반환해야 한다
    tokio::time::sleep(Duration::from_millis(300)).await;
    drop(rx);
    let result = tokio::time::timeout(Duration::from_secs(5), client)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn silent_server_is_dropped_after_ping_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen_uri = Arc::new(Mutex::new(Vec::new()));

    let server_uri = seen_uri.clone();
    tokio::spawn(async move {
        // 첫 연결: 핸드셰이크 후 소켓은 열어 둔 채 아무것도 보내지 않는다
        let mut silent = accept(&listener, server_uri.clone()).await;
        complete_handshake_with(&mut silent, SHORT_PING_OPEN_FRAME).await;

        // 두 번째 연결: 정상 서버
        let mut ws = accept(&listener, server_uri).await;
        complete_handshake(&mut ws).await;
        ws.send(Message::Text(CALL_DISABLED.into())).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                break;
            }
        }
        drop(silent);
    });

    let channel = WsPushChannel::new(&format!("http://{addr}"), Arc::new(TokenManager::new()), 2);
    let (tx, mut rx) = mpsc::channel(16);
    let client = tokio::spawn(async move { channel.connect(tx).await });

    assert_eq!(recv(&mut rx).await, PushEvent::Connected);
    match recv(&mut rx).await {
        PushEvent::Disconnected { reason } => assert!(reason.contains("ping")),
        other => panic!("연결 끊김 이벤트가 아님: {other:?}"),
    }
    assert_eq!(recv(&mut rx).await, PushEvent::Connected);
    assert!(matches!(recv(&mut rx).await, PushEvent::Settings(_)));

    drop(rx);
    let result = tokio::time::timeout(Duration::from_secs(5), client)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(seen_uri.lock().unwrap().len(), 2);
}
