//! WebSocket 푸시 채널 클라이언트.
//!
//! `PushChannel` 포트 구현. `tokio-tungstenite` 위에서 Socket.IO v4를 직접 말한다.
//! 연결이 끊기면 exponential backoff로 재연결하고,
//! 구독자(`tx`의 수신 측)가 사라지면 연결을 닫고 반환한다.

use async_trait::async_trait;
use futures::{SinkExt, Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::push::{PushEvent, SettingsEvent, SETTINGS_EVENT};
use ticketdesk_core::ports::push_channel::PushChannel;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::TokenManager;
use crate::socketio::{self, EnginePacket, SocketPacket, DEFAULT_NAMESPACE};

/// 한 번의 WebSocket 세션이 끝난 이유
#[derive(Debug)]
enum SessionEnd {
    /// 구독자가 사라짐: 재연결하지 않음
    SubscriberGone,
    /// 서버 또는 네트워크 쪽에서 닫힘
    Closed(String),
}

/// Socket.IO 푸시 채널: `PushChannel` 포트 구현
pub struct WsPushChannel {
    base_url: String,
    path: String,
    token_manager: Arc<TokenManager>,
    tenant_id: Option<String>,
    max_retry_secs: u64,
}

impl WsPushChannel {
    /// 새 푸시 채널 생성
    pub fn new(base_url: &str, token_manager: Arc<TokenManager>, max_retry_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            path: "/socket.io/".to_string(),
            token_manager,
            tenant_id: None,
            max_retry_secs: max_retry_secs.max(1),
        }
    }

    /// Socket.IO 엔드포인트 경로 지정
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// 테넌트 범위 지정 (핸드셰이크 쿼리 `tenantId`)
    pub fn with_tenant(mut self, tenant_id: Option<String>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    /// 핸드셰이크 URL 생성 (http→ws, https→wss)
    async fn socket_url(&self) -> Result<Url, CoreError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CoreError::Config(format!("잘못된 서버 URL: {}: {e}", self.base_url)))?;

        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(CoreError::Config(format!(
                    "지원하지 않는 URL 스킴: {other}"
                )))
            }
        };
        url.set_scheme(scheme)
            .map_err(|_| CoreError::Config(format!("URL 스킴 변경 실패: {}", self.base_url)))?;

        let base_path = url.path().trim_end_matches('/').to_string();
        let path = self.path.trim_start_matches('/');
        url.set_path(&format!("{base_path}/{path}"));

        // 쿼리 직렬화기는 Send가 아니므로 await는 블록 밖에서
        let token = self.token_manager.current().await;
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.append_pair("EIO", socketio::ENGINE_IO_VERSION);
            query.append_pair("transport", "websocket");
            if let Some(token) = &token {
                query.append_pair("token", token);
            }
            if let Some(tenant_id) = &self.tenant_id {
                query.append_pair("tenantId", tenant_id);
            }
        }

        Ok(url)
    }

    /// `settings` 이벤트 인자를 도메인 이벤트로 변환
    fn parse_event(name: &str, args: &[serde_json::Value]) -> Option<PushEvent> {
        if name != SETTINGS_EVENT {
            debug!("처리하지 않는 이벤트: {name}");
            return None;
        }

        let payload = args.first()?;
        match serde_json::from_value::<SettingsEvent>(payload.clone()) {
            Ok(event) => Some(PushEvent::Settings(event)),
            Err(e) => {
                warn!("settings 이벤트 파싱 실패: {e}");
                None
            }
        }
    }

    /// 단일 WebSocket 세션: 연결부터 종료까지
    async fn run_session(
        &self,
        url: &Url,
        tx: &mpsc::Sender<PushEvent>,
        connected: &mut bool,
    ) -> Result<SessionEnd, CoreError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| CoreError::Network(format!("WebSocket 연결 실패: {e}")))?;
        let (mut write, mut read) = ws_stream.split();
        // 핸드셰이크 이후 pingInterval + pingTimeout 동안 아무 프레임도 없으면 끊긴 연결
        let mut frame_deadline: Option<Duration> = None;

        loop {
            let msg = tokio::select! {
                _ = tx.closed() => {
                    debug!("구독자 종료, WebSocket 닫기");
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(SessionEnd::SubscriberGone);
                }
                received = next_frame(&mut read, frame_deadline) => match received {
                    Some(msg) => msg,
                    None => {
                        warn!("서버 ping 타임아웃");
                        return Ok(SessionEnd::Closed("ping 타임아웃".to_string()));
                    }
                },
            };

            let text = match msg {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(_))) => {
                    return Ok(SessionEnd::Closed("서버가 WebSocket을 닫음".to_string()))
                }
                Some(Ok(_)) => continue, // Ping/Pong 프레임은 자동 처리
                Some(Err(e)) => return Err(CoreError::Network(format!("WebSocket 수신 에러: {e}"))),
                None => return Ok(SessionEnd::Closed("스트림 종료".to_string())),
            };

            let packet = match socketio::decode(&text) {
                Ok(packet) => packet,
                Err(e) => {
                    warn!("잘못된 Socket.IO 프레임 무시: {e}");
                    continue;
                }
            };

            match packet {
                EnginePacket::Open(handshake) => {
                    debug!(
                        "Engine.IO 핸드셰이크: sid={}, ping={}ms",
                        handshake.sid, handshake.ping_interval
                    );
                    frame_deadline = Some(Duration::from_millis(
                        handshake.ping_interval.saturating_add(handshake.ping_timeout),
                    ));
                    let frame = socketio::encode_connect(DEFAULT_NAMESPACE, None);
                    write
                        .send(Message::Text(frame.into()))
                        .await
                        .map_err(|e| CoreError::Network(format!("WebSocket 전송 실패: {e}")))?;
                }
                EnginePacket::Ping => {
                    write
                        .send(Message::Text(socketio::PONG.into()))
                        .await
                        .map_err(|e| CoreError::Network(format!("pong 전송 실패: {e}")))?;
                }
                EnginePacket::Close => {
                    return Ok(SessionEnd::Closed("Engine.IO close".to_string()));
                }
                EnginePacket::Message(SocketPacket::Connect { .. }) => {
                    info!("푸시 채널 연결됨");
                    *connected = true;
                    if tx.send(PushEvent::Connected).await.is_err() {
                        return Ok(SessionEnd::SubscriberGone);
                    }
                }
                EnginePacket::Message(SocketPacket::Event { name, args, .. }) => {
                    if let Some(event) = Self::parse_event(&name, &args) {
                        if tx.send(event).await.is_err() {
                            return Ok(SessionEnd::SubscriberGone);
                        }
                    }
                }
                EnginePacket::Message(SocketPacket::ConnectError { message, .. }) => {
                    return Err(CoreError::Auth(format!("푸시 채널 연결 거부: {message}")));
                }
                EnginePacket::Message(SocketPacket::Disconnect { .. }) => {
                    return Ok(SessionEnd::Closed("서버가 네임스페이스 연결을 끊음".to_string()));
                }
                EnginePacket::Pong
                | EnginePacket::Upgrade
                | EnginePacket::Noop
                | EnginePacket::Message(SocketPacket::Ack { .. }) => {}
            }
        }
    }
}

/// 다음 프레임 대기: 기한을 넘기면 `None`
async fn next_frame<S>(read: &mut S, deadline: Option<Duration>) -> Option<Option<S::Item>>
where
    S: Stream + Unpin,
{
    match deadline {
        Some(deadline) => tokio::time::timeout(deadline, read.next()).await.ok(),
        None => Some(read.next().await),
    }
}

#[async_trait]
impl PushChannel for WsPushChannel {
    async fn connect(&self, tx: mpsc::Sender<PushEvent>) -> Result<(), CoreError> {
        let mut retry_delay = 1u64;

        loop {
            let url = self.socket_url().await?;
            info!("푸시 채널 연결 시작: {}{}", url.host_str().unwrap_or(""), url.path());

            let mut connected = false;
            let reason = match self.run_session(&url, &tx, &mut connected).await {
                Ok(SessionEnd::SubscriberGone) => {
                    info!("푸시 채널 구독 종료");
                    return Ok(());
                }
                Ok(SessionEnd::Closed(reason)) => reason,
                Err(e) => {
                    warn!("푸시 채널 에러: {e}");
                    e.to_string()
                }
            };

            if connected {
                // 연결에 성공했던 세션이면 재시도 지연 리셋
                retry_delay = 1;
                if tx
                    .send(PushEvent::Disconnected {
                        reason: reason.clone(),
                    })
                    .await
                    .is_err()
                {
                    return Ok(());
                }
            }

            if tx.is_closed() {
                return Ok(());
            }

            warn!("푸시 채널 재연결 대기: {retry_delay}초 ({reason})");
            tokio::select! {
                _ = tx.closed() => return Ok(()),
                _ = tokio::time::sleep(Duration::from_secs(retry_delay)) => {}
            }
            retry_delay = (retry_delay * 2).min(self.max_retry_secs);
        }
    }
}
