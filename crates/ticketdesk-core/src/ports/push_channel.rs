//! 실시간 푸시 채널 포트.
//!
//! 구현: `ticketdesk-network` crate (tokio-tungstenite 위의 Socket.IO)

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::CoreError;
use crate::models::push::PushEvent;

/// 서버 → 클라이언트 이벤트 스트림
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// 채널 연결 및 이벤트 수신
    ///
    /// 수신된 이벤트를 `tx` 채널로 전송한다.
    /// 연결이 끊기면 재연결을 시도하고, `tx`의 수신 측이 닫히면 반환한다.
    async fn connect(&self, tx: mpsc::Sender<PushEvent>) -> Result<(), CoreError>;
}
