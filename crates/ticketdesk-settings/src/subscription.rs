//! 푸시 구독 핸들.
//!
//! 마운트된 화면 하나당 하나. 채널 연결 태스크와 이벤트 펌프 태스크를 소유하고,
//! 해제되면 두 태스크를 모두 중단한다. 해제 표시는 상태 잠금 안에서 기록되므로
//! 해제 이후에는 어떤 업데이트도 상태에 반영되지 않는다.

use std::sync::Arc;
use ticketdesk_core::models::push::PushEvent;
use ticketdesk_core::ports::push_channel::PushChannel;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::state::{PushOutcome, SharedState};

/// 푸시 이벤트 버퍼 크기
const EVENT_BUFFER: usize = 64;

/// 화면 수명에 묶인 푸시 구독
pub struct PushSubscription {
    shared: Arc<SharedState>,
    connect_task: JoinHandle<()>,
    pump_task: JoinHandle<()>,
}

impl PushSubscription {
    /// 채널 연결 및 펌프 시작 (tokio 런타임 안에서 호출)
    pub(crate) fn start(channel: Arc<dyn PushChannel>, shared: Arc<SharedState>) -> Self {
        let (tx, mut rx) = mpsc::channel::<PushEvent>(EVENT_BUFFER);

        let connect_task = tokio::spawn(async move {
            if let Err(e) = channel.connect(tx).await {
                error!("푸시 채널 에러: {e}");
            }
        });

        let pump_shared = shared.clone();
        let pump_task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    PushEvent::Connected => info!("실시간 업데이트 수신 중"),
                    PushEvent::Disconnected { reason } => {
                        warn!("실시간 업데이트 끊김: {reason}");
                    }
                    PushEvent::Settings(event) => {
                        if pump_shared.apply_push(&event).await == PushOutcome::Released {
                            break;
                        }
                    }
                }
            }
            debug!("푸시 펌프 종료");
        });

        info!("푸시 구독 시작");
        Self {
            shared,
            connect_task,
            pump_task,
        }
    }

    /// 구독 해제: 화면 목록을 버리고, 이후 도착하는 이벤트는 반영되지 않는다
    pub async fn release(self) {
        self.shared.release().await;
        self.connect_task.abort();
        self.pump_task.abort();
        info!("푸시 구독 해제");
    }
}

impl Drop for PushSubscription {
    fn drop(&mut self) {
        self.connect_task.abort();
        self.pump_task.abort();
    }
}
