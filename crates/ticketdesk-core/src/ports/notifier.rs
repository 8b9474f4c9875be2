//! 토스트 알림 포트.
//!
//! 구현: `ticketdesk-app` crate (콘솔 토스트)

use async_trait::async_trait;

use crate::error::CoreError;

/// 사용자에게 짧은 결과 메시지를 보여주는 인터페이스
#[async_trait]
pub trait ToastNotifier: Send + Sync {
    /// 성공 토스트 표시
    async fn success(&self, message: &str) -> Result<(), CoreError>;

    /// 에러 토스트 표시
    async fn error(&self, message: &str) -> Result<(), CoreError>;
}
