//! 설정 REST API 포트.
//!
//! 구현: `ticketdesk-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::setting::Setting;

/// 설정 저장소 API
#[async_trait]
pub trait SettingsApi: Send + Sync {
    /// 전체 설정 목록 조회 (`GET /settings`)
    ///
    /// 서버가 보낸 순서를 그대로 반환한다.
    async fn list_settings(&self) -> Result<Vec<Setting>, CoreError>;

    /// 단일 설정 값 변경 (`PUT /settings/{key}`, 본문 `{value}`)
    ///
    /// 응답 본문은 사용하지 않는다.
    async fn update_setting(&self, key: &str, value: &str) -> Result<(), CoreError>;
}
