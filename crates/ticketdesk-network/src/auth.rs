//! Bearer 토큰 관리.
//!
//! 로그인 자체는 외부(웹 세션, 환경변수)에서 이뤄지고,
//! 여기서는 발급된 액세스 토큰을 보관하고 어댑터에 제공한다.

use std::sync::Arc;
use tokio::sync::RwLock;

/// 액세스 토큰 보관소: HTTP/WebSocket 어댑터가 공유
#[derive(Clone, Default)]
pub struct TokenManager {
    state: Arc<RwLock<Option<String>>>,
}

impl TokenManager {
    /// 토큰 없는 매니저 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 토큰이 설정된 매니저 생성 (빈 문자열은 무시)
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = (!token.trim().is_empty()).then_some(token);
        Self {
            state: Arc::new(RwLock::new(token)),
        }
    }

    /// 현재 토큰 (없으면 None)
    pub async fn current(&self) -> Option<String> {
        self.state.read().await.clone()
    }
}
