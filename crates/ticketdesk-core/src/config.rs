//! 클라이언트 설정 구조체.
//!
//! 서버 URL, 요청 타임아웃, 푸시 채널, UI 언어, 테넌트 등
//! 런타임 설정을 정의한다. `ConfigManager`를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 최상위 클라이언트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// 서버 연결 설정
    pub server: ServerConfig,
    /// 푸시 채널 설정
    #[serde(default)]
    pub push: PushConfig,
    /// UI 설정
    #[serde(default)]
    pub ui: UiConfig,
    /// 테넌트 ID (푸시 채널 범위 지정)
    #[serde(default)]
    pub tenant_id: Option<String>,
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// REST API 기본 URL
    pub base_url: String,
    /// HTTP 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// 푸시 채널 (Socket.IO) 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// 실시간 업데이트 수신 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Socket.IO 엔드포인트 경로
    #[serde(default = "default_push_path")]
    pub path: String,
    /// 재연결 최대 대기 시간 (초)
    #[serde(default = "default_max_retry_secs")]
    pub max_retry_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_push_path(),
            max_retry_secs: default_max_retry_secs(),
        }
    }
}

/// UI 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// 표시 언어 코드 (en, pt, es)
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

fn default_push_path() -> String {
    "/socket.io/".to_string()
}

fn default_max_retry_secs() -> u64 {
    30
}

fn default_locale() -> String {
    "en".to_string()
}

impl ClientConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:8080".to_string(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            push: PushConfig::default(),
            ui: UiConfig::default(),
            tenant_id: None,
        }
    }

    /// HTTP 요청 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
