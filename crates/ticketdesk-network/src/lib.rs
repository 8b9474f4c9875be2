//! # ticketdesk-network
//!
//! HTTP/WebSocket 네트워크 어댑터.
//! 설정 REST API 호출과 Socket.IO 푸시 채널 수신을 담당하며
//! Bearer 토큰 인증 헤더를 주입한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use ticketdesk_network::auth::TokenManager;
//! use ticketdesk_network::http_client::HttpSettingsClient;
//! use ticketdesk_network::ws_client::WsPushChannel;
//! ```

pub mod auth;
pub mod http_client;
pub mod socketio;
pub mod ws_client;
