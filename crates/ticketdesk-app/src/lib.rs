//! # ticketdesk-app
//!
//! ticketdesk 설정 클라이언트 진입점.
//! 설정 로드, 어댑터 와이어링, CLI 명령 실행, 콘솔 렌더링.

pub mod cli;
pub mod commands;
pub mod lifecycle;
pub mod notifier;
pub mod render;
pub mod wiring;
