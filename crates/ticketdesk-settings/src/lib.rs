//! # ticketdesk-settings
//!
//! 테넌트 설정 화면.
//! 서버에서 설정 목록을 불러오고, 푸시 채널 업데이트를 키 단위로 병합하며,
//! 사용자 변경을 서버에 기록하고 결과를 토스트로 알린다.
//! 화면에 그릴 컨트롤 목록(뷰 모델)과 다국어 문자열 카탈로그를 제공한다.

pub mod i18n;
pub mod presenter;
pub mod screen;
mod state;
pub mod subscription;
pub mod toast;
