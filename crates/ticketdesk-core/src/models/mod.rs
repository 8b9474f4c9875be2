//! 도메인 모델.

pub mod push;
pub mod setting;
