//! 콘솔 토스트 어댑터.
//!
//! `ToastNotifier` 포트 구현. 성공은 stdout, 에러는 stderr.

use async_trait::async_trait;
use std::io::Write;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::ports::notifier::ToastNotifier;
use tracing::debug;

/// 콘솔 토스트
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToastNotifier for ConsoleNotifier {
    async fn success(&self, message: &str) -> Result<(), CoreError> {
        debug!("성공 토스트: {message}");
        writeln!(std::io::stdout().lock(), "✅ {message}")?;
        Ok(())
    }

    async fn error(&self, message: &str) -> Result<(), CoreError> {
        debug!("에러 토스트: {message}");
        writeln!(std::io::stderr().lock(), "❌ {message}")?;
        Ok(())
    }
}
