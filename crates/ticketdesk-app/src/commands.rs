//! CLI 명령 실행.
//!
//! 각 명령은 화면 수명(mount → 동작 → unmount)을 한 번씩 거친다.

use chrono::Local;
use std::future::Future;
use std::io::Write;
use ticketdesk_core::models::setting::{SettingKey, ToggleValue};
use ticketdesk_settings::presenter::SettingsView;
use ticketdesk_settings::screen::{LoadState, SettingsScreen, WriteOutcome};
use tracing::{debug, info};

use crate::render;

/// 출력 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn print_view(out: &mut impl Write, view: &SettingsView, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            write!(out, "{}", render::render_text(view, &Local::now()))?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", render::render_json(view)?)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// `show`: 한 번 로드해서 출력
pub async fn show(
    screen: &SettingsScreen,
    out: &mut impl Write,
    format: OutputFormat,
) -> anyhow::Result<LoadState> {
    let state = screen.mount().await;
    let printed = print_view(out, &screen.view().await, format);
    screen.unmount().await;
    printed?;
    Ok(state)
}

/// `set`: 로드 후 값 변경
///
/// 로드에 실패해도 변경 요청은 보낸다.
pub async fn set(screen: &SettingsScreen, key: SettingKey, value: ToggleValue) -> WriteOutcome {
    let state = screen.load().await;
    if state == LoadState::Loaded {
        let current = screen.value_of(key.as_str()).await;
        debug!("현재 값: {key}={}", current.as_deref().unwrap_or("-"));
    }
    let outcome = screen.change_setting(key, value).await;
    screen.unmount().await;
    outcome
}

/// `watch`: 변경될 때마다 다시 출력, `shutdown`이 끝나면 종료
pub async fn watch<F>(
    screen: &SettingsScreen,
    out: &mut impl Write,
    format: OutputFormat,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut changes = screen.changes();

    screen.mount().await;
    let _ = changes.borrow_and_update();
    let result = watch_loop(screen, out, format, &mut changes, shutdown).await;

    screen.unmount().await;
    info!("감시 종료");
    result
}

async fn watch_loop<F>(
    screen: &SettingsScreen,
    out: &mut impl Write,
    format: OutputFormat,
    changes: &mut tokio::sync::watch::Receiver<u64>,
    mut shutdown: std::pin::Pin<&mut F>,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    print_view(out, &screen.view().await, format)?;
    loop {
        tokio::select! {
            _ = &mut shutdown => return Ok(()),
            changed = changes.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let _ = changes.borrow_and_update();
                print_view(out, &screen.view().await, format)?;
            }
        }
    }
}
