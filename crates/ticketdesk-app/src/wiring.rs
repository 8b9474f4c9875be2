//! 어댑터 생성 및 DI 와이어링.

use std::path::PathBuf;
use std::sync::Arc;
use ticketdesk_core::config::ClientConfig;
use ticketdesk_core::config_manager::ConfigManager;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::ports::notifier::ToastNotifier;
use ticketdesk_network::auth::TokenManager;
use ticketdesk_network::http_client::HttpSettingsClient;
use ticketdesk_network::ws_client::WsPushChannel;
use ticketdesk_settings::i18n::{I18n, Locale};
use ticketdesk_settings::screen::SettingsScreen;
use tracing::{info, warn};

use crate::cli::Args;

/// 설정 파일 로드 (경로 미지정 시 플랫폼 기본 경로)
pub fn load_config(path: Option<PathBuf>) -> Result<ConfigManager, CoreError> {
    match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    }
}

/// CLI 인자로 설정 오버라이드 (파일에는 저장하지 않음)
pub fn apply_overrides(config: &mut ClientConfig, args: &Args) {
    if let Some(ref server_url) = args.server {
        config.server.base_url = server_url.clone();
    }
    if let Some(ref tenant) = args.tenant {
        config.tenant_id = Some(tenant.clone());
    }
    if let Some(ref locale) = args.locale {
        config.ui.locale = locale.clone();
    }
    if args.no_push {
        config.push.enabled = false;
    }
}

/// 토큰 결정: 인자 우선, 없으면 환경 변수 값
pub fn resolve_token(arg: Option<String>, env: Option<String>) -> Option<String> {
    arg.or(env).filter(|token| !token.trim().is_empty())
}

/// 표시 언어 결정: 알 수 없는 코드는 시스템 로케일로 대체
pub fn resolve_locale(config: &ClientConfig) -> Locale {
    match Locale::from_code(&config.ui.locale) {
        Some(locale) => locale,
        None => {
            let fallback = Locale::detect_system();
            warn!(
                "지원하지 않는 언어: {} → {}",
                config.ui.locale,
                fallback.code()
            );
            fallback
        }
    }
}

/// 설정 화면 조립
pub fn build_screen(
    config: &ClientConfig,
    token: Option<String>,
    toaster: Arc<dyn ToastNotifier>,
) -> Result<SettingsScreen, CoreError> {
    let token_manager = Arc::new(match token {
        Some(token) => TokenManager::with_token(token),
        None => TokenManager::new(),
    });

    let api = Arc::new(HttpSettingsClient::new(
        &config.server.base_url,
        token_manager.clone(),
        config.request_timeout(),
    )?);

    let i18n = I18n::new(resolve_locale(config));
    let screen = SettingsScreen::new(api, toaster, i18n);

    if !config.push.enabled {
        info!("실시간 업데이트 비활성");
        return Ok(screen);
    }

    let channel = WsPushChannel::new(
        &config.server.base_url,
        token_manager,
        config.push.max_retry_secs,
    )
    .with_path(&config.push.path)
    .with_tenant(config.tenant_id.clone());
    info!("서버: {}", config.server.base_url);

    Ok(screen.with_push_channel(Arc::new(channel)))
}
