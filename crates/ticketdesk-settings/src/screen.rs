//! 설정 화면 컨트롤러.
//!
//! 화면 수명:
//! 1. `mount()`: 푸시 구독 시작 후 초기 목록 로드
//! 2. 푸시 `settings` 이벤트 → 키 단위 병합
//! 3. `change_setting()`: 서버 기록 후 성공/실패 토스트
//! 4. `unmount()`: 구독 해제
//!
//! 사용자 변경은 로컬 목록을 직접 고치지 않는다. 새 값은 서버가 푸시 채널로
//! 다시 보내 줄 때 반영되므로, 기록이 실패하면 화면은 이전 값을 그대로 보여준다.

use std::sync::Arc;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::push::SettingsEvent;
use ticketdesk_core::models::setting::{SettingKey, SettingsList, ToggleValue};
use ticketdesk_core::ports::notifier::ToastNotifier;
use ticketdesk_core::ports::push_channel::PushChannel;
use ticketdesk_core::ports::settings_api::SettingsApi;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::i18n::I18n;
use crate::presenter::{self, SettingsView};
use crate::subscription::PushSubscription;
use crate::toast;

use crate::state::SharedState;
pub use crate::state::{LoadState, PushOutcome};

/// 사용자 변경 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// 서버 기록 성공 (값 반영은 푸시 대기)
    Saved,
    /// 서버 기록 실패
    Failed,
    /// 편집 불가 키: 서버 호출 없음
    Rejected,
}

/// 설정 화면
pub struct SettingsScreen {
    api: Arc<dyn SettingsApi>,
    push: Option<Arc<dyn PushChannel>>,
    toaster: Arc<dyn ToastNotifier>,
    i18n: I18n,
    shared: Arc<SharedState>,
    subscription: Mutex<Option<PushSubscription>>,
}

impl SettingsScreen {
    pub fn new(api: Arc<dyn SettingsApi>, toaster: Arc<dyn ToastNotifier>, i18n: I18n) -> Self {
        Self {
            api,
            push: None,
            toaster,
            i18n,
            shared: Arc::new(SharedState::new()),
            subscription: Mutex::new(None),
        }
    }

    /// 실시간 업데이트 채널 연결
    pub fn with_push_channel(mut self, channel: Arc<dyn PushChannel>) -> Self {
        self.push = Some(channel);
        self
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    /// 화면 진입: 구독 후 초기 로드
    ///
    /// 로드 응답보다 먼저 도착한 푸시 이벤트는 일치하는 키가 없어 무시되고,
    /// 이후 로드 결과가 목록 전체를 대체한다.
    pub async fn mount(&self) -> LoadState {
        self.shared.rearm().await;
        self.subscribe().await;
        self.load().await
    }

    /// 서버에서 전체 목록 로드
    ///
    /// 실패하면 기존 목록은 그대로 두고 에러 토스트를 띄운다.
    pub async fn load(&self) -> LoadState {
        self.shared.set_load_state(LoadState::Loading).await;

        match self.api.list_settings().await {
            Ok(settings) => {
                info!("설정 {}개 로드", settings.len());
                self.shared.replace_all(settings).await;
                LoadState::Loaded
            }
            Err(e) => {
                warn!("설정 로드 실패: {e}");
                self.shared.set_load_state(LoadState::LoadError).await;
                self.toast_error(&e).await;
                LoadState::LoadError
            }
        }
    }

    /// 푸시 구독 시작: 화면당 한 번만
    ///
    /// 채널이 없거나 이미 구독 중이면 `false`.
    pub async fn subscribe(&self) -> bool {
        let Some(channel) = self.push.clone() else {
            debug!("푸시 채널 없음: 실시간 업데이트 비활성");
            return false;
        };

        let mut slot = self.subscription.lock().await;
        if slot.is_some() {
            debug!("이미 구독 중");
            return false;
        }
        *slot = Some(PushSubscription::start(channel, self.shared.clone()));
        true
    }

    /// 화면 이탈: 구독 해제 후 목록 폐기
    pub async fn unmount(&self) {
        match self.subscription.lock().await.take() {
            Some(subscription) => subscription.release().await,
            None => self.shared.release().await,
        }
    }

    pub async fn is_subscribed(&self) -> bool {
        self.subscription.lock().await.is_some()
    }

    /// 푸시 이벤트 직접 적용 (구독 펌프와 같은 경로)
    pub async fn apply_event(&self, event: &SettingsEvent) -> PushOutcome {
        self.shared.apply_push(event).await
    }

    /// 사용자 변경
    ///
    /// 성공하면 성공 토스트만 띄우고 로컬 값은 바꾸지 않는다.
    pub async fn change_setting(&self, key: SettingKey, value: ToggleValue) -> WriteOutcome {
        if !key.is_editable() {
            warn!("읽기 전용 설정 변경 시도: {key}");
            self.notify_error(&self.i18n.t("settings.readOnly")).await;
            return WriteOutcome::Rejected;
        }

        match self.api.update_setting(key.as_str(), value.as_str()).await {
            Ok(()) => {
                info!("설정 변경 요청 성공: {key}={value}");
                self.notify_success(&self.i18n.t("settings.success")).await;
                WriteOutcome::Saved
            }
            Err(e) => {
                warn!("설정 변경 실패: {key}={value}: {e}");
                self.toast_error(&e).await;
                WriteOutcome::Failed
            }
        }
    }

    /// 키로 현재 값 조회: 로드 전이거나 없는 키면 `None`
    pub async fn value_of(&self, key: &str) -> Option<String> {
        self.shared.value_of(key).await
    }

    pub async fn load_state(&self) -> LoadState {
        self.shared.load_state().await
    }

    /// 현재 목록 복제본
    pub async fn settings(&self) -> SettingsList {
        self.shared.snapshot().await.0
    }

    /// 현재 상태로 렌더링 모델 생성
    pub async fn view(&self) -> SettingsView {
        let (settings, status) = self.shared.snapshot().await;
        presenter::present(&settings, status, &self.i18n)
    }

    /// 상태 변경 알림 (리비전 번호)
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.shared.subscribe_revisions()
    }

    pub fn revision(&self) -> u64 {
        self.shared.revision()
    }

    pub async fn is_released(&self) -> bool {
        self.shared.is_released().await
    }

    async fn toast_error(&self, err: &CoreError) {
        let message = toast::error_message(err, &self.i18n);
        self.notify_error(&message).await;
    }

    async fn notify_error(&self, message: &str) {
        if let Err(e) = self.toaster.error(message).await {
            warn!("에러 토스트 표시 실패: {e}");
        }
    }

    async fn notify_success(&self, message: &str) {
        if let Err(e) = self.toaster.success(message).await {
            warn!("성공 토스트 표시 실패: {e}");
        }
    }
}
