//! 화면 공유 상태.
//!
//! 초기 로드, 푸시 펌프, 사용자 변경 경로가 같은 상태를 공유한다.
//! 모든 변경은 쓰기 잠금 안에서 이뤄지고, 변경이 있을 때마다 리비전을 올려
//! `watch` 채널로 알린다.

use serde::Serialize;
use ticketdesk_core::models::push::SettingsEvent;
use ticketdesk_core::models::setting::{MergeOutcome, Setting, SettingsList};
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

/// 로드 상태 머신
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    LoadError,
}

impl LoadState {
    /// 상태 표시 문자열 키
    pub fn i18n_key(&self) -> &'static str {
        match self {
            LoadState::Unloaded => "settings.status.unloaded",
            LoadState::Loading => "settings.status.loading",
            LoadState::Loaded => "settings.status.loaded",
            LoadState::LoadError => "settings.status.loadError",
        }
    }
}

/// 푸시 이벤트 적용 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// 값이 바뀜
    Applied,
    /// 같은 값: 변화 없음
    Unchanged,
    /// 일치하는 키 없음 (로드 전 포함): 무시
    NoMatch,
    /// update 이외의 액션: 무시
    Ignored,
    /// 구독 해제 이후 도착: 무시
    Released,
}

struct Inner {
    settings: SettingsList,
    load_state: LoadState,
    released: bool,
}

pub(crate) struct SharedState {
    inner: RwLock<Inner>,
    revision: watch::Sender<u64>,
}

impl SharedState {
    pub(crate) fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: RwLock::new(Inner {
                settings: SettingsList::new(),
                load_state: LoadState::Unloaded,
                released: false,
            }),
            revision,
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    pub(crate) fn subscribe_revisions(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub(crate) fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub(crate) async fn set_load_state(&self, load_state: LoadState) {
        let mut inner = self.inner.write().await;
        if inner.load_state != load_state {
            inner.load_state = load_state;
            self.bump();
        }
    }

    /// 로드 성공: 목록 전체 교체
    pub(crate) async fn replace_all(&self, fetched: Vec<Setting>) {
        let mut inner = self.inner.write().await;
        let dropped = inner.settings.replace_all(fetched);
        if !dropped.is_empty() {
            warn!("중복 설정 키 무시: {dropped:?}");
        }
        inner.load_state = LoadState::Loaded;
        self.bump();
    }

    /// 푸시 이벤트 적용: 해제 여부는 같은 잠금 안에서 확인한다
    pub(crate) async fn apply_push(&self, event: &SettingsEvent) -> PushOutcome {
        let mut inner = self.inner.write().await;
        if inner.released {
            return PushOutcome::Released;
        }

        let Some(setting) = event.updated_setting() else {
            debug!("처리하지 않는 settings 액션: {:?}", event.action);
            return PushOutcome::Ignored;
        };

        match inner.settings.merge_by_key(setting) {
            MergeOutcome::Applied { previous } => {
                debug!(
                    "푸시 업데이트 적용: {} {} → {}",
                    setting.key, previous, setting.value
                );
                self.bump();
                PushOutcome::Applied
            }
            MergeOutcome::Unchanged => PushOutcome::Unchanged,
            MergeOutcome::Missing => {
                debug!("푸시 업데이트 대상 없음: {}", setting.key);
                PushOutcome::NoMatch
            }
        }
    }

    /// 화면 해제: 목록을 버리고 상태를 초기화하며, 이후 푸시는 반영하지 않는다
    pub(crate) async fn release(&self) {
        let mut inner = self.inner.write().await;
        inner.released = true;
        inner.settings.clear();
        inner.load_state = LoadState::Unloaded;
        self.bump();
    }

    /// 다시 마운트: 푸시 반영 재개
    pub(crate) async fn rearm(&self) {
        self.inner.write().await.released = false;
    }

    pub(crate) async fn is_released(&self) -> bool {
        self.inner.read().await.released
    }

    pub(crate) async fn load_state(&self) -> LoadState {
        self.inner.read().await.load_state
    }

    pub(crate) async fn value_of(&self, key: &str) -> Option<String> {
        self.inner.read().await.settings.value(key).map(str::to_string)
    }

    /// 현재 목록과 로드 상태의 일관된 복제본
    pub(crate) async fn snapshot(&self) -> (SettingsList, LoadState) {
        let inner = self.inner.read().await;
        (inner.settings.clone(), inner.load_state)
    }
}
