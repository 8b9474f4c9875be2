//! 설정 화면 프레젠터.
//!
//! SettingsList → UI 표시용 컨트롤 목록 변환.
//! 알려진 키마다 컨트롤 하나를 고정 순서로 만들며, 값 조회는 항상 안전하다
//! (로드 전이거나 레코드가 없으면 선택 값이 비어 있다).

use serde::Serialize;
use ticketdesk_core::models::setting::{SettingKey, SettingKind, SettingsList, ToggleValue};
use tracing::debug;

use crate::i18n::I18n;
use crate::state::LoadState;

/// 토글 선택지
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOption {
    pub value: ToggleValue,
    pub label: String,
}

/// 컨트롤 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ControlView {
    /// enabled/disabled 선택
    Toggle {
        key: &'static str,
        label: String,
        note: String,
        options: Vec<ToggleOption>,
        selected: Option<ToggleValue>,
    },
    /// 읽기 전용 텍스트 (복사/참고용)
    ReadOnly {
        key: &'static str,
        label: String,
        note: String,
        value: Option<String>,
    },
}

impl ControlView {
    pub fn key(&self) -> &'static str {
        match self {
            ControlView::Toggle { key, .. } | ControlView::ReadOnly { key, .. } => key,
        }
    }
}

/// 화면 전체
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub title: String,
    pub status: LoadState,
    pub status_label: String,
    pub controls: Vec<ControlView>,
}

impl SettingsView {
    /// 키로 컨트롤 조회
    pub fn control(&self, key: SettingKey) -> Option<&ControlView> {
        self.controls.iter().find(|c| c.key() == key.as_str())
    }
}

/// 상태 → 뷰 변환
pub fn present(settings: &SettingsList, status: LoadState, i18n: &I18n) -> SettingsView {
    SettingsView {
        title: i18n.t("settings.title"),
        status,
        status_label: i18n.t(status.i18n_key()),
        controls: SettingKey::ALL
            .iter()
            .map(|key| present_control(*key, settings, i18n))
            .collect(),
    }
}

fn present_control(key: SettingKey, settings: &SettingsList, i18n: &I18n) -> ControlView {
    let base = format!("settings.settings.{}", key.as_str());
    let label = i18n.t(&format!("{base}.name"));
    let note = i18n.t(&format!("{base}.note"));
    let raw = settings.value(key.as_str());

    match key.kind() {
        SettingKind::Toggle => ControlView::Toggle {
            key: key.as_str(),
            label,
            note,
            options: ToggleValue::BOTH
                .iter()
                .map(|value| ToggleOption {
                    value: *value,
                    label: i18n.t(&format!("{base}.options.{}", value.as_str())),
                })
                .collect(),
            selected: raw.and_then(|value| match value.parse::<ToggleValue>() {
                Ok(toggle) => Some(toggle),
                Err(_) => {
                    debug!("토글 값이 아님: {key}={value}");
                    None
                }
            }),
        },
        SettingKind::ReadOnly => ControlView::ReadOnly {
            key: key.as_str(),
            label,
            note,
            value: raw.map(str::to_string),
        },
    }
}
