//! 푸시 채널 이벤트 모델.

use serde::{Deserialize, Serialize};

use super::setting::Setting;

/// 설정 이벤트 이름 (Socket.IO 이벤트명)
pub const SETTINGS_EVENT: &str = "settings";

/// 설정 이벤트 액션
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsAction {
    Update,
    /// 처리하지 않는 나머지 액션
    #[serde(other)]
    Other,
}

/// `settings` 이벤트 페이로드 `{action, setting}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsEvent {
    pub action: SettingsAction,
    #[serde(default)]
    pub setting: Option<Setting>,
}

impl SettingsEvent {
    pub fn update(setting: Setting) -> Self {
        Self {
            action: SettingsAction::Update,
            setting: Some(setting),
        }
    }

    /// 적용 대상 레코드: `update` 액션이고 페이로드가 있을 때만
    pub fn updated_setting(&self) -> Option<&Setting> {
        match self.action {
            SettingsAction::Update => self.setting.as_ref(),
            SettingsAction::Other => None,
        }
    }
}

/// 푸시 채널에서 구독자에게 전달되는 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// 네임스페이스 연결 완료
    Connected,
    /// 설정 변경 이벤트
    Settings(SettingsEvent),
    /// 연결 끊김 (재연결 대기)
    Disconnected { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_update_event() {
        let json = r#"{"action":"update","setting":{"key":"call","value":"disabled"}}"#;
        let event: SettingsEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.updated_setting(),
            Some(&Setting::new("call", "disabled"))
        );
    }

    #[test]
    fn other_actions_are_ignored() {
        let json = r#"{"action":"delete","setting":{"key":"call","value":"disabled"}}"#;
        let event: SettingsEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.action, SettingsAction::Other);
        assert!(event.updated_setting().is_none());
    }

    #[test]
    fn update_without_setting_has_nothing_to_apply() {
        let event: SettingsEvent = serde_json::from_str(r#"{"action":"update"}"#).unwrap();
        assert!(event.updated_setting().is_none());
    }
}
