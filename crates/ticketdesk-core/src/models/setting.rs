//! 설정 레코드 모델과 키 단위 병합.
//!
//! 서버에서 받은 설정 목록을 보관하는 [`SettingsList`]는 키당 최대 하나의
//! 레코드만 가진다. 초기 로드([`SettingsList::replace_all`])와 푸시 이벤트
//! ([`SettingsList::merge_by_key`])는 모두 I/O 없는 순수 연산이라
//! 전송 계층과 무관하게 도착 순서를 테스트할 수 있다.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 설정 레코드 `{key, value}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    /// 설정 키 (목록 내 유일)
    pub key: String,
    /// 설정 값 ("enabled"/"disabled" 또는 불투명 토큰)
    pub value: String,
}

impl Setting {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 컨트롤 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    /// enabled/disabled 토글
    Toggle,
    /// 읽기 전용 텍스트 (API 토큰)
    ReadOnly,
}

/// 화면이 알고 있는 설정 키
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// 회원가입 화면을 통한 신규 관리자 생성 허용
    UserCreation,
    /// 티켓 이관 시 고객에게 자동 메시지 전송
    TransferTicket,
    /// 음성/영상 통화 미지원 안내 메시지 전송
    Call,
    /// 그룹 메시지 무시
    CheckMsgIsGroup,
    /// REST API 전송용 토큰
    UserApiToken,
}

impl SettingKey {
    /// 렌더링 순서대로 나열한 전체 키
    pub const ALL: [SettingKey; 5] = [
        SettingKey::UserCreation,
        SettingKey::TransferTicket,
        SettingKey::Call,
        SettingKey::CheckMsgIsGroup,
        SettingKey::UserApiToken,
    ];

    /// 서버 와이어 키
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::UserCreation => "userCreation",
            SettingKey::TransferTicket => "transferTicket",
            SettingKey::Call => "call",
            SettingKey::CheckMsgIsGroup => "CheckMsgIsGroup",
            SettingKey::UserApiToken => "userApiToken",
        }
    }

    pub fn kind(&self) -> SettingKind {
        match self {
            SettingKey::UserApiToken => SettingKind::ReadOnly,
            _ => SettingKind::Toggle,
        }
    }

    /// 사용자가 값을 바꿀 수 있는 키인지
    pub fn is_editable(&self) -> bool {
        self.kind() == SettingKind::Toggle
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| CoreError::Validation {
                field: "key".to_string(),
                message: format!("알 수 없는 설정 키: {s}"),
            })
    }
}

/// 토글 값
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleValue {
    Enabled,
    Disabled,
}

impl ToggleValue {
    pub const BOTH: [ToggleValue; 2] = [ToggleValue::Enabled, ToggleValue::Disabled];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleValue::Enabled => "enabled",
            ToggleValue::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ToggleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToggleValue {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(ToggleValue::Enabled),
            "disabled" => Ok(ToggleValue::Disabled),
            other => Err(CoreError::Validation {
                field: "value".to_string(),
                message: format!("enabled/disabled 중 하나여야 함: {other}"),
            }),
        }
    }
}

/// 키 단위 병합 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// 값이 바뀜 (이전 값 포함)
    Applied { previous: String },
    /// 같은 값이라 변화 없음
    Unchanged,
    /// 일치하는 키가 없음: 무시
    Missing,
}

impl MergeOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, MergeOutcome::Applied { .. })
    }
}

/// 설정 목록: 서버 순서 유지, 키당 최대 하나
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsList {
    items: Vec<Setting>,
}

impl SettingsList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 전체 목록 교체 (초기 로드)
    ///
    /// 서버 순서를 유지하며, 중복 키는 첫 번째 레코드만 남긴다.
    /// 버려진 중복 키 목록을 반환한다.
    pub fn replace_all(&mut self, fetched: Vec<Setting>) -> Vec<String> {
        let mut seen = HashSet::with_capacity(fetched.len());
        let mut dropped = Vec::new();
        let mut items = Vec::with_capacity(fetched.len());

        for setting in fetched {
            if seen.insert(setting.key.clone()) {
                items.push(setting);
            } else {
                dropped.push(setting.key);
            }
        }

        self.items = items;
        dropped
    }

    /// 키가 일치하는 레코드의 값만 덮어쓴다. 없으면 아무것도 하지 않는다.
    pub fn merge_by_key(&mut self, incoming: &Setting) -> MergeOutcome {
        match self.items.iter_mut().find(|s| s.key == incoming.key) {
            Some(existing) if existing.value == incoming.value => MergeOutcome::Unchanged,
            Some(existing) => {
                let previous = std::mem::replace(&mut existing.value, incoming.value.clone());
                MergeOutcome::Applied { previous }
            }
            None => MergeOutcome::Missing,
        }
    }

    /// 키로 값 조회 (없으면 None)
    pub fn value(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
