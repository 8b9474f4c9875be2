//! 콘솔 렌더링.
//!
//! `SettingsView`를 텍스트 화면 또는 JSON으로 출력한다.

use chrono::{DateTime, TimeZone};
use std::fmt::{self, Write as _};
use ticketdesk_settings::presenter::{ControlView, SettingsView};

/// 레이블 열 너비
const LABEL_WIDTH: usize = 28;

/// 텍스트 화면
pub fn render_text<Tz>(view: &SettingsView, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== {} ==  [{} · {}]",
        view.title,
        view.status_label,
        at.format("%H:%M:%S")
    );

    for control in &view.controls {
        match control {
            ControlView::Toggle {
                label,
                note,
                options,
                selected,
                ..
            } => {
                let choices = options
                    .iter()
                    .map(|option| {
                        let mark = if Some(option.value) == *selected {
                            'x'
                        } else {
                            ' '
                        };
                        format!("({mark}) {}", option.label)
                    })
                    .collect::<Vec<_>>()
                    .join("  ");
                let _ = writeln!(out, "{label:<LABEL_WIDTH$}{choices}");
                let _ = writeln!(out, "    {note}");
            }
            ControlView::ReadOnly {
                label, note, value, ..
            } => {
                let _ = writeln!(out, "{label:<LABEL_WIDTH$}{}", value.as_deref().unwrap_or("-"));
                let _ = writeln!(out, "    {note}");
            }
        }
    }
    out
}

/// JSON 한 줄
pub fn render_json(view: &SettingsView) -> Result<String, serde_json::Error> {
    serde_json::to_string(view)
}
