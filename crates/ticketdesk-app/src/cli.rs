//! 명령줄 인자.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ticketdesk_core::models::setting::{SettingKey, ToggleValue};

/// 토큰 환경 변수
pub const TOKEN_ENV: &str = "TICKETDESK_TOKEN";

/// ticketdesk 테넌트 설정 클라이언트
#[derive(Parser, Debug)]
#[command(name = "ticketdesk")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// 서버 URL 지정 (기본: 설정 파일 값)
    #[arg(long, short = 's')]
    pub server: Option<String>,

    /// API 토큰 (없으면 TICKETDESK_TOKEN 환경 변수)
    #[arg(long)]
    pub token: Option<String>,

    /// 테넌트 ID (푸시 채널 범위)
    #[arg(long)]
    pub tenant: Option<String>,

    /// 표시 언어 (en, pt, es)
    #[arg(long)]
    pub locale: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn")]
    pub log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 실시간 업데이트 비활성화
    #[arg(long)]
    pub no_push: bool,

    /// 화면 대신 JSON 출력
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 현재 설정 한 번 출력
    Show,
    /// 설정 값 변경
    Set {
        /// userCreation, transferTicket, call, CheckMsgIsGroup
        key: SettingKey,
        /// enabled 또는 disabled
        value: ToggleValue,
    },
    /// 실시간 업데이트를 따라가며 계속 출력 (Ctrl+C로 종료)
    Watch,
}

impl Args {
    /// 워크스페이스 crate 전체에 적용할 로그 필터
    pub fn log_filter(&self) -> String {
        [
            "ticketdesk",
            "ticketdesk_app",
            "ticketdesk_core",
            "ticketdesk_network",
            "ticketdesk_settings",
        ]
        .iter()
        .map(|target| format!("{target}={}", self.log_level))
        .collect::<Vec<_>>()
        .join(",")
    }
}
