use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use ticketdesk_app::cli::{Args, Command, TOKEN_ENV};
use ticketdesk_app::commands::{self, OutputFormat};
use ticketdesk_app::notifier::ConsoleNotifier;
use ticketdesk_app::{lifecycle, wiring};
use ticketdesk_settings::screen::{LoadState, WriteOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let log_filter = args.log_filter();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // 설정 로드 + CLI 오버라이드
    let config_manager = wiring::load_config(args.config.clone())?;
    let mut config = config_manager.get();
    wiring::apply_overrides(&mut config, &args);
    info!("설정 파일: {}", config_manager.config_path().display());

    let token = wiring::resolve_token(args.token.clone(), std::env::var(TOKEN_ENV).ok());
    let screen = wiring::build_screen(&config, token, Arc::new(ConsoleNotifier::new()))?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut stdout = std::io::stdout();

    let success = match args.command {
        Command::Show => commands::show(&screen, &mut stdout, format).await? == LoadState::Loaded,
        Command::Set { key, value } => {
            commands::set(&screen, key, value).await == WriteOutcome::Saved
        }
        Command::Watch => {
            commands::watch(&screen, &mut stdout, format, lifecycle::wait_for_signal()).await?;
            true
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
