use std::env;

use team_cal::calendar::date;
use team_cal::storage::Config;

mod cli;
use cli::{parse_command_line, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let args = parse_command_line(env::args().skip(1), date::today())?;

    if let Err(e) = run(args).await {
        tracing::error!("Command failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "team-cal.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("team-cal started");
}
