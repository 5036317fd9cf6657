use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use course_config::AppConfig;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod shutdown;

use app::{AppMode, Application};
use shutdown::ShutdownManager;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

fn cli() -> Command {
    Command::new("course-platform")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Course management platform")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (defaults to the standard search paths)")
                .global(true),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Components to run")
                .value_parser(["api", "scheduler", "all"])
                .default_value("all"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (overrides configuration)")
                .value_parser(["trace", "debug", "info", "warn", "error"])
                .global(true),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("Log format (overrides configuration)")
                .value_parser(["json", "pretty"])
                .global(true),
        )
        .subcommand(
            Command::new("issue-token")
                .about("Print a bearer token for an existing user")
                .arg(
                    Arg::new("user-id")
                        .long("user-id")
                        .value_name("ID")
                        .help("User id to sign the token for")
                        .value_parser(clap::value_parser!(i64))
                        .required(true),
                ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let config_path = matches.get_one::<String>("config").map(String::as_str);
    let config = AppConfig::load(config_path).with_context(|| match config_path {
        Some(path) => format!("failed to load configuration from {path}"),
        None => "failed to load configuration".to_string(),
    })?;

    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| config.observability.log_level.clone());
    let log_format = matches
        .get_one::<String>("log-format")
        .cloned()
        .unwrap_or_else(|| config.observability.log_format.to_string());
    init_logging(&log_level, &log_format)?;

    if let Some(sub) = matches.subcommand_matches("issue-token") {
        return issue_token(config, sub).await;
    }

    let mode = parse_app_mode(&matches)?;
    info!(?mode, "starting course platform");

    let app = Arc::new(Application::new(config, mode).await?);
    let shutdown_manager = ShutdownManager::new();

    let app_handle = {
        let app = Arc::clone(&app);
        let shutdown_rx = shutdown_manager.subscribe().await;

        tokio::spawn(async move {
            if let Err(e) = app.run(shutdown_rx).await {
                error!("application failed: {e:#}");
            }
        })
    };

    wait_for_shutdown_signal().await;
    info!("shutdown signal received, stopping components");
    shutdown_manager.shutdown().await;

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, app_handle).await {
        Ok(Ok(())) => info!("application stopped gracefully"),
        Ok(Err(e)) => error!("application task panicked: {e}"),
        Err(_) => warn!("application did not stop within {SHUTDOWN_TIMEOUT:?}, exiting"),
    }

    Ok(())
}

async fn issue_token(config: AppConfig, matches: &ArgMatches) -> Result<()> {
    let user_id = *matches
        .get_one::<i64>("user-id")
        .ok_or_else(|| anyhow::anyhow!("--user-id is required"))?;

    let app = Application::new(config, AppMode::Api).await?;
    let token = app.issue_token(user_id).await?;
    println!("{token}");
    Ok(())
}

fn init_logging(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("failed to initialise JSON logging")?,
        "pretty" => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .context("failed to initialise pretty logging")?,
        _ => return Err(anyhow::anyhow!("unsupported log format: {log_format}")),
    }

    Ok(())
}

fn parse_app_mode(matches: &ArgMatches) -> Result<AppMode> {
    match matches.get_one::<String>("mode").map(String::as_str) {
        Some("api") => Ok(AppMode::Api),
        Some("scheduler") => Ok(AppMode::Scheduler),
        Some("all") | None => Ok(AppMode::All),
        Some(other) => Err(anyhow::anyhow!("unsupported mode: {other}")),
    }
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_parse_app_mode() {
        let matches = cli().get_matches_from(["course-platform", "--mode", "scheduler"]);
        assert_eq!(parse_app_mode(&matches).unwrap(), AppMode::Scheduler);

        let matches = cli().get_matches_from(["course-platform"]);
        assert_eq!(parse_app_mode(&matches).unwrap(), AppMode::All);
    }

    #[test]
    fn test_issue_token_requires_user_id() {
        let result = cli().try_get_matches_from(["course-platform", "issue-token"]);
        assert!(result.is_err());

        let matches = cli()
            .try_get_matches_from(["course-platform", "issue-token", "--user-id", "7"])
            .unwrap();
        let sub = matches.subcommand_matches("issue-token").unwrap();
        assert_eq!(sub.get_one::<i64>("user-id"), Some(&7));
    }
}
