use chrono::Local;
use fuelscan_lib::{report, send_report, FuelScanError, HttpFeedSource, Settings, TwilioNotifier};
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

fn default_settings() -> String {
    "fuelscan.toml".to_string()
}

#[derive(Deserialize, Clone, Debug)]
struct Config {
    #[serde(default = "default_settings")]
    settings: String,
    #[serde(default)]
    schedule: Option<String>,
    #[serde(default)]
    dry_run: bool,
}

#[derive(Error, Debug)]
enum AppError {
    #[error("invalid environment: {0}")]
    Config(#[from] envy::Error),
    #[error(transparent)]
    Run(#[from] FuelScanError),
    #[error("scheduler failed: {0}")]
    Scheduler(#[from] JobSchedulerError),
    #[error("scan task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("signal handler failed: {0}")]
    Signal(#[from] std::io::Error),
}

fn run_once(settings: &Settings, dry_run: bool) -> Result<(), FuelScanError> {
    let source = HttpFeedSource::new()?;
    let body = report(settings, &source);

    println!("{}", body);

    match (&settings.notification, dry_run) {
        (Some(notification), false) => {
            let notifier = TwilioNotifier::new(
                notification.account_sid.as_str(),
                notification.auth_token.as_str(),
                notification.from.as_str(),
            )?;
            let receipt = send_report(&notifier, notification, &body)?;
            debug!("receipt {:?}", receipt);
        }
        (Some(_), true) => info!("dry run, not sending"),
        (None, _) => debug!("no notification configured"),
    }

    info!("scan finished at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    Ok(())
}

// the feed and sms clients block, keep them off the async workers
async fn run_blocking(settings: Arc<Settings>, dry_run: bool) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || run_once(&settings, dry_run)).await??;
    Ok(())
}

async fn setup_cron(
    expression: &str,
    settings: Arc<Settings>,
    dry_run: bool,
) -> Result<JobScheduler, AppError> {
    debug!("setting up cron {}", expression);

    let sched = JobScheduler::new().await?;

    sched
        .add(Job::new_async(expression, move |_uuid, _l| {
            let settings = settings.clone();

            Box::pin(async move {
                if let Err(e) = run_blocking(settings, dry_run).await {
                    warn!("scheduled scan failed: {}", e);
                }
            })
        })?)
        .await?;

    Ok(sched)
}

async fn run(config: Config) -> Result<(), AppError> {
    info!("loading settings from {}", config.settings);

    let settings = Settings::load(&config.settings).map_err(FuelScanError::from)?;
    let settings = Arc::new(settings);

    run_blocking(settings.clone(), config.dry_run).await?;

    if let Some(expression) = config.schedule.as_deref() {
        let mut sched = setup_cron(expression, settings, config.dry_run).await?;
        sched.start().await?;

        info!("scanning on schedule {}", expression);

        tokio::signal::ctrl_c().await?;
        sched.shutdown().await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config = match envy::prefixed("FUELSCAN_").from_env::<Config>() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", AppError::from(e));
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::Config;

    #[test]
    fn config_defaults() {
        let config: Config = envy::prefixed("FUELSCAN_TEST_UNSET_")
            .from_iter(Vec::<(String, String)>::new())
            .unwrap();
        assert_eq!(config.settings, "fuelscan.toml");
        assert_eq!(config.schedule, None);
        assert!(!config.dry_run);
    }

    #[test]
    fn config_from_environment() {
        let vars = vec![
            ("FUELSCAN_SETTINGS".to_string(), "/etc/fuelscan.toml".to_string()),
            ("FUELSCAN_SCHEDULE".to_string(), "0 0 6 * * *".to_string()),
            ("FUELSCAN_DRY_RUN".to_string(), "true".to_string()),
        ];
        let config: Config = envy::prefixed("FUELSCAN_").from_iter(vars).unwrap();
        assert_eq!(config.settings, "/etc/fuelscan.toml");
        assert_eq!(config.schedule.as_deref(), Some("0 0 6 * * *"));
        assert!(config.dry_run);
    }
}
