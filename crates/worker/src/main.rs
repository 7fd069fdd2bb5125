//! Applies scheduled movements whose effective date has arrived.
//!
//! Runs once and exits; schedule it daily (cron, systemd timer, k8s
//! CronJob). Safe to run concurrently or repeatedly: movements are claimed
//! with `SKIP LOCKED` and applied ones are no longer `scheduled`.

use std::process::ExitCode;

use coverage_core::types::business_today;
use coverage_db::repositories::MovementRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default offset from UTC, in hours, of the business calendar.
const DEFAULT_BUSINESS_UTC_OFFSET_HOURS: i32 = -3;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // `LOG_FORMAT=json` for log shippers; human-readable otherwise.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coverage_worker=info,coverage_db=info".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        tracing::error!("DATABASE_URL must be set");
        return ExitCode::FAILURE;
    };

    let offset_hours = match std::env::var("BUSINESS_UTC_OFFSET_HOURS") {
        Ok(raw) => match raw.parse::<i32>() {
            Ok(hours) => hours,
            Err(e) => {
                tracing::error!(value = %raw, error = %e, "BUSINESS_UTC_OFFSET_HOURS must be a valid i32");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => DEFAULT_BUSINESS_UTC_OFFSET_HOURS,
    };
    let today = business_today(offset_hours);

    let pool = match coverage_db::create_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%today, "Applying due movements");

    let result = MovementRepo::apply_due(&pool, today).await;
    pool.close().await;

    match result {
        Ok(applied) => {
            tracing::info!(applied, %today, "Due movements applied");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Applying due movements failed");
            ExitCode::FAILURE
        }
    }
}
