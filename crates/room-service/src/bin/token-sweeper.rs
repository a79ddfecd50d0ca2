//! Invite token sweeper
//!
//! Periodically deactivates expired and used-up invite tokens.
//!
//! Run with:
//! ```bash
//! cargo run -p room-service --bin token-sweeper            # every SWEEP_INTERVAL_SECS
//! cargo run -p room-service --bin token-sweeper -- --once  # single pass
//! ```

use anyhow::Context;
use room_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use room_db::{create_pool, run_migrations, DatabaseConfig};
use room_service::{InviteService, InviteSettings, ServiceContext, Session};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %format!("{e:#}"), "Token sweeper failed");
        eprintln!("token-sweeper: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let once = std::env::args().skip(1).any(|arg| arg == "--once");
    info!(
        env = ?config.app.env,
        interval_secs = config.sweeper.interval_secs,
        once,
        "Starting token sweeper"
    );

    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .context("failed to connect to PostgreSQL")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let ctx = ServiceContext::postgres(pool, InviteSettings::from(&config.invite));
    let session = Session::anonymous();
    let sweeper = InviteService::new(&ctx, &session);

    if once {
        let report = sweeper.sweep_expired_tokens().await?;
        info!(deactivated = report.deactivated, "Single sweep complete");
        return Ok(());
    }

    let mut ticker = interval(config.sweeper.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A failed pass is retried on the next tick
                if let Err(e) = sweeper.sweep_expired_tokens().await {
                    warn!(error = %e, "Token sweep failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping sweeper");
                break;
            }
        }
    }

    Ok(())
}
