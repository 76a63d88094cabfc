use std::sync::Arc;

use flowgent_agent::{build_scheduler, EnrichmentAgent, PgLeadStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = flowgent_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = flowgent_db::PoolConfig::from_app_config(&config);
    let pool = flowgent_db::connect_pool(&config.database_url, pool_config).await?;
    flowgent_db::run_migrations(&pool).await?;

    let agent = Arc::new(EnrichmentAgent::from_app_config(
        PgLeadStore::new(pool),
        &config,
    )?);
    tracing::info!(
        policy = agent.policy_name(),
        batch_size = config.agent_batch_size,
        "agent: starting"
    );

    if config.agent_run_once {
        let summary = agent.run_cycle().await;
        tracing::info!(
            fetched = summary.fetched,
            enriched = summary.enriched,
            failed = summary.failed,
            "agent: single cycle finished"
        );
        return Ok(());
    }

    let mut scheduler = build_scheduler(agent, config.agent_poll_interval_secs).await?;
    shutdown_signal().await;
    scheduler.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("agent: received shutdown signal, stopping scheduler");
}
