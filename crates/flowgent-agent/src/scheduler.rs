//! Background job scheduler.
//!
//! Registers the repeated enrichment job and starts the scheduler.

use std::sync::Arc;
use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::cycle::EnrichmentAgent;
use crate::store::LeadStore;

/// Builds and starts the scheduler with one enrichment job every
/// `interval_secs` seconds.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down the job.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler<S>(
    agent: Arc<EnrichmentAgent<S>>,
    interval_secs: u64,
) -> Result<JobScheduler, JobSchedulerError>
where
    S: LeadStore + 'static,
{
    let scheduler = JobScheduler::new().await?;
    register_enrichment_job(&scheduler, agent, interval_secs).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_enrichment_job<S>(
    scheduler: &JobScheduler,
    agent: Arc<EnrichmentAgent<S>>,
    interval_secs: u64,
) -> Result<(), JobSchedulerError>
where
    S: LeadStore + 'static,
{
    let job = Job::new_repeated_async(
        Duration::from_secs(interval_secs),
        move |_uuid, _lock| {
            let agent = Arc::clone(&agent);

            Box::pin(async move {
                tracing::debug!("scheduler: enrichment tick");
                agent.run_cycle().await;
            })
        },
    )?;

    scheduler.add(job).await?;
    tracing::info!(interval_secs, "scheduler: enrichment job registered");
    Ok(())
}
