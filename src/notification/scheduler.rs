use anyhow::Context;
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::state::AppState;

/// Runs one due-soon sweep immediately, then schedules it on the configured
/// cron expression. The returned scheduler must be kept alive by the caller.
pub async fn start_notification_scheduler(state: AppState) -> anyhow::Result<JobScheduler> {
    run_sweep(&state).await;

    let scheduler = JobScheduler::new()
        .await
        .context("failed to create job scheduler")?;

    let cron = state.config.notification_sweep_cron.clone();
    let job = Job::new_async(cron.as_str(), move |_uuid, _l| {
        let state = state.clone();

        Box::pin(async move {
            run_sweep(&state).await;
        })
    })
    .with_context(|| format!("invalid NOTIFICATION_SWEEP_CRON: {}", cron))?;

    scheduler.add(job).await.context("failed to add sweep job")?;
    scheduler
        .start()
        .await
        .context("failed to start job scheduler")?;

    info!("Notification scheduler started ({})", cron);
    Ok(scheduler)
}

async fn run_sweep(state: &AppState) {
    match state.notification_service.sweep_due_soon(Utc::now()).await {
        Ok(0) => {}
        Ok(created) => info!("Due-soon sweep created {} notifications", created),
        Err(e) => error!("Error checking due-soon todos: {:?}", e),
    }
}
