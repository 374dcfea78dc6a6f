//! One table's run: locate, export, then poll until terminal

use super::options::WorkflowOptions;
use crate::adapters::backup::BackupLocator;
use crate::adapters::export::Exporter;
use crate::domain::{
    ExportStatus, FailureKind, LocateError, RemoteCallError, Result, TableId, TableRunState,
    TableRunStatus,
};
use crate::{log_poll_attempt, log_table_transition};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Everything a spawned table run needs, shared across tables
#[derive(Clone)]
pub(crate) struct TableRunContext {
    pub locator: Arc<dyn BackupLocator>,
    pub exporter: Arc<dyn Exporter>,
    pub options: WorkflowOptions,
    pub destination: Arc<str>,
}

/// Drive `table_id` to a terminal state
///
/// Never returns a non-terminal state. Failures are recorded on the returned
/// state rather than propagated.
pub(crate) async fn run_table(
    ctx: TableRunContext,
    table_id: TableId,
    mut shutdown: watch::Receiver<bool>,
) -> TableRunState {
    let mut state = TableRunState::new(table_id);

    if let Err(e) = drive(&ctx, &mut state, &mut shutdown).await {
        tracing::error!(table_id = %state.table_id, error = %e, "Table run stopped unexpectedly");
        if !state.is_terminal() {
            if let Err(e) = finish_failed(&mut state, FailureKind::RemoteError, e.to_string()) {
                tracing::error!(table_id = %state.table_id, error = %e, "Could not record failure");
            }
        }
    }

    state
}

async fn drive(
    ctx: &TableRunContext,
    state: &mut TableRunState,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<()> {
    if *shutdown.borrow() {
        return finish_failed(state, FailureKind::Cancelled, "Run cancelled before table started");
    }

    let step_timeout = ctx.options.step_timeout;

    transition(state, TableRunStatus::LocatingBackup)?;
    match within_step(step_timeout, ctx.locator.locate(&state.table_id)).await {
        Ok(backup) => {
            tracing::info!(
                table_id = %state.table_id,
                backup_ref = %backup.arn,
                backup_created_at = %backup.created_at,
                "Located latest backup"
            );
            state.record_backup(backup);
        }
        Err(e @ LocateError::NotFound { .. }) => {
            return finish_failed(state, FailureKind::NotFound, e.to_string());
        }
        Err(e @ LocateError::Remote(_)) => {
            return finish_failed(state, FailureKind::RemoteError, e.to_string());
        }
    }

    transition(state, TableRunStatus::Exporting)?;
    let outcome = match within_step(
        step_timeout,
        ctx.exporter.start_export(&state.table_id, &ctx.destination),
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => return finish_failed(state, FailureKind::RemoteError, e.to_string()),
    };
    tracing::info!(
        table_id = %state.table_id,
        destination_key = %outcome.destination_key,
        status = %outcome.status,
        "Export started"
    );
    let mut handle = outcome.handle();
    state.record_export(handle.clone());

    transition(state, TableRunStatus::WaitingForCompletion)?;
    loop {
        if wait_for_next_check(ctx.options.poll_interval, shutdown).await {
            return finish_failed(
                state,
                FailureKind::Cancelled,
                "Run cancelled while waiting for export",
            );
        }

        let check = match within_step(step_timeout, ctx.exporter.export_status(&handle)).await {
            Ok(check) => check,
            Err(e) => return finish_failed(state, FailureKind::RemoteError, e.to_string()),
        };
        let status = check.status;
        state.record_poll(status);
        handle.status = status;
        log_poll_attempt!(&state.table_id, state.poll_attempts, status);

        match status {
            ExportStatus::Succeeded => {
                let from = state.status;
                state.succeed()?;
                log_table_transition!(&state.table_id, from, state.status);
                return Ok(());
            }
            ExportStatus::Failed => {
                let message = check
                    .message
                    .or_else(|| outcome.message.clone())
                    .unwrap_or_else(|| {
                        format!("Export to '{}' reported FAILED", handle.destination_path)
                    });
                return finish_failed(state, FailureKind::ExportFailed, message);
            }
            ExportStatus::InProgress => {
                if ctx.options.poll_budget_exhausted(state.poll_attempts) {
                    let message = format!(
                        "Export still in progress after {} status checks",
                        state.poll_attempts
                    );
                    return finish_failed(state, FailureKind::PollLimitExceeded, message);
                }
            }
        }
    }
}

/// Run a remote call within the step budget
async fn within_step<F, T, E>(limit: Duration, call: F) -> std::result::Result<T, E>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: From<RemoteCallError>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(E::from(RemoteCallError::Timeout(limit))),
    }
}

/// Sleep one poll interval; returns true if shutdown was requested instead
async fn wait_for_next_check(interval: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }

    let sleep = tokio::time::sleep(interval);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = shutdown.changed() => match changed {
                Ok(()) if *shutdown.borrow() => return true,
                Ok(()) => continue,
                // Sender gone, no shutdown can arrive any more
                Err(_) => {
                    (&mut sleep).await;
                    return false;
                }
            },
        }
    }
}

fn transition(state: &mut TableRunState, next: TableRunStatus) -> Result<()> {
    let from = state.status;
    state.advance(next)?;
    log_table_transition!(&state.table_id, from, next);
    Ok(())
}

fn finish_failed(
    state: &mut TableRunState,
    kind: FailureKind,
    message: impl Into<String>,
) -> Result<()> {
    let from = state.status;
    let message = message.into();
    state.fail(kind, message.clone())?;
    log_table_transition!(&state.table_id, from, state.status);
    tracing::warn!(
        table_id = %state.table_id,
        failure = %kind,
        error = %message,
        "Table run failed"
    );
    Ok(())
}
